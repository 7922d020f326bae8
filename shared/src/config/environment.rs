//! Deployment environment and the logging defaults derived from it

use serde::{Deserialize, Serialize};

/// Deployment the process runs in, read from `ENVIRONMENT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Environment {
    /// Reads `ENVIRONMENT`; unset or unrecognised values mean development
    pub fn from_env() -> Self {
        std::env::var("ENVIRONMENT")
            .ok()
            .and_then(|name| Self::from_name(&name))
            .unwrap_or_default()
    }

    fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(Environment::Development),
            "test" => Some(Environment::Test),
            "production" | "prod" => Some(Environment::Production),
            _ => None,
        }
    }

    /// Dotenv file holding this environment's secret and overrides
    pub fn env_file(&self) -> &'static str {
        match self {
            Environment::Development => ".env.development",
            Environment::Test => ".env.test",
            Environment::Production => ".env.production",
        }
    }
}

/// Subscriber settings consumed by [`crate::init_logging`]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives applied when `RUST_LOG` is unset
    pub level: String,

    pub format: LogFormat,

    /// ANSI colours; ignored by the json format
    pub colored: bool,

    /// Attach file and line to every event
    pub source_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::for_environment(Environment::Development)
    }
}

impl LoggingConfig {
    /// Defaults for an environment
    ///
    /// Key rotation and revocation are logged by `kt_core` at `info`, so that
    /// target stays at `info` or below everywhere while other crates are
    /// quieter outside development.
    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Development => Self {
                level: String::from("kt_core=debug,info"),
                format: LogFormat::Pretty,
                colored: true,
                source_location: true,
            },
            Environment::Test => Self {
                level: String::from("kt_core=debug,warn"),
                format: LogFormat::Compact,
                colored: false,
                source_location: false,
            },
            Environment::Production => Self {
                level: String::from("kt_core=info,warn"),
                format: LogFormat::Json,
                colored: false,
                source_location: false,
            },
        }
    }

    /// Environment defaults overridden by `LOG_LEVEL` and `LOG_FORMAT`
    pub fn from_env(env: Environment) -> Self {
        let mut config = Self::for_environment(env);
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.level = level;
        }
        if let Some(format) = std::env::var("LOG_FORMAT")
            .ok()
            .and_then(|name| LogFormat::from_name(&name))
        {
            config.format = format;
        }
        config
    }
}

/// Output format of the fmt layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

impl LogFormat {
    fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "json" => Some(LogFormat::Json),
            "pretty" => Some(LogFormat::Pretty),
            "compact" => Some(LogFormat::Compact),
            _ => None,
        }
    }
}
