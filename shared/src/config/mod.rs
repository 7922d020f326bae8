//! Configuration module with business-specific sub-modules
//!
//! - `auth` - Token signing and key rotation configuration
//! - `environment` - Environment detection and logging configuration

pub mod auth;
pub mod environment;

use serde::{Deserialize, Serialize};

/// Serialises tests that mutate process environment variables
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

// Re-export commonly used types
pub use auth::{AuthConfig, JwtConfig, KeyRotationSettings};
pub use environment::{Environment, LogFormat, LoggingConfig};

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            auth: AuthConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment
    ///
    /// A `.env` file for the detected environment is loaded first when present,
    /// falling back to a plain `.env`. Variables already set take precedence.
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        if dotenvy::from_filename(environment.env_file()).is_err() {
            dotenvy::dotenv().ok();
        }

        Self {
            environment,
            auth: AuthConfig::from_env(),
            logging: LoggingConfig::from_env(environment),
        }
    }
}
