//! Token signing and key rotation configuration

use serde::{Deserialize, Serialize};

const DEFAULT_SECRET: &str = "development-secret-please-change-in-production";

/// JWT signing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Static HMAC secret, also used as the fixed key for deployments without rotation
    pub secret: String,

    /// Access token expiry time in seconds
    pub access_token_expiry: i64,

    /// Refresh token expiry time in seconds
    pub refresh_token_expiry: i64,

    /// JWT issuer claim
    #[serde(default = "default_issuer")]
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_SECRET),
            access_token_expiry: 900,     // 15 minutes
            refresh_token_expiry: 604800, // 7 days
            issuer: default_issuer(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes.saturating_mul(60);
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry = days.saturating_mul(86400);
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            secret: std::env::var("JWT_SECRET").unwrap_or(defaults.secret),
            access_token_expiry: env_or("JWT_ACCESS_TOKEN_EXPIRY", defaults.access_token_expiry),
            refresh_token_expiry: env_or("JWT_REFRESH_TOKEN_EXPIRY", defaults.refresh_token_expiry),
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
        }
    }
}

/// Signing key rotation settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KeyRotationSettings {
    /// Whether the background rotation task runs
    #[serde(default)]
    pub enabled: bool,

    /// How often the rotation task checks key age, in seconds
    pub check_interval: u64,

    /// Maximum age of the active key before it is rotated, in seconds
    pub max_key_age: i64,

    /// How long a superseded key keeps verifying tokens, in seconds
    pub grace_period: i64,
}

impl Default for KeyRotationSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            check_interval: 3600,       // 1 hour
            max_key_age: 30 * 86400,    // 30 days
            grace_period: 604800,       // one refresh token lifetime
        }
    }
}

impl KeyRotationSettings {
    /// Create from environment variables
    ///
    /// The grace period defaults to the refresh token lifetime so that no
    /// refresh token outlives the key that signed it.
    pub fn from_env(jwt: &JwtConfig) -> Self {
        let defaults = Self::default();
        Self {
            enabled: env_or("KEY_ROTATION_ENABLED", defaults.enabled),
            check_interval: env_or("KEY_ROTATION_CHECK_INTERVAL", defaults.check_interval),
            max_key_age: env_or("KEY_MAX_AGE", defaults.max_key_age),
            grace_period: env_or("KEY_GRACE_PERIOD", jwt.refresh_token_expiry),
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// Key rotation configuration
    #[serde(default)]
    pub key_rotation: KeyRotationSettings,
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let jwt = JwtConfig::from_env();
        let key_rotation = KeyRotationSettings::from_env(&jwt);
        Self { jwt, key_rotation }
    }
}

fn default_issuer() -> String {
    String::from("keyturn")
}

/// Read and parse an environment variable, falling back to `default`
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
