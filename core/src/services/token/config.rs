//! Configuration for the token service

use chrono::{Duration, Utc};

use kt_shared::JwtConfig;

use crate::domain::entities::{
    ACCESS_TOKEN_EXPIRY_MINUTES, JWT_ISSUER, MIN_KEY_LENGTH, REFRESH_TOKEN_EXPIRY_DAYS,
};
use crate::errors::ConfigError;

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// JWT signing secret for fixed-key deployments
    pub jwt_secret: String,
    /// Issuer written into and required on every token
    pub issuer: String,
    /// Access token lifetime
    pub access_token_ttl: Duration,
    /// Refresh token lifetime
    pub refresh_token_ttl: Duration,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "development-secret-please-change-in-production".to_string(),
            issuer: JWT_ISSUER.to_string(),
            access_token_ttl: Duration::minutes(ACCESS_TOKEN_EXPIRY_MINUTES),
            refresh_token_ttl: Duration::days(REFRESH_TOKEN_EXPIRY_DAYS),
        }
    }
}

impl TryFrom<&JwtConfig> for TokenServiceConfig {
    type Error = ConfigError;

    fn try_from(jwt: &JwtConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            jwt_secret: jwt.secret.clone(),
            issuer: jwt.issuer.clone(),
            access_token_ttl: seconds("access_token_expiry", jwt.access_token_expiry)?,
            refresh_token_ttl: seconds("refresh_token_expiry", jwt.refresh_token_expiry)?,
        })
    }
}

/// Converts a seconds setting, rejecting values chrono cannot hold
fn seconds(setting: &str, value: i64) -> Result<Duration, ConfigError> {
    Duration::try_seconds(value).ok_or_else(|| ConfigError::LifetimeOutOfRange {
        setting: setting.to_string(),
    })
}

impl TokenServiceConfig {
    /// Checks the secret and both lifetimes
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        if self.jwt_secret.len() < MIN_KEY_LENGTH {
            return Err(ConfigError::SecretTooShort {
                min: MIN_KEY_LENGTH,
                actual: self.jwt_secret.len(),
            });
        }
        self.validate_lifetimes()
    }

    /// Checks both lifetimes are positive and yield a representable expiry
    pub fn validate_lifetimes(&self) -> Result<(), ConfigError> {
        if self.access_token_ttl <= Duration::zero() {
            return Err(ConfigError::InvalidAccessTokenLifetime);
        }
        if self.refresh_token_ttl <= Duration::zero() {
            return Err(ConfigError::InvalidRefreshTokenLifetime);
        }

        let now = Utc::now();
        for (setting, ttl) in [
            ("access_token_ttl", self.access_token_ttl),
            ("refresh_token_ttl", self.refresh_token_ttl),
        ] {
            if now.checked_add_signed(ttl).is_none() {
                return Err(ConfigError::LifetimeOutOfRange {
                    setting: setting.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> TokenServiceConfig {
        TokenServiceConfig {
            jwt_secret: "a".repeat(MIN_KEY_LENGTH),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(TokenServiceConfig::default().validate().is_ok());
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_empty_secret() {
        let config = TokenServiceConfig {
            jwt_secret: String::new(),
            ..valid()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptySecret));
    }

    #[test]
    fn test_short_secret() {
        let config = TokenServiceConfig {
            jwt_secret: "a".repeat(MIN_KEY_LENGTH - 1),
            ..valid()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::SecretTooShort { min: 32, actual: 31 })
        );
    }

    #[test]
    fn test_non_positive_lifetimes() {
        let config = TokenServiceConfig {
            access_token_ttl: Duration::zero(),
            ..valid()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidAccessTokenLifetime));

        let config = TokenServiceConfig {
            refresh_token_ttl: Duration::seconds(-5),
            ..valid()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidRefreshTokenLifetime));
    }

    #[test]
    fn test_lifetimes_only_ignores_secret() {
        let config = TokenServiceConfig {
            jwt_secret: String::new(),
            ..valid()
        };
        assert!(config.validate_lifetimes().is_ok());
    }

    #[test]
    fn test_from_jwt_config() {
        let jwt = JwtConfig::new("s".repeat(40))
            .with_access_expiry_minutes(5)
            .with_refresh_expiry_days(1);

        let config = TokenServiceConfig::try_from(&jwt).unwrap();

        assert_eq!(config.access_token_ttl, Duration::minutes(5));
        assert_eq!(config.refresh_token_ttl, Duration::days(1));
        assert_eq!(config.issuer, "keyturn");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_lifetime_beyond_calendar_is_rejected() {
        let config = TokenServiceConfig {
            access_token_ttl: Duration::days(365 * 300_000),
            ..valid()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::LifetimeOutOfRange {
                setting: "access_token_ttl".to_string()
            })
        );

        let config = TokenServiceConfig {
            refresh_token_ttl: Duration::MAX,
            ..valid()
        };
        assert_eq!(
            config.validate_lifetimes(),
            Err(ConfigError::LifetimeOutOfRange {
                setting: "refresh_token_ttl".to_string()
            })
        );
    }

    #[test]
    fn test_from_jwt_config_rejects_unrepresentable_seconds() {
        let mut jwt = JwtConfig::new("s".repeat(40));
        jwt.access_token_expiry = i64::MAX;

        assert_eq!(
            TokenServiceConfig::try_from(&jwt).unwrap_err(),
            ConfigError::LifetimeOutOfRange {
                setting: "access_token_expiry".to_string()
            }
        );
    }
}
