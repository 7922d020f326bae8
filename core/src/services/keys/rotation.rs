//! Background key rotation for the in-memory key store
//!
//! Rotates the active key once it reaches its maximum age, and revokes keys
//! whose grace period has elapsed so they stop verifying tokens.

use chrono::Duration;
use std::sync::Arc;
use tracing::{error, info, warn};

use kt_shared::KeyRotationSettings;

use crate::errors::{ConfigError, KeyStoreError};

use super::memory::InMemoryKeyStore;

/// Configuration for the key rotation service
#[derive(Debug, Clone)]
pub struct KeyRotationConfig {
    /// Whether to enable automatic rotation
    pub enabled: bool,
    /// How often to check the active key's age
    pub check_interval: std::time::Duration,
    /// Age at which the active key is rotated
    pub max_key_age: Duration,
    /// How long a superseded key keeps verifying tokens
    pub grace_period: Duration,
}

impl Default for KeyRotationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            check_interval: std::time::Duration::from_secs(3600), // Check every hour
            max_key_age: Duration::days(30),
            grace_period: Duration::days(7), // One refresh token lifetime
        }
    }
}

impl TryFrom<&KeyRotationSettings> for KeyRotationConfig {
    type Error = ConfigError;

    fn try_from(settings: &KeyRotationSettings) -> Result<Self, Self::Error> {
        let seconds = |setting: &str, value: i64| {
            Duration::try_seconds(value).ok_or_else(|| ConfigError::LifetimeOutOfRange {
                setting: setting.to_string(),
            })
        };

        let config = Self {
            enabled: settings.enabled,
            check_interval: std::time::Duration::from_secs(settings.check_interval.max(1)),
            max_key_age: seconds("max_key_age", settings.max_key_age)?,
            grace_period: seconds("grace_period", settings.grace_period)?,
        };
        config.validate()?;
        Ok(config)
    }
}

impl KeyRotationConfig {
    /// Rejects a negative grace period
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grace_period < Duration::zero() {
            return Err(ConfigError::InvalidGracePeriod);
        }
        Ok(())
    }
}

/// Service that keeps the key store's active key fresh
pub struct KeyRotationService {
    store: Arc<InMemoryKeyStore>,
    config: KeyRotationConfig,
}

impl KeyRotationService {
    /// Create a new key rotation service
    ///
    /// A zero grace period is accepted but means superseded keys stop
    /// verifying at the next cycle.
    pub fn new(store: Arc<InMemoryKeyStore>, config: KeyRotationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        if config.grace_period.is_zero() {
            warn!("Key grace period is zero; superseded keys are revoked on the next cycle");
        }
        Ok(Self { store, config })
    }

    /// Run a single rotation cycle
    ///
    /// 1. Revoke grace-period keys superseded more than `grace_period` ago
    /// 2. Rotate the active key if it is older than `max_key_age`
    ///
    /// Revocation runs first so a key demoted by this cycle always survives
    /// it. A failure in one step is recorded in the result and does not stop
    /// the other.
    pub fn run_rotation_cycle(&self) -> RotationResult {
        let mut result = RotationResult::default();
        if !self.config.enabled {
            return result;
        }

        match self.store.revoke_expired_grace_keys(self.config.grace_period) {
            Ok(revoked) => result.revoked = revoked,
            Err(e) => {
                error!("Failed to revoke expired grace-period keys: {}", e);
                result.errors.push(format!("Revocation error: {}", e));
            }
        }

        match self.rotate_if_due() {
            Ok(rotated_to) => result.rotated_to = rotated_to,
            Err(e) => {
                error!("Failed to rotate signing key: {}", e);
                result.errors.push(format!("Rotation error: {}", e));
            }
        }

        if result.rotated_to.is_some() || !result.revoked.is_empty() {
            info!(
                rotated_to = ?result.rotated_to,
                revoked = ?result.revoked,
                "Key rotation cycle completed"
            );
        }

        result
    }

    fn rotate_if_due(&self) -> Result<Option<String>, KeyStoreError> {
        let rotated = self.store.rotate_if_older_than(self.config.max_key_age)?;
        Ok(rotated.map(|(key_id, _)| key_id))
    }

    /// Start the rotation service as a background task
    ///
    /// This spawns a tokio task that runs a rotation cycle at every check interval.
    pub fn start_background_task(self: Arc<Self>) {
        if !self.config.enabled {
            warn!("Key rotation service is disabled");
            return;
        }

        tokio::spawn(async move {
            info!(
                "Key rotation service started - will check every {} seconds",
                self.config.check_interval.as_secs()
            );

            let mut interval_timer = tokio::time::interval(self.config.check_interval);

            loop {
                interval_timer.tick().await;

                let result = self.run_rotation_cycle();
                if !result.errors.is_empty() {
                    warn!("Key rotation cycle completed with errors: {:?}", result.errors);
                }
            }
        });
    }
}

/// Result of a rotation cycle
#[derive(Debug, Default)]
pub struct RotationResult {
    /// Id of the newly installed key, if the cycle rotated
    pub rotated_to: Option<String>,
    /// Ids revoked because their grace period elapsed
    pub revoked: Vec<String>,
    /// Any errors encountered during the cycle
    pub errors: Vec<String>,
}

impl RotationResult {
    /// Check if the cycle was successful (no errors)
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
