//! Fixed single-key store for static-secret deployments

use chrono::{DateTime, Utc};

use crate::domain::entities::{KeyMetadata, KeyStatus, SIGNING_ALGORITHM, MIN_KEY_LENGTH};
use crate::errors::{ConfigError, KeyStoreError};

use super::store::KeyStore;

/// Key id reported for the fixed key
pub const STATIC_KEY_ID: &str = "static";

/// Key store over one pre-supplied secret
///
/// Lookups by [`STATIC_KEY_ID`] or by the empty id both resolve to the secret,
/// so tokens minted before `kid` tagging still verify. Rotation and revocation
/// are not supported.
#[derive(Clone)]
pub struct StaticKeyStore {
    secret: Vec<u8>,
    created_at: DateTime<Utc>,
}

impl std::fmt::Debug for StaticKeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticKeyStore")
            .field("key_id", &STATIC_KEY_ID)
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl StaticKeyStore {
    /// Creates a store from a secret of at least [`MIN_KEY_LENGTH`] bytes
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        if secret.len() < MIN_KEY_LENGTH {
            return Err(ConfigError::SecretTooShort {
                min: MIN_KEY_LENGTH,
                actual: secret.len(),
            });
        }

        Ok(Self {
            secret,
            created_at: Utc::now(),
        })
    }

    fn resolves(key_id: &str) -> bool {
        key_id.is_empty() || key_id == STATIC_KEY_ID
    }

    fn not_found(key_id: &str) -> KeyStoreError {
        KeyStoreError::KeyNotFound {
            key_id: key_id.to_string(),
        }
    }
}

impl KeyStore for StaticKeyStore {
    fn get_signing_key(&self, key_id: &str) -> Result<Vec<u8>, KeyStoreError> {
        if Self::resolves(key_id) {
            Ok(self.secret.clone())
        } else {
            Err(Self::not_found(key_id))
        }
    }

    fn get_current_key_id(&self) -> Result<String, KeyStoreError> {
        Ok(STATIC_KEY_ID.to_string())
    }

    fn list_active_key_ids(&self) -> Result<Vec<String>, KeyStoreError> {
        Ok(vec![STATIC_KEY_ID.to_string()])
    }

    fn rotate_key(&self) -> Result<(String, Vec<u8>), KeyStoreError> {
        Err(KeyStoreError::NotSupported {
            operation: "rotate_key".to_string(),
        })
    }

    fn get_key_metadata(&self, key_id: &str) -> Result<KeyMetadata, KeyStoreError> {
        if !Self::resolves(key_id) {
            return Err(Self::not_found(key_id));
        }

        Ok(KeyMetadata {
            key_id: STATIC_KEY_ID.to_string(),
            algorithm: SIGNING_ALGORITHM.to_string(),
            version: 1,
            status: KeyStatus::Active,
            created_at: self.created_at,
            rotated_at: None,
            revoked_at: None,
        })
    }

    fn revoke_key(&self, _key_id: &str) -> Result<(), KeyStoreError> {
        Err(KeyStoreError::NotSupported {
            operation: "revoke_key".to_string(),
        })
    }
}
