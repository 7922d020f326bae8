//! Rotation-capable in-memory key store

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{info, warn};

use crate::domain::entities::{KeyMetadata, KeyStatus, SigningKey};
use crate::errors::KeyStoreError;

use super::key_id::KeyIdScheme;
use super::store::KeyStore;

/// Configuration for the in-memory key store
#[derive(Debug, Clone, Default)]
pub struct KeyStoreConfig {
    /// Naming scheme for newly minted keys
    pub key_id_scheme: KeyIdScheme,
}

/// Everything guarded by the store's lock
struct KeyRing {
    keys: HashMap<String, SigningKey>,
    current_key_id: Option<String>,
    next_version: u64,
    scheme: KeyIdScheme,
}

impl KeyRing {
    fn new(scheme: KeyIdScheme) -> Self {
        Self {
            keys: HashMap::new(),
            current_key_id: None,
            next_version: 1,
            scheme,
        }
    }

    /// Generates the next key and makes it current, demoting the old one
    fn install_new_key(&mut self, now: DateTime<Utc>) -> &SigningKey {
        let version = self.next_version;
        self.next_version += 1;
        let key_id = self.scheme.key_id(version, now);

        if let Some(previous_id) = self.current_key_id.take() {
            if let Some(previous) = self.keys.get_mut(&previous_id) {
                previous.demote(now);
            }
        }

        self.keys
            .insert(key_id.clone(), SigningKey::generate(key_id.clone(), version, now));
        self.current_key_id = Some(key_id.clone());
        &self.keys[&key_id]
    }

    /// Installs a new key and logs the transition; returns its id and material
    fn rotate(&mut self, now: DateTime<Utc>) -> (String, Vec<u8>) {
        let previous = self.current_key_id.clone();
        let key = self.install_new_key(now);
        let rotated = (key.key_id().to_string(), key.material().to_vec());

        info!(
            key_id = %rotated.0,
            version = key.metadata().version,
            previous_key_id = ?previous,
            event = "signing_key_rotated",
            "Signing key rotated"
        );

        rotated
    }

    fn verifiable(&self, key_id: &str) -> Option<&SigningKey> {
        self.keys
            .get(key_id)
            .filter(|key| key.status().is_verifiable())
    }

    fn current(&self) -> Result<&SigningKey, KeyStoreError> {
        self.current_key_id
            .as_ref()
            .and_then(|id| self.keys.get(id))
            .ok_or(KeyStoreError::NoActiveKeys)
    }

    fn metadata_by_version(&self) -> Vec<KeyMetadata> {
        let mut all: Vec<KeyMetadata> = self.keys.values().map(|k| k.metadata().clone()).collect();
        all.sort_by_key(|m| m.version);
        all
    }
}

/// In-memory key store supporting rotation and revocation
///
/// A single reader/writer lock guards the key map, the current-key pointer and
/// the version counter together, so rotation is observed atomically.
pub struct InMemoryKeyStore {
    ring: RwLock<KeyRing>,
}

impl std::fmt::Debug for InMemoryKeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("InMemoryKeyStore");
        if let Ok(ring) = self.ring.read() {
            s.field("current_key_id", &ring.current_key_id)
                .field("key_count", &ring.keys.len());
        }
        s.finish()
    }
}

impl Default for InMemoryKeyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryKeyStore {
    /// Creates a store holding one freshly generated active key (`v1`)
    pub fn new() -> Self {
        Self::with_config(KeyStoreConfig::default())
    }

    /// Creates an initialised store with the given configuration
    pub fn with_config(config: KeyStoreConfig) -> Self {
        let mut ring = KeyRing::new(config.key_id_scheme);
        let initial = ring.install_new_key(Utc::now());
        info!(
            key_id = initial.key_id(),
            version = initial.metadata().version,
            event = "signing_key_created",
            "Initial signing key created"
        );

        Self {
            ring: RwLock::new(ring),
        }
    }

    /// Creates a store with no keys; the first `rotate_key` initialises it
    pub fn empty(config: KeyStoreConfig) -> Self {
        Self {
            ring: RwLock::new(KeyRing::new(config.key_id_scheme)),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, KeyRing>, KeyStoreError> {
        self.ring.read().map_err(|_| KeyStoreError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, KeyRing>, KeyStoreError> {
        self.ring.write().map_err(|_| KeyStoreError::LockPoisoned)
    }

    /// Metadata of every key, revoked ones included, ordered by version
    pub fn list_key_metadata(&self) -> Result<Vec<KeyMetadata>, KeyStoreError> {
        Ok(self.read()?.metadata_by_version())
    }

    /// Metadata of the current active key
    pub fn current_key_metadata(&self) -> Result<KeyMetadata, KeyStoreError> {
        Ok(self.read()?.current()?.metadata().clone())
    }

    /// Whether the active key is older than `max_age`
    pub fn should_rotate(&self, max_age: Duration) -> Result<bool, KeyStoreError> {
        let current = self.current_key_metadata()?;
        Ok(current.age(Utc::now()) >= max_age)
    }

    /// Rotates only if the active key is at least `max_age` old
    ///
    /// The age check and the rotation share one write lock, so a rotation
    /// made by another caller in between is seen and not repeated.
    pub fn rotate_if_older_than(&self, max_age: Duration) -> Result<Option<(String, Vec<u8>)>, KeyStoreError> {
        self.rotate_if_older_than_at(max_age, Utc::now())
    }

    pub(crate) fn rotate_if_older_than_at(
        &self,
        max_age: Duration,
        now: DateTime<Utc>,
    ) -> Result<Option<(String, Vec<u8>)>, KeyStoreError> {
        let mut ring = self.write()?;
        if ring.current()?.metadata().age(now) < max_age {
            return Ok(None);
        }
        Ok(Some(ring.rotate(now)))
    }

    /// Revokes grace-period keys that were superseded more than `grace_period` ago
    ///
    /// Returns the ids revoked by this call.
    pub fn revoke_expired_grace_keys(&self, grace_period: Duration) -> Result<Vec<String>, KeyStoreError> {
        let now = Utc::now();
        let mut ring = self.write()?;

        let mut revoked: Vec<(u64, String)> = Vec::new();
        for key in ring.keys.values_mut() {
            let expired = key.status() == KeyStatus::GracePeriod
                && key
                    .metadata()
                    .rotated_at
                    .map_or(false, |rotated_at| now - rotated_at >= grace_period);
            if expired {
                key.revoke(now);
                revoked.push((key.metadata().version, key.key_id().to_string()));
            }
        }
        revoked.sort();

        for (version, key_id) in &revoked {
            info!(
                key_id = %key_id,
                version = version,
                event = "signing_key_revoked",
                reason = "grace_period_elapsed",
                "Signing key revoked"
            );
        }

        Ok(revoked.into_iter().map(|(_, id)| id).collect())
    }

    /// Total number of keys held, revoked ones included
    pub fn key_count(&self) -> Result<usize, KeyStoreError> {
        Ok(self.read()?.keys.len())
    }
}

impl KeyStore for InMemoryKeyStore {
    fn get_signing_key(&self, key_id: &str) -> Result<Vec<u8>, KeyStoreError> {
        let not_found = || KeyStoreError::KeyNotFound {
            key_id: key_id.to_string(),
        };
        if key_id.is_empty() {
            return Err(not_found());
        }

        self.read()?
            .verifiable(key_id)
            .map(|key| key.material().to_vec())
            .ok_or_else(not_found)
    }

    fn get_current_key_id(&self) -> Result<String, KeyStoreError> {
        Ok(self.read()?.current()?.key_id().to_string())
    }

    fn current_signing_key(&self) -> Result<(String, Vec<u8>), KeyStoreError> {
        let ring = self.read()?;
        let key = ring.current()?;
        Ok((key.key_id().to_string(), key.material().to_vec()))
    }

    fn list_active_key_ids(&self) -> Result<Vec<String>, KeyStoreError> {
        let ids: Vec<String> = self
            .read()?
            .metadata_by_version()
            .into_iter()
            .filter(|m| m.status.is_verifiable())
            .map(|m| m.key_id)
            .collect();

        if ids.is_empty() {
            return Err(KeyStoreError::NoActiveKeys);
        }
        Ok(ids)
    }

    fn rotate_key(&self) -> Result<(String, Vec<u8>), KeyStoreError> {
        Ok(self.write()?.rotate(Utc::now()))
    }

    fn get_key_metadata(&self, key_id: &str) -> Result<KeyMetadata, KeyStoreError> {
        if key_id.is_empty() {
            return Err(KeyStoreError::InvalidKeyId);
        }

        self.read()?
            .keys
            .get(key_id)
            .map(|key| key.metadata().clone())
            .ok_or_else(|| KeyStoreError::KeyNotFound {
                key_id: key_id.to_string(),
            })
    }

    fn revoke_key(&self, key_id: &str) -> Result<(), KeyStoreError> {
        if key_id.is_empty() {
            return Err(KeyStoreError::InvalidKeyId);
        }

        let mut ring = self.write()?;

        if ring.current_key_id.as_deref() == Some(key_id) {
            warn!(
                key_id = key_id,
                event = "signing_key_revoke_refused",
                "Refusing to revoke the active signing key"
            );
            return Err(KeyStoreError::CannotRevokeActiveKey {
                key_id: key_id.to_string(),
            });
        }

        let key = ring
            .keys
            .get_mut(key_id)
            .ok_or_else(|| KeyStoreError::KeyNotFound {
                key_id: key_id.to_string(),
            })?;

        if key.status() == KeyStatus::Revoked {
            return Err(KeyStoreError::KeyAlreadyRevoked {
                key_id: key_id.to_string(),
            });
        }

        key.revoke(Utc::now());
        info!(
            key_id = key_id,
            version = key.metadata().version,
            event = "signing_key_revoked",
            reason = "operator",
            "Signing key revoked"
        );

        Ok(())
    }
}
