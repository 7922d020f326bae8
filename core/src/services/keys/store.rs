//! Key store contract shared by the rotating and fixed-key variants

use crate::domain::entities::KeyMetadata;
use crate::errors::KeyStoreError;

/// Source of HMAC signing keys for token issuance and verification
///
/// Implementations must be safe to share across threads. Reads may run
/// concurrently; `rotate_key` and `revoke_key` must be atomic with respect to
/// every read, so no caller ever observes zero or two active keys once the
/// store is initialised.
pub trait KeyStore: Send + Sync {
    /// Returns the key material for `key_id`
    ///
    /// Fails with [`KeyStoreError::KeyNotFound`] when the id is empty, unknown,
    /// or names a revoked key.
    fn get_signing_key(&self, key_id: &str) -> Result<Vec<u8>, KeyStoreError>;

    /// Returns the id of the key used for new issuance
    fn get_current_key_id(&self) -> Result<String, KeyStoreError>;

    /// Returns the current key's id together with its material
    ///
    /// Stores that can read both under one lock should override this so a
    /// concurrent rotation cannot slip between the two lookups.
    fn current_signing_key(&self) -> Result<(String, Vec<u8>), KeyStoreError> {
        let key_id = self.get_current_key_id()?;
        let material = self.get_signing_key(&key_id)?;
        Ok((key_id, material))
    }

    /// Returns every id eligible for verification (active and grace period)
    fn list_active_key_ids(&self) -> Result<Vec<String>, KeyStoreError>;

    /// Installs a freshly generated key as active, demoting the previous one
    ///
    /// Returns the new key's id and material.
    fn rotate_key(&self) -> Result<(String, Vec<u8>), KeyStoreError>;

    /// Returns an owned copy of the key's metadata
    fn get_key_metadata(&self, key_id: &str) -> Result<KeyMetadata, KeyStoreError>;

    /// Revokes a key that is no longer active
    ///
    /// Revoking the current active key is refused with
    /// [`KeyStoreError::CannotRevokeActiveKey`]; rotate first.
    fn revoke_key(&self, key_id: &str) -> Result<(), KeyStoreError>;
}
