//! Signing key entity and its lifecycle metadata.

use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};

/// Minimum key length in bytes for HMAC-SHA256
pub const MIN_KEY_LENGTH: usize = 32;

/// Algorithm name recorded on every key
pub const SIGNING_ALGORITHM: &str = "HS256";

/// Lifecycle status of a signing key
///
/// Keys only move forward: `Active -> GracePeriod -> Revoked`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyStatus {
    /// Used for new issuance and verification
    Active,
    /// Superseded; still verifies tokens it signed
    GracePeriod,
    /// Rejected for all verification
    Revoked,
}

impl KeyStatus {
    /// Whether tokens signed by a key in this status may still verify
    pub fn is_verifiable(&self) -> bool {
        matches!(self, KeyStatus::Active | KeyStatus::GracePeriod)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            KeyStatus::Active => "active",
            KeyStatus::GracePeriod => "grace_period",
            KeyStatus::Revoked => "revoked",
        }
    }
}

impl std::fmt::Display for KeyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Public lifecycle metadata of a signing key
///
/// Always handed out by value; changing a returned copy never affects the
/// key store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMetadata {
    /// Unique key identifier, carried as `kid` in token headers
    pub key_id: String,

    /// Signing algorithm
    pub algorithm: String,

    /// Monotonic version, assigned in creation order
    pub version: u64,

    /// Current lifecycle status
    pub status: KeyStatus,

    /// When the key was created
    pub created_at: DateTime<Utc>,

    /// When the key was superseded by a newer one
    pub rotated_at: Option<DateTime<Utc>>,

    /// When the key was revoked
    pub revoked_at: Option<DateTime<Utc>>,
}

impl KeyMetadata {
    pub fn is_active(&self) -> bool {
        self.status == KeyStatus::Active
    }

    /// Time elapsed since creation
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.created_at
    }
}

/// Signing key: secret material plus metadata
#[derive(Clone)]
pub struct SigningKey {
    metadata: KeyMetadata,
    material: Vec<u8>,
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("metadata", &self.metadata)
            .field("material", &"[REDACTED]")
            .finish()
    }
}

impl SigningKey {
    /// Creates an active key from existing material
    pub fn new(
        key_id: impl Into<String>,
        version: u64,
        material: Vec<u8>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            metadata: KeyMetadata {
                key_id: key_id.into(),
                algorithm: SIGNING_ALGORITHM.to_string(),
                version,
                status: KeyStatus::Active,
                created_at,
                rotated_at: None,
                revoked_at: None,
            },
            material,
        }
    }

    /// Creates an active key with fresh random material
    pub fn generate(key_id: impl Into<String>, version: u64, created_at: DateTime<Utc>) -> Self {
        Self::new(key_id, version, generate_key_material(), created_at)
    }

    pub fn key_id(&self) -> &str {
        &self.metadata.key_id
    }

    pub fn metadata(&self) -> &KeyMetadata {
        &self.metadata
    }

    pub fn material(&self) -> &[u8] {
        &self.material
    }

    pub fn status(&self) -> KeyStatus {
        self.metadata.status
    }

    /// Moves an active key into its grace period
    pub(crate) fn demote(&mut self, now: DateTime<Utc>) {
        if self.metadata.status == KeyStatus::Active {
            self.metadata.status = KeyStatus::GracePeriod;
            self.metadata.rotated_at = Some(now);
        }
    }

    /// Marks the key revoked; material is kept for audit but never served
    pub(crate) fn revoke(&mut self, now: DateTime<Utc>) {
        self.metadata.status = KeyStatus::Revoked;
        self.metadata.revoked_at = Some(now);
    }
}

/// Generates [`MIN_KEY_LENGTH`] bytes from the OS random source
pub fn generate_key_material() -> Vec<u8> {
    let mut key = vec![0u8; MIN_KEY_LENGTH];
    OsRng.fill_bytes(&mut key);
    key
}
