//! Signing key management
//!
//! This module owns the lifecycle of HMAC signing keys:
//! - The [`KeyStore`] contract consumed by the token service
//! - A rotation-capable in-memory store
//! - A fixed single-key store for static-secret deployments
//! - Background rotation and grace-period expiry

mod key_id;
mod memory;
mod rotation;
mod static_key;
mod store;


pub use key_id::{sequential_key_id, timestamped_key_id, KeyIdScheme};
pub use memory::{InMemoryKeyStore, KeyStoreConfig};
pub use rotation::{KeyRotationConfig, KeyRotationService, RotationResult};
pub use static_key::{StaticKeyStore, STATIC_KEY_ID};
pub use store::KeyStore;
