//! Business services containing domain logic and use cases.

pub mod keys;
pub mod token;

// Re-export commonly used types
pub use keys::{
    InMemoryKeyStore, KeyIdScheme, KeyRotationConfig, KeyRotationService, KeyStore,
    KeyStoreConfig, RotationResult, StaticKeyStore, STATIC_KEY_ID,
};
pub use token::{TokenService, TokenServiceConfig};
