//! # Keyturn Core
//!
//! Signing key management and JWT issuance for the Keyturn authentication layer.
//! This crate contains the key entities, the key store implementations, the token
//! service, and the error types shared by all of them.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
