//! Error types for key management, token handling, configuration and input validation
//!
//! Token validation failures are deliberately coarse: a bad signature, a
//! malformed envelope and a revoked signing key all surface as
//! [`TokenError::InvalidToken`] so callers cannot tell them apart.

use thiserror::Error;

/// Configuration errors raised while constructing token services and key stores
///
/// These are fatal at startup and never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Signing secret must not be empty")]
    EmptySecret,

    #[error("Signing secret too short (min: {min} bytes, actual: {actual} bytes)")]
    SecretTooShort { min: usize, actual: usize },

    #[error("Access token lifetime must be positive")]
    InvalidAccessTokenLifetime,

    #[error("Refresh token lifetime must be positive")]
    InvalidRefreshTokenLifetime,

    #[error("{setting} is too large to represent as a timestamp")]
    LifetimeOutOfRange { setting: String },

    #[error("Key grace period must not be negative")]
    InvalidGracePeriod,
}

/// Signing key store errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyStoreError {
    #[error("Signing key not found: {key_id}")]
    KeyNotFound { key_id: String },

    #[error("Invalid key ID")]
    InvalidKeyId,

    #[error("No active signing keys")]
    NoActiveKeys,

    #[error("Signing key already revoked: {key_id}")]
    KeyAlreadyRevoked { key_id: String },

    /// Revoking the key used for issuance would strand new tokens; rotate first.
    #[error("Cannot revoke the active signing key {key_id}; rotate before revoking")]
    CannotRevokeActiveKey { key_id: String },

    #[error("Operation not supported by this key store: {operation}")]
    NotSupported { operation: String },

    #[error("Key store lock poisoned")]
    LockPoisoned,
}

/// Token issuance and validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token type: expected {expected}")]
    InvalidTokenType { expected: String },

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

/// Validation errors for caller-supplied input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field: {field}")]
    RequiredField { field: String },
}
