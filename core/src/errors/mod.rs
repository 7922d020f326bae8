//! Domain-specific error types and error handling.

mod types;

#[cfg(test)]
mod tests;

pub use types::{ConfigError, KeyStoreError, TokenError, ValidationError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    KeyStore(#[from] KeyStoreError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    ValidationErr(#[from] ValidationError),
}

impl DomainError {
    /// Stable machine-readable code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            DomainError::Internal { .. } => "INTERNAL_ERROR",
            DomainError::Config(e) => match e {
                ConfigError::EmptySecret => "EMPTY_SECRET",
                ConfigError::SecretTooShort { .. } => "SECRET_TOO_SHORT",
                ConfigError::InvalidAccessTokenLifetime => "INVALID_ACCESS_TOKEN_LIFETIME",
                ConfigError::InvalidRefreshTokenLifetime => "INVALID_REFRESH_TOKEN_LIFETIME",
                ConfigError::LifetimeOutOfRange { .. } => "LIFETIME_OUT_OF_RANGE",
                ConfigError::InvalidGracePeriod => "INVALID_GRACE_PERIOD",
            },
            DomainError::KeyStore(e) => match e {
                KeyStoreError::KeyNotFound { .. } => "KEY_NOT_FOUND",
                KeyStoreError::InvalidKeyId => "INVALID_KEY_ID",
                KeyStoreError::NoActiveKeys => "NO_ACTIVE_KEYS",
                KeyStoreError::KeyAlreadyRevoked { .. } => "KEY_ALREADY_REVOKED",
                KeyStoreError::CannotRevokeActiveKey { .. } => "CANNOT_REVOKE_ACTIVE_KEY",
                KeyStoreError::NotSupported { .. } => "OPERATION_NOT_SUPPORTED",
                KeyStoreError::LockPoisoned => "KEY_STORE_UNAVAILABLE",
            },
            DomainError::Token(e) => match e {
                TokenError::InvalidToken => "INVALID_TOKEN",
                TokenError::TokenExpired => "TOKEN_EXPIRED",
                TokenError::InvalidTokenType { .. } => "INVALID_TOKEN_TYPE",
                TokenError::TokenGenerationFailed => "TOKEN_GENERATION_FAILED",
            },
            DomainError::ValidationErr(ValidationError::RequiredField { .. }) => "REQUIRED_FIELD",
        }
    }

    /// Whether this error should be answered with a 401-style response
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            DomainError::Token(
                TokenError::InvalidToken
                    | TokenError::TokenExpired
                    | TokenError::InvalidTokenType { .. }
            )
        )
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
