//! Unit tests for domain error types

use crate::errors::{ConfigError, DomainError, KeyStoreError, TokenError, ValidationError};

#[test]
fn test_key_store_error_messages() {
    let error = KeyStoreError::KeyNotFound {
        key_id: "v7".to_string(),
    };
    assert_eq!(error.to_string(), "Signing key not found: v7");

    let error = KeyStoreError::CannotRevokeActiveKey {
        key_id: "v2".to_string(),
    };
    assert!(error.to_string().contains("rotate before revoking"));
}

#[test]
fn test_config_error_message_includes_lengths() {
    let error = ConfigError::SecretTooShort { min: 32, actual: 5 };
    let message = error.to_string();
    assert!(message.contains("32"));
    assert!(message.contains("5"));
}

#[test]
fn test_domain_error_is_transparent() {
    let error: DomainError = TokenError::TokenExpired.into();
    assert_eq!(error.to_string(), "Token expired");

    let error: DomainError = KeyStoreError::NoActiveKeys.into();
    assert_eq!(error.to_string(), "No active signing keys");
}

#[test]
fn test_error_codes() {
    let cases: Vec<(DomainError, &str)> = vec![
        (TokenError::InvalidToken.into(), "INVALID_TOKEN"),
        (TokenError::TokenExpired.into(), "TOKEN_EXPIRED"),
        (
            TokenError::InvalidTokenType {
                expected: "access".to_string(),
            }
            .into(),
            "INVALID_TOKEN_TYPE",
        ),
        (KeyStoreError::InvalidKeyId.into(), "INVALID_KEY_ID"),
        (
            KeyStoreError::KeyAlreadyRevoked {
                key_id: "v1".to_string(),
            }
            .into(),
            "KEY_ALREADY_REVOKED",
        ),
        (ConfigError::EmptySecret.into(), "EMPTY_SECRET"),
        (
            ConfigError::LifetimeOutOfRange {
                setting: "access_token_ttl".to_string(),
            }
            .into(),
            "LIFETIME_OUT_OF_RANGE",
        ),
        (ConfigError::InvalidGracePeriod.into(), "INVALID_GRACE_PERIOD"),
        (
            ValidationError::RequiredField {
                field: "email".to_string(),
            }
            .into(),
            "REQUIRED_FIELD",
        ),
    ];

    for (error, code) in cases {
        assert_eq!(error.error_code(), code);
    }
}

#[test]
fn test_authentication_failures() {
    assert!(DomainError::from(TokenError::InvalidToken).is_authentication_failure());
    assert!(DomainError::from(TokenError::TokenExpired).is_authentication_failure());
    assert!(DomainError::from(TokenError::InvalidTokenType {
        expected: "refresh".to_string(),
    })
    .is_authentication_failure());

    assert!(!DomainError::from(TokenError::TokenGenerationFailed).is_authentication_failure());
    assert!(!DomainError::from(KeyStoreError::NoActiveKeys).is_authentication_failure());
    assert!(!DomainError::from(ConfigError::EmptySecret).is_authentication_failure());
}
