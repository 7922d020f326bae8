use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{Claims, TokenType};
use crate::errors::{ConfigError, DomainError, TokenError, ValidationError};
use crate::services::keys::{InMemoryKeyStore, KeyStore, STATIC_KEY_ID};
use crate::services::token::{TokenService, TokenServiceConfig};

const SECRET: &str = "test-secret-key-with-at-least-32-bytes!";

fn test_config() -> TokenServiceConfig {
    TokenServiceConfig {
        jwt_secret: SECRET.to_string(),
        ..Default::default()
    }
}

fn static_service() -> TokenService {
    TokenService::new(test_config()).unwrap()
}

fn rotating_service() -> (TokenService, Arc<InMemoryKeyStore>) {
    let store = Arc::new(InMemoryKeyStore::new());
    let service = TokenService::with_key_store(test_config(), store.clone()).unwrap();
    (service, store)
}

fn expired_access_claims(user_id: Uuid) -> Claims {
    let issued = Utc::now() - Duration::hours(2);
    Claims::new_access_token(
        user_id,
        "user@example.com",
        "user",
        "keyturn",
        issued,
        Duration::hours(1),
    )
    .unwrap()
}

fn token_error(result: Result<impl std::fmt::Debug, DomainError>) -> TokenError {
    match result.unwrap_err() {
        DomainError::Token(e) => e,
        other => panic!("expected token error, got {:?}", other),
    }
}

#[test]
fn test_new_rejects_invalid_config() {
    let empty = TokenServiceConfig {
        jwt_secret: String::new(),
        ..test_config()
    };
    assert_eq!(
        TokenService::new(empty).unwrap_err(),
        DomainError::Config(ConfigError::EmptySecret)
    );

    let short = TokenServiceConfig {
        jwt_secret: "short".to_string(),
        ..test_config()
    };
    assert_eq!(
        TokenService::new(short).unwrap_err(),
        DomainError::Config(ConfigError::SecretTooShort { min: 32, actual: 5 })
    );

    let no_access = TokenServiceConfig {
        access_token_ttl: Duration::zero(),
        ..test_config()
    };
    assert_eq!(
        TokenService::new(no_access).unwrap_err(),
        DomainError::Config(ConfigError::InvalidAccessTokenLifetime)
    );

    let no_refresh = TokenServiceConfig {
        refresh_token_ttl: Duration::seconds(-1),
        ..test_config()
    };
    assert_eq!(
        TokenService::new(no_refresh).unwrap_err(),
        DomainError::Config(ConfigError::InvalidRefreshTokenLifetime)
    );
}

#[test]
fn test_lifetime_past_the_calendar_is_rejected_up_front() {
    let config = TokenServiceConfig {
        access_token_ttl: Duration::days(365 * 300_000),
        ..test_config()
    };
    assert_eq!(
        TokenService::new(config.clone()).unwrap_err(),
        DomainError::Config(ConfigError::LifetimeOutOfRange {
            setting: "access_token_ttl".to_string()
        })
    );

    let store: Arc<dyn KeyStore> = Arc::new(InMemoryKeyStore::new());
    assert!(matches!(
        TokenService::with_key_store(config, store),
        Err(DomainError::Config(ConfigError::LifetimeOutOfRange { .. }))
    ));
}

#[test]
fn test_with_key_store_checks_lifetimes_only() {
    let store: Arc<dyn KeyStore> = Arc::new(InMemoryKeyStore::new());

    let no_secret = TokenServiceConfig {
        jwt_secret: String::new(),
        ..test_config()
    };
    assert!(TokenService::with_key_store(no_secret, store.clone()).is_ok());

    let no_access = TokenServiceConfig {
        access_token_ttl: Duration::zero(),
        ..test_config()
    };
    assert_eq!(
        TokenService::with_key_store(no_access, store).unwrap_err(),
        DomainError::Config(ConfigError::InvalidAccessTokenLifetime)
    );
}

#[test]
fn test_access_token_round_trip() {
    let (service, _) = rotating_service();
    let user_id = Uuid::new_v4();

    let token = service
        .generate_access_token(user_id, "user@example.com", "admin")
        .unwrap();
    let claims = service.validate_access_token(&token).unwrap();

    assert_eq!(claims.user_id().unwrap(), user_id);
    assert_eq!(claims.email.as_deref(), Some("user@example.com"));
    assert_eq!(claims.role.as_deref(), Some("admin"));
    assert_eq!(claims.token_type, TokenType::Access);
    assert_eq!(claims.iss, "keyturn");
    assert_eq!(claims.nbf, claims.iat);
    assert_eq!(claims.exp - claims.iat, 15 * 60);
}

#[test]
fn test_refresh_token_has_no_email_or_role() {
    let (service, _) = rotating_service();
    let user_id = Uuid::new_v4();

    let token = service.generate_refresh_token(user_id).unwrap();
    let claims = service.validate_refresh_token(&token).unwrap();

    assert_eq!(claims.user_id().unwrap(), user_id);
    assert_eq!(claims.token_type, TokenType::Refresh);
    assert!(claims.email.is_none());
    assert!(claims.role.is_none());
    assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
}

#[test]
fn test_generate_rejects_missing_subject_and_email() {
    let service = static_service();

    assert_eq!(
        service.generate_access_token(Uuid::nil(), "user@example.com", "user").unwrap_err(),
        DomainError::ValidationErr(ValidationError::RequiredField {
            field: "subject".to_string()
        })
    );
    assert_eq!(
        service.generate_access_token(Uuid::new_v4(), "", "user").unwrap_err(),
        DomainError::ValidationErr(ValidationError::RequiredField {
            field: "email".to_string()
        })
    );
    assert_eq!(
        service.generate_refresh_token(Uuid::nil()).unwrap_err(),
        DomainError::ValidationErr(ValidationError::RequiredField {
            field: "subject".to_string()
        })
    );
}

#[test]
fn test_token_type_mismatch() {
    let (service, _) = rotating_service();
    let user_id = Uuid::new_v4();

    let access = service
        .generate_access_token(user_id, "user@example.com", "user")
        .unwrap();
    let refresh = service.generate_refresh_token(user_id).unwrap();

    assert_eq!(
        token_error(service.validate_refresh_token(&access)),
        TokenError::InvalidTokenType {
            expected: "refresh".to_string()
        }
    );
    assert_eq!(
        token_error(service.validate_access_token(&refresh)),
        TokenError::InvalidTokenType {
            expected: "access".to_string()
        }
    );
}

#[test]
fn test_expired_token_reports_expiry() {
    let (service, _) = rotating_service();
    let token = service
        .encode_jwt(&expired_access_claims(Uuid::new_v4()))
        .unwrap();

    let err = token_error(service.validate_access_token(&token));
    assert_eq!(err, TokenError::TokenExpired);
    assert!(DomainError::Token(err).is_authentication_failure());
    assert_eq!(
        token_error(service.get_token_expiration(&token)),
        TokenError::TokenExpired
    );
}

#[test]
fn test_expired_token_with_bad_signature_is_invalid() {
    let (service, _) = rotating_service();
    let token = service
        .encode_jwt(&expired_access_claims(Uuid::new_v4()))
        .unwrap();

    let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
    let first = if parts[2].starts_with('A') { "B" } else { "A" };
    let flipped = format!("{}{}", first, &parts[2][1..]);
    parts[2] = flipped;
    let tampered = parts.join(".");

    assert_eq!(
        token_error(service.validate_access_token(&tampered)),
        TokenError::InvalidToken
    );
}

#[test]
fn test_malformed_and_empty_tokens_are_invalid() {
    let service = static_service();

    for token in ["", "not-a-jwt", "a.b.c", "eyJhbGciOiJIUzI1NiJ9.e30."] {
        assert_eq!(
            token_error(service.validate_access_token(token)),
            TokenError::InvalidToken,
            "token {:?}",
            token
        );
    }
}

#[test]
fn test_tampered_payload_is_invalid() {
    let service = static_service();
    let token = service
        .generate_access_token(Uuid::new_v4(), "user@example.com", "user")
        .unwrap();
    let other = service
        .generate_access_token(Uuid::new_v4(), "admin@example.com", "admin")
        .unwrap();

    // Splice the second token's payload under the first token's signature
    let first: Vec<&str> = token.split('.').collect();
    let second: Vec<&str> = other.split('.').collect();
    let spliced = format!("{}.{}.{}", first[0], second[1], first[2]);

    assert_eq!(
        token_error(service.validate_access_token(&spliced)),
        TokenError::InvalidToken
    );
}

#[test]
fn test_wrong_issuer_is_invalid() {
    let store: Arc<dyn KeyStore> = Arc::new(InMemoryKeyStore::new());
    let issuer = TokenService::with_key_store(
        TokenServiceConfig {
            issuer: "someone-else".to_string(),
            ..test_config()
        },
        store.clone(),
    )
    .unwrap();
    let verifier = TokenService::with_key_store(test_config(), store).unwrap();

    let token = issuer
        .generate_access_token(Uuid::new_v4(), "user@example.com", "user")
        .unwrap();

    assert!(issuer.validate_access_token(&token).is_ok());
    assert_eq!(
        token_error(verifier.validate_access_token(&token)),
        TokenError::InvalidToken
    );
}

#[test]
fn test_other_algorithms_are_rejected() {
    let service = static_service();
    let claims = Claims::new_access_token(
        Uuid::new_v4(),
        "user@example.com",
        "user",
        "keyturn",
        Utc::now(),
        Duration::minutes(5),
    )
    .unwrap();
    let mut header = Header::new(Algorithm::HS512);
    header.kid = Some(STATIC_KEY_ID.to_string());
    let token = encode(&header, &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap();

    assert_eq!(
        token_error(service.validate_access_token(&token)),
        TokenError::InvalidToken
    );
}

#[test]
fn test_static_store_accepts_tokens_without_kid() {
    let service = static_service();
    let user_id = Uuid::new_v4();
    let claims = Claims::new_access_token(
        user_id,
        "user@example.com",
        "user",
        "keyturn",
        Utc::now(),
        Duration::minutes(5),
    )
    .unwrap();

    // Minted the way deployments did before key ids were tagged
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    assert_eq!(service.key_id_of(&token).unwrap(), None);
    let validated = service.validate_access_token(&token).unwrap();
    assert_eq!(validated.user_id().unwrap(), user_id);
}

#[test]
fn test_static_store_tags_tokens_with_constant_id() {
    let service = static_service();
    let token = service.generate_refresh_token(Uuid::new_v4()).unwrap();

    assert_eq!(service.key_id_of(&token).unwrap().as_deref(), Some(STATIC_KEY_ID));
    assert!(service.validate_refresh_token(&token).is_ok());
}

#[test]
fn test_rotating_store_rejects_tokens_without_kid() {
    let (service, store) = rotating_service();
    let (_, material) = store.current_signing_key().unwrap();
    let claims = Claims::new_refresh_token(Uuid::new_v4(), "keyturn", Utc::now(), Duration::days(1)).unwrap();

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(&material),
    )
    .unwrap();

    assert_eq!(
        token_error(service.validate_refresh_token(&token)),
        TokenError::InvalidToken
    );
}

#[test]
fn test_unknown_kid_is_invalid() {
    let (service, store) = rotating_service();
    let (_, material) = store.current_signing_key().unwrap();
    let claims = Claims::new_refresh_token(Uuid::new_v4(), "keyturn", Utc::now(), Duration::days(1)).unwrap();

    let mut header = Header::new(Algorithm::HS256);
    header.kid = Some("v99".to_string());
    let token = encode(&header, &claims, &EncodingKey::from_secret(&material)).unwrap();

    assert_eq!(
        token_error(service.validate_refresh_token(&token)),
        TokenError::InvalidToken
    );
}

#[test]
fn test_token_pair() {
    let (service, _) = rotating_service();
    let user_id = Uuid::new_v4();

    let pair = service
        .generate_token_pair(user_id, "user@example.com", "user")
        .unwrap();

    let access = service.validate_access_token(&pair.access_token).unwrap();
    let refresh = service.validate_refresh_token(&pair.refresh_token).unwrap();

    assert_eq!(access.sub, refresh.sub);
    assert_eq!(refresh.jti, pair.refresh_token_id);
    assert_eq!(pair.access_expires_in, 15 * 60);
    assert_eq!(pair.refresh_expires_in, 7 * 24 * 60 * 60);
    assert_eq!(pair.refresh_expires_at.timestamp(), refresh.exp);
}

#[test]
fn test_get_token_expiration() {
    let (service, _) = rotating_service();
    let before = Utc::now();

    let token = service.generate_refresh_token(Uuid::new_v4()).unwrap();
    let expires_at = service.get_token_expiration(&token).unwrap();

    let expected = before + Duration::days(7);
    assert!((expires_at - expected).num_seconds().abs() <= 1);

    assert_eq!(
        token_error(service.get_token_expiration("garbage")),
        TokenError::InvalidToken
    );
}

#[test]
fn test_key_id_of_rejects_garbage() {
    let service = static_service();
    assert_eq!(
        token_error(service.key_id_of("garbage")),
        TokenError::InvalidToken
    );
}

#[test]
fn test_generation_fails_on_empty_store() {
    let store = Arc::new(InMemoryKeyStore::empty(Default::default()));
    let service = TokenService::with_key_store(test_config(), store).unwrap();

    let err = service
        .generate_access_token(Uuid::new_v4(), "user@example.com", "user")
        .unwrap_err();
    assert_eq!(err.error_code(), "NO_ACTIVE_KEYS");
}
