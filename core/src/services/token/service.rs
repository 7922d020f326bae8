//! Main token service implementation

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::domain::entities::{Claims, TokenPair, TokenType};
use crate::errors::{DomainError, DomainResult, TokenError, ValidationError};
use crate::services::keys::{KeyStore, StaticKeyStore};

use super::config::TokenServiceConfig;

/// Service for issuing and validating signed JWTs
///
/// Every token carries the id of the key that signed it in its `kid` header,
/// and is verified against exactly that key.
pub struct TokenService {
    key_store: Arc<dyn KeyStore>,
    config: TokenServiceConfig,
    validation: Validation,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("issuer", &self.config.issuer)
            .field("access_token_ttl", &self.config.access_token_ttl)
            .field("refresh_token_ttl", &self.config.refresh_token_ttl)
            .finish()
    }
}

impl TokenService {
    /// Creates a token service signing with the configured static secret
    ///
    /// # Arguments
    ///
    /// * `config` - Token service configuration
    ///
    /// # Returns
    ///
    /// A new `TokenService` or a configuration error
    pub fn new(config: TokenServiceConfig) -> DomainResult<Self> {
        config.validate()?;
        let store = StaticKeyStore::new(config.jwt_secret.as_bytes())?;
        Self::with_key_store(config, Arc::new(store))
    }

    /// Creates a token service over an existing key store
    ///
    /// The secret in `config` is ignored; only the lifetimes are checked.
    pub fn with_key_store(config: TokenServiceConfig, key_store: Arc<dyn KeyStore>) -> DomainResult<Self> {
        config.validate_lifetimes()?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "nbf", "iss", "sub"]);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.validate_aud = false;

        Ok(Self {
            key_store,
            config,
            validation,
        })
    }

    /// The key store backing this service
    pub fn key_store(&self) -> &Arc<dyn KeyStore> {
        &self.key_store
    }

    /// Generates an access token for a user
    ///
    /// # Arguments
    ///
    /// * `subject` - The user's UUID; must not be nil
    /// * `email` - The user's email; must not be empty
    /// * `role` - The user's role
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The signed token
    /// * `Err(DomainError)` - Invalid input, key store failure or signing failure
    pub fn generate_access_token(&self, subject: Uuid, email: &str, role: &str) -> DomainResult<String> {
        require_subject(subject)?;
        if email.is_empty() {
            return Err(required("email"));
        }

        let claims = Claims::new_access_token(
            subject,
            email,
            role,
            &self.config.issuer,
            Utc::now(),
            self.config.access_token_ttl,
        )?;
        self.encode_jwt(&claims)
    }

    /// Generates a refresh token for a user
    ///
    /// The token's `jti` is the handle callers persist to revoke it early.
    pub fn generate_refresh_token(&self, subject: Uuid) -> DomainResult<String> {
        require_subject(subject)?;

        let claims = Claims::new_refresh_token(
            subject,
            &self.config.issuer,
            Utc::now(),
            self.config.refresh_token_ttl,
        )?;
        self.encode_jwt(&claims)
    }

    /// Generates an access and a refresh token for a user
    pub fn generate_token_pair(&self, subject: Uuid, email: &str, role: &str) -> DomainResult<TokenPair> {
        require_subject(subject)?;
        if email.is_empty() {
            return Err(required("email"));
        }

        let now = Utc::now();
        let access = Claims::new_access_token(
            subject,
            email,
            role,
            &self.config.issuer,
            now,
            self.config.access_token_ttl,
        )?;
        let refresh = Claims::new_refresh_token(subject, &self.config.issuer, now, self.config.refresh_token_ttl)?;
        let refresh_expires_at = refresh
            .expires_at()
            .ok_or(DomainError::Token(TokenError::TokenGenerationFailed))?;

        Ok(TokenPair {
            access_token: self.encode_jwt(&access)?,
            refresh_token: self.encode_jwt(&refresh)?,
            refresh_token_id: refresh.jti.clone(),
            access_expires_in: self.config.access_token_ttl.num_seconds(),
            refresh_expires_in: self.config.refresh_token_ttl.num_seconds(),
            refresh_expires_at,
        })
    }

    /// Signs claims with the current key, tagging the header with its id
    pub(crate) fn encode_jwt(&self, claims: &Claims) -> DomainResult<String> {
        let (key_id, material) = self.key_store.current_signing_key()?;

        let mut header = Header::new(Algorithm::HS256);
        header.kid = Some(key_id.clone());

        let token = encode(&header, claims, &EncodingKey::from_secret(&material))
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))?;

        debug!(
            key_id = %key_id,
            token_type = %claims.token_type,
            jti = %claims.jti,
            "Token issued"
        );
        Ok(token)
    }

    /// Validates an access token and returns its claims
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - The decoded claims
    /// * `Err(TokenError::InvalidToken)` - Malformed, unknown or revoked key, bad signature
    /// * `Err(TokenError::TokenExpired)` - Authentic but past `exp`
    /// * `Err(TokenError::InvalidTokenType)` - Authentic refresh token
    pub fn validate_access_token(&self, token: &str) -> DomainResult<Claims> {
        self.validate_typed(token, TokenType::Access)
    }

    /// Validates a refresh token and returns its claims
    pub fn validate_refresh_token(&self, token: &str) -> DomainResult<Claims> {
        self.validate_typed(token, TokenType::Refresh)
    }

    /// Validates a token of either type and returns its expiry
    pub fn get_token_expiration(&self, token: &str) -> DomainResult<DateTime<Utc>> {
        let claims = self.decode_verified(token)?;
        claims
            .expires_at()
            .ok_or(DomainError::Token(TokenError::InvalidToken))
    }

    /// Reads the `kid` header without verifying the token
    ///
    /// Returns `None` for tokens minted without a key id.
    pub fn key_id_of(&self, token: &str) -> DomainResult<Option<String>> {
        let header = decode_header(token).map_err(|_| DomainError::Token(TokenError::InvalidToken))?;
        Ok(header.kid)
    }

    fn validate_typed(&self, token: &str, expected: TokenType) -> DomainResult<Claims> {
        let claims = self.decode_verified(token)?;

        if claims.token_type != expected {
            debug!(
                expected = %expected,
                actual = %claims.token_type,
                "Token type mismatch"
            );
            return Err(DomainError::Token(TokenError::InvalidTokenType {
                expected: expected.to_string(),
            }));
        }

        Ok(claims)
    }

    /// Verifies signature and registered claims against the key named by `kid`
    fn decode_verified(&self, token: &str) -> DomainResult<Claims> {
        if token.is_empty() {
            return Err(DomainError::Token(TokenError::InvalidToken));
        }

        let header = decode_header(token).map_err(|e| {
            debug!(error = %e, "Malformed token header");
            DomainError::Token(TokenError::InvalidToken)
        })?;
        let key_id = header.kid.unwrap_or_default();

        let material = self.key_store.get_signing_key(&key_id).map_err(|e| {
            debug!(key_id = %key_id, error = %e, "Token signing key unavailable");
            DomainError::Token(TokenError::InvalidToken)
        })?;

        let token_data = decode::<Claims>(token, &DecodingKey::from_secret(&material), &self.validation)
            .map_err(|e| {
                if e.kind() == &ErrorKind::ExpiredSignature {
                    DomainError::Token(TokenError::TokenExpired)
                } else {
                    debug!(key_id = %key_id, error = %e, "Token rejected");
                    DomainError::Token(TokenError::InvalidToken)
                }
            })?;

        Ok(token_data.claims)
    }
}

fn require_subject(subject: Uuid) -> DomainResult<()> {
    if subject.is_nil() {
        return Err(required("subject"));
    }
    Ok(())
}

fn required(field: &str) -> DomainError {
    DomainError::ValidationErr(ValidationError::RequiredField {
        field: field.to_string(),
    })
}
