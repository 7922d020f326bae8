//! Domain entities representing core business objects.

pub mod signing_key;
pub mod token;

// Re-export commonly used types
pub use signing_key::{
    generate_key_material, KeyMetadata, KeyStatus, SigningKey, MIN_KEY_LENGTH, SIGNING_ALGORITHM,
};
pub use token::{
    Claims, TokenPair, TokenType, ACCESS_TOKEN_EXPIRY_MINUTES, JWT_ISSUER,
    REFRESH_TOKEN_EXPIRY_DAYS,
};
