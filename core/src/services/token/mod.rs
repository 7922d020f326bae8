//! Token service module for JWT management
//!
//! This module handles token issuance and validation:
//! - Access and refresh token generation bound to the current signing key
//! - Verification against exactly the key named in the token's `kid` header
//! - Expiry and token type enforcement

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::TokenServiceConfig;
pub use service::TokenService;
