//! Shared configuration and logging setup for Keyturn
//!
//! This crate provides common functionality used across server modules:
//! - Configuration types loaded from the environment
//! - Tracing subscriber initialisation

pub mod config;
pub mod logging;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, Environment, JwtConfig, KeyRotationSettings, LogFormat, LoggingConfig,
};
pub use logging::init_logging;
