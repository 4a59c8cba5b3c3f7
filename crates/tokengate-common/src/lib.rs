//! # tokengate-common
//!
//! Shared utilities including configuration, error handling, token signing,
//! credential hashing, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{
    Argon2Hasher, Claims, CredentialHasher, TokenCodec, TokenError, TokenPair, TokenType,
    PREHASH_THRESHOLD,
};
pub use config::{
    AppConfig, AppSettings, ConfigError, DatabaseConfig, Environment, JwtConfig, RateLimitConfig,
    ServerConfig,
};
pub use error::{AppError, AppResult, DuplicateField, ErrorResponse};
pub use telemetry::{try_init_tracing, TracingConfig, TracingError};
