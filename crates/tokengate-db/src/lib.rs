//! # tokengate-db
//!
//! Database layer implementing the store traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! - Connection pool management
//! - Schema bootstrap
//! - Database models with SQLx `FromRow` derives
//! - Model → entity mappers
//! - `PgUserRepository` and `PgSessionStore`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tokengate_db::{apply_schema, create_pool, DatabaseConfig, PgSessionStore};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::default()).await?;
//!     apply_schema(&pool).await?;
//!     let sessions = PgSessionStore::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;
pub mod schema;

// Re-export commonly used types
pub use pool::{create_pool, DatabaseConfig, PgPool};
pub use repositories::{PgSessionStore, PgUserRepository};
pub use schema::apply_schema;
