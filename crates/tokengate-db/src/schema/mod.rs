//! Schema bootstrap
//!
//! Every statement is idempotent, so running it on each start is safe.

use sqlx::PgPool;
use tracing::info;

/// DDL for the `users` and `refresh_tokens` tables
pub const SCHEMA_SQL: &str = include_str!("../../migrations/0001_init.sql");

/// Create tables and indexes that do not exist yet
pub async fn apply_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA_SQL).execute(pool).await?;
    info!("Database schema ready");
    Ok(())
}
