//! Refresh token database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for refresh_tokens table
#[derive(Clone, FromRow)]
pub struct RefreshTokenModel {
    pub id: i64,
    pub user_id: i64,
    pub token: String,
    pub revoked: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
