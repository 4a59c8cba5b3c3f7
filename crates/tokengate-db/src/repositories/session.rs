//! PostgreSQL implementation of SessionStore

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use tokengate_core::traits::{RepoResult, SessionStore};
use tokengate_core::{DomainError, RefreshTokenRecord, UserId};
use tracing::{debug, instrument};

use crate::models::RefreshTokenModel;

use super::error::{map_db_error, map_unique_violation};

const TOKEN_COLUMNS: &str = "id, user_id, token, revoked, expires_at, created_at, updated_at";

/// PostgreSQL implementation of SessionStore
///
/// Token values are never logged; spans carry record and user ids only.
#[derive(Clone)]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    /// Create a new PgSessionStore
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    #[instrument(skip(self, token), fields(user_id = %user_id))]
    async fn create(
        &self,
        user_id: UserId,
        token: &str,
        ttl: Duration,
    ) -> RepoResult<RefreshTokenRecord> {
        let sql = format!(
            r"
            INSERT INTO refresh_tokens (user_id, token, expires_at)
            VALUES ($1, $2, $3)
            RETURNING {TOKEN_COLUMNS}
            "
        );
        let model = sqlx::query_as::<_, RefreshTokenModel>(&sql)
            .bind(user_id.into_inner())
            .bind(token)
            .bind(Utc::now() + ttl)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, |_| DomainError::DuplicateRefreshToken))?;

        debug!(record_id = model.id, "Refresh token stored");
        Ok(model.into())
    }

    #[instrument(skip(self, token))]
    async fn find_by_token(&self, token: &str) -> RepoResult<Option<RefreshTokenRecord>> {
        let sql = format!("SELECT {TOKEN_COLUMNS} FROM refresh_tokens WHERE token = $1");
        let result = sqlx::query_as::<_, RefreshTokenModel>(&sql)
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.map(RefreshTokenRecord::from))
    }

    #[instrument(skip(self, token))]
    async fn revoke(&self, token: &str) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE refresh_tokens
            SET revoked = TRUE, updated_at = NOW()
            WHERE token = $1 AND revoked = FALSE
            ",
        )
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, expected_token, new_token))]
    async fn rotate(
        &self,
        id: i64,
        expected_token: &str,
        new_token: &str,
        ttl: Duration,
    ) -> RepoResult<Option<RefreshTokenRecord>> {
        // Dropping `tx` without commit rolls back, including on cancellation
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Row lock serializes concurrent rotations of the same record
        let locked_sql =
            format!("SELECT {TOKEN_COLUMNS} FROM refresh_tokens WHERE id = $1 FOR UPDATE");
        let current = sqlx::query_as::<_, RefreshTokenModel>(&locked_sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_db_error)?;

        let Some(current) = current else {
            debug!("Rotation target no longer exists");
            return Ok(None);
        };
        if current.revoked || current.token != expected_token {
            debug!(revoked = current.revoked, "Rotation guard failed");
            return Ok(None);
        }

        let update_sql = format!(
            r"
            UPDATE refresh_tokens
            SET token = $2, expires_at = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {TOKEN_COLUMNS}
            "
        );
        let updated = sqlx::query_as::<_, RefreshTokenModel>(&update_sql)
            .bind(id)
            .bind(new_token)
            .bind(Utc::now() + ttl)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_unique_violation(e, |_| DomainError::DuplicateRefreshToken))?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(Some(updated.into()))
    }

    #[instrument(skip(self))]
    async fn count_for_user(&self, user_id: UserId) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM refresh_tokens WHERE user_id = $1
            ",
        )
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }
}
