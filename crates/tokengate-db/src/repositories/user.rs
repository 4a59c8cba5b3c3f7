//! PostgreSQL implementation of UserRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use tokengate_core::traits::{RepoResult, UserRepository};
use tokengate_core::{NewUser, User, UserId};

use crate::models::UserModel;

use super::error::{map_db_error, map_unique_violation, user_conflict, user_not_found};

const USER_COLUMNS: &str =
    "id, username, email, first_name, last_name, role, created_at, updated_at";

/// PostgreSQL implementation of UserRepository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new PgUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, filter: &str, value: &str) -> RepoResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {filter} = $1");
        let result = sqlx::query_as::<_, UserModel>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(User::try_from).transpose()
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let result = sqlx::query_as::<_, UserModel>(&sql)
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(User::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        self.find_one("email", email).await
    }

    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        self.find_one("username", username).await
    }

    #[instrument(skip(self))]
    async fn find_by_email_or_username(
        &self,
        username: &str,
        email: &str,
    ) -> RepoResult<Option<User>> {
        let sql = format!(
            r"
            SELECT {USER_COLUMNS} FROM users
            WHERE email = $2 OR username = $1
            ORDER BY (email = $2) DESC
            LIMIT 1
            "
        );
        let result = sqlx::query_as::<_, UserModel>(&sql)
            .bind(username)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(User::try_from).transpose()
    }

    #[instrument(skip(self, user, password_hash), fields(username = %user.username))]
    async fn create(&self, user: &NewUser, password_hash: &str) -> RepoResult<User> {
        let sql = format!(
            r"
            INSERT INTO users (username, email, first_name, last_name, password_hash, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "
        );
        let model = sqlx::query_as::<_, UserModel>(&sql)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(password_hash)
            .bind(user.role.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, user_conflict))?;

        User::try_from(model)
    }

    #[instrument(skip(self))]
    async fn get_password_hash(&self, id: UserId) -> RepoResult<Option<String>> {
        let result = sqlx::query_scalar::<_, String>(
            r"
            SELECT password_hash FROM users WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: UserId) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            DELETE FROM users WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(id));
        }

        Ok(())
    }
}
