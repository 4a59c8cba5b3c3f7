//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation (PostgreSQL in production, in-memory in tests).

use async_trait::async_trait;
use chrono::Duration;

use crate::entities::{NewUser, RefreshTokenRecord, User};
use crate::error::DomainError;
use crate::value_objects::UserId;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Find user by username
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;

    /// Find a user holding either the given username or the given email
    ///
    /// When two different users match, the email holder is returned.
    async fn find_by_email_or_username(
        &self,
        username: &str,
        email: &str,
    ) -> RepoResult<Option<User>>;

    /// Create a new user
    ///
    /// A collision on email or username is reported as
    /// `EmailAlreadyExists` / `UsernameAlreadyExists`.
    async fn create(&self, user: &NewUser, password_hash: &str) -> RepoResult<User>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: UserId) -> RepoResult<Option<String>>;

    /// Delete a user; their refresh tokens go with them
    async fn delete(&self, id: UserId) -> RepoResult<()>;
}

// ============================================================================
// Session Store
// ============================================================================

/// Refresh-token records with revocation and rotation state
///
/// Every method commits or rolls back as one unit.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a new record for `user_id` expiring `ttl` from now
    ///
    /// A token value that already exists fails with `DuplicateRefreshToken`.
    async fn create(&self, user_id: UserId, token: &str, ttl: Duration)
        -> RepoResult<RefreshTokenRecord>;

    /// Look up a record by its exact token value
    async fn find_by_token(&self, token: &str) -> RepoResult<Option<RefreshTokenRecord>>;

    /// Mark the record holding `token` revoked
    ///
    /// Returns `false` when there was nothing to revoke (unknown or already revoked).
    async fn revoke(&self, token: &str) -> RepoResult<bool>;

    /// Replace token value and expiry on record `id`
    ///
    /// Applies only while the record still holds `expected_token` and is not
    /// revoked; otherwise nothing changes and `None` is returned. Concurrent
    /// calls with the same `expected_token` have at most one winner.
    async fn rotate(
        &self,
        id: i64,
        expected_token: &str,
        new_token: &str,
        ttl: Duration,
    ) -> RepoResult<Option<RefreshTokenRecord>>;

    /// Number of records owned by a user, revoked ones included
    ///
    /// No request path calls this. It lets store and service tests check
    /// that rotation updates one record in place instead of inserting.
    async fn count_for_user(&self, user_id: UserId) -> RepoResult<i64>;
}
