//! In-memory store implementations for tests
//!
//! Each store keeps its rows behind one `parking_lot::Mutex`, which is the
//! serialization point for concurrent calls.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use parking_lot::Mutex;

use tokengate_core::traits::{RepoResult, SessionStore, UserRepository};
use tokengate_core::{DomainError, NewUser, RefreshTokenRecord, User, UserId};

// ============================================================================
// Users
// ============================================================================

#[derive(Default)]
struct UserRows {
    next_id: i64,
    rows: Vec<(User, String)>,
}

/// `UserRepository` backed by a vector
#[derive(Default)]
pub struct MemoryUserRepository {
    inner: Mutex<UserRows>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn find(&self, pred: impl Fn(&User) -> bool) -> Option<User> {
        self.inner
            .lock()
            .rows
            .iter()
            .find(|(user, _)| pred(user))
            .map(|(user, _)| user.clone())
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        Ok(self.find(|u| u.id == id))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self.find(|u| u.email == email))
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        Ok(self.find(|u| u.username == username))
    }

    async fn find_by_email_or_username(
        &self,
        username: &str,
        email: &str,
    ) -> RepoResult<Option<User>> {
        Ok(self
            .find(|u| u.email == email)
            .or_else(|| self.find(|u| u.username == username)))
    }

    async fn create(&self, user: &NewUser, password_hash: &str) -> RepoResult<User> {
        let mut inner = self.inner.lock();
        if inner.rows.iter().any(|(u, _)| u.email == user.email) {
            return Err(DomainError::EmailAlreadyExists);
        }
        if inner.rows.iter().any(|(u, _)| u.username == user.username) {
            return Err(DomainError::UsernameAlreadyExists);
        }

        inner.next_id += 1;
        let now = Utc::now();
        let created = User {
            id: UserId::new(inner.next_id),
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        inner.rows.push((created.clone(), password_hash.to_string()));
        Ok(created)
    }

    async fn get_password_hash(&self, id: UserId) -> RepoResult<Option<String>> {
        Ok(self
            .inner
            .lock()
            .rows
            .iter()
            .find(|(u, _)| u.id == id)
            .map(|(_, hash)| hash.clone()))
    }

    async fn delete(&self, id: UserId) -> RepoResult<()> {
        let mut inner = self.inner.lock();
        let before = inner.rows.len();
        inner.rows.retain(|(u, _)| u.id != id);
        if inner.rows.len() == before {
            return Err(DomainError::UserNotFound(id));
        }
        Ok(())
    }
}

// ============================================================================
// Sessions
// ============================================================================

#[derive(Default)]
struct SessionRows {
    next_id: i64,
    rows: Vec<RefreshTokenRecord>,
    failing: bool,
}

impl SessionRows {
    fn check(&self) -> RepoResult<()> {
        if self.failing {
            return Err(DomainError::DatabaseError("session store unavailable".to_string()));
        }
        Ok(())
    }
}

/// `SessionStore` backed by a vector
#[derive(Default)]
pub struct MemorySessionStore {
    inner: Mutex<SessionRows>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call fail with a database error
    pub fn set_failing(&self, failing: bool) {
        self.inner.lock().failing = failing;
    }

    /// Total number of records, revoked ones included
    pub fn len(&self) -> usize {
        self.inner.lock().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(
        &self,
        user_id: UserId,
        token: &str,
        ttl: Duration,
    ) -> RepoResult<RefreshTokenRecord> {
        let mut inner = self.inner.lock();
        inner.check()?;
        if inner.rows.iter().any(|r| r.token == token) {
            return Err(DomainError::DuplicateRefreshToken);
        }

        inner.next_id += 1;
        let now = Utc::now();
        let record = RefreshTokenRecord {
            id: inner.next_id,
            user_id,
            token: token.to_string(),
            revoked: false,
            expires_at: now + ttl,
            created_at: now,
            updated_at: now,
        };
        inner.rows.push(record.clone());
        Ok(record)
    }

    async fn find_by_token(&self, token: &str) -> RepoResult<Option<RefreshTokenRecord>> {
        let inner = self.inner.lock();
        inner.check()?;
        Ok(inner.rows.iter().find(|r| r.token == token).cloned())
    }

    async fn revoke(&self, token: &str) -> RepoResult<bool> {
        let mut inner = self.inner.lock();
        inner.check()?;
        match inner.rows.iter_mut().find(|r| r.token == token && !r.revoked) {
            Some(record) => {
                record.revoked = true;
                record.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn rotate(
        &self,
        id: i64,
        expected_token: &str,
        new_token: &str,
        ttl: Duration,
    ) -> RepoResult<Option<RefreshTokenRecord>> {
        let mut inner = self.inner.lock();
        inner.check()?;
        if inner.rows.iter().any(|r| r.id != id && r.token == new_token) {
            return Err(DomainError::DuplicateRefreshToken);
        }

        let Some(record) = inner.rows.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        if record.revoked || record.token != expected_token {
            return Ok(None);
        }

        let now = Utc::now();
        record.token = new_token.to_string();
        record.expires_at = now + ttl;
        record.updated_at = now;
        Ok(Some(record.clone()))
    }

    async fn count_for_user(&self, user_id: UserId) -> RepoResult<i64> {
        let inner = self.inner.lock();
        inner.check()?;
        Ok(inner.rows.iter().filter(|r| r.user_id == user_id).count() as i64)
    }
}
