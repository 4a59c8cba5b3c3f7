//! Refresh token record - the server-side half of a login session

use chrono::{DateTime, Utc};
use std::fmt;

use crate::value_objects::UserId;

/// Persisted refresh token
///
/// One record per login. Rotation rewrites `token` and `expires_at` in place;
/// `revoked` only ever goes from false to true.
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshTokenRecord {
    pub id: i64,
    pub user_id: UserId,
    pub token: String,
    pub revoked: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    /// Check if the record has passed its absolute expiry
    #[inline]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Usable for rotation: neither revoked nor expired
    #[inline]
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && !self.is_expired_at(now)
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.is_active_at(Utc::now())
    }
}

impl fmt::Debug for RefreshTokenRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshTokenRecord")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("revoked", &self.revoked)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}
