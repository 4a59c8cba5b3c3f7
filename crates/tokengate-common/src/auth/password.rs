//! Password hashing and verification
//!
//! Uses Argon2id with a random salt per hash, stored in PHC string format.

use std::borrow::Cow;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::error::AppError;

/// Secrets longer than this many bytes are reduced with SHA-256 first
pub const PREHASH_THRESHOLD: usize = 256;

const PREHASH_PREFIX: &str = "sha256:";

const DUMMY_SECRET: &str = "tokengate-dummy-credential";

/// One-way hashing of user secrets
pub trait CredentialHasher: Send + Sync {
    /// Hash a secret for storage
    fn hash(&self, secret: &str) -> Result<String, AppError>;

    /// Check a secret against a stored digest
    ///
    /// A malformed digest is an error, not a mismatch.
    fn verify(&self, secret: &str, digest: &str) -> Result<bool, AppError>;

    /// Spend the same effort as a real `verify` without a stored digest
    ///
    /// Called when the identity is unknown so both failure paths cost the same.
    fn verify_dummy(&self, secret: &str);
}

/// Argon2id credential hasher
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
    dummy_digest: Option<String>,
}

impl Argon2Hasher {
    /// Create a hasher with the crate's default (OWASP-level) parameters
    #[must_use]
    pub fn new() -> Self {
        Self::from_argon2(Argon2::default())
    }

    /// Create a hasher with explicit memory (KiB), iteration and lane costs
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self, AppError> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| AppError::Config(format!("Invalid Argon2 parameters: {e}")))?;
        Ok(Self::from_argon2(Argon2::new(
            Algorithm::Argon2id,
            Version::V0x13,
            params,
        )))
    }

    /// Minimum-cost parameters, for tests only
    pub fn low_cost() -> Result<Self, AppError> {
        Self::with_params(Params::MIN_M_COST, Params::MIN_T_COST, Params::MIN_P_COST)
    }

    fn from_argon2(argon2: Argon2<'static>) -> Self {
        let mut hasher = Self {
            argon2,
            dummy_digest: None,
        };
        match hasher.hash(DUMMY_SECRET) {
            Ok(digest) => hasher.dummy_digest = Some(digest),
            Err(e) => warn!(error = %e, "Dummy digest unavailable"),
        }
        hasher
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Argon2Hasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Argon2Hasher").finish_non_exhaustive()
    }
}

/// Bytes actually fed to Argon2
///
/// Long secrets are replaced by a prefixed hex SHA-256 digest so any length
/// hashes and verifies identically.
fn normalize(secret: &str) -> Cow<'_, [u8]> {
    if secret.len() > PREHASH_THRESHOLD {
        let digest = hex::encode(Sha256::digest(secret.as_bytes()));
        Cow::Owned(format!("{PREHASH_PREFIX}{digest}").into_bytes())
    } else {
        Cow::Borrowed(secret.as_bytes())
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, secret: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(&normalize(secret), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {e}")))
    }

    fn verify(&self, secret: &str, digest: &str) -> Result<bool, AppError> {
        let parsed_hash = PasswordHash::new(digest)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash format: {e}")))?;

        Ok(self
            .argon2
            .verify_password(&normalize(secret), &parsed_hash)
            .is_ok())
    }

    fn verify_dummy(&self, secret: &str) {
        if let Some(digest) = &self.dummy_digest {
            let _ = self.verify(secret, digest);
        }
    }
}
