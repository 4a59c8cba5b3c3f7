//! Service context - dependency container for services
//!
//! Holds the stores, the credential hasher and the token codec.

use std::sync::Arc;

use tokengate_common::{AppError, AppResult, CredentialHasher, TokenCodec};
use tokengate_core::traits::{SessionStore, UserRepository};

/// Service context containing all dependencies
///
/// Cheap to clone; every field is shared.
#[derive(Clone)]
pub struct ServiceContext {
    user_repo: Arc<dyn UserRepository>,
    session_store: Arc<dyn SessionStore>,
    hasher: Arc<dyn CredentialHasher>,
    token_codec: Arc<TokenCodec>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        session_store: Arc<dyn SessionStore>,
        hasher: Arc<dyn CredentialHasher>,
        token_codec: Arc<TokenCodec>,
    ) -> Self {
        Self {
            user_repo,
            session_store,
            hasher,
            token_codec,
        }
    }

    /// Get the user repository
    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    /// Get the refresh-token session store
    pub fn session_store(&self) -> &dyn SessionStore {
        self.session_store.as_ref()
    }

    /// Get the credential hasher
    pub fn hasher(&self) -> &dyn CredentialHasher {
        self.hasher.as_ref()
    }

    /// Get the token codec
    pub fn token_codec(&self) -> &TokenCodec {
        self.token_codec.as_ref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("stores", &"...")
            .field("token_codec", &self.token_codec)
            .finish_non_exhaustive()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    session_store: Option<Arc<dyn SessionStore>>,
    hasher: Option<Arc<dyn CredentialHasher>>,
    token_codec: Option<Arc<TokenCodec>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.session_store = Some(store);
        self
    }

    pub fn hasher(mut self, hasher: Arc<dyn CredentialHasher>) -> Self {
        self.hasher = Some(hasher);
        self
    }

    pub fn token_codec(mut self, codec: Arc<TokenCodec>) -> Self {
        self.token_codec = Some(codec);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `AppError::Config` if any required dependency is missing
    pub fn build(self) -> AppResult<ServiceContext> {
        let missing = |name: &str| AppError::Config(format!("{name} is required"));
        Ok(ServiceContext::new(
            self.user_repo.ok_or_else(|| missing("user_repo"))?,
            self.session_store.ok_or_else(|| missing("session_store"))?,
            self.hasher.ok_or_else(|| missing("hasher"))?,
            self.token_codec.ok_or_else(|| missing("token_codec"))?,
        ))
    }
}
