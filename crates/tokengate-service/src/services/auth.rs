//! Authentication service
//!
//! Handles user registration, login, refresh-token rotation, and logout.

use tokengate_common::{AppError, AppResult, DuplicateField, TokenPair, TokenType};
use tokengate_core::{NewUser, User};
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use crate::dto::SignupRequest;

use super::context::ServiceContext;

/// A user together with a freshly minted token pair
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub tokens: TokenPair,
}

/// What `logout` found for the presented token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutOutcome {
    /// The live session was revoked
    Revoked,
    /// The session was revoked earlier
    AlreadyRevoked,
    /// No session holds the token: never issued, or replaced by a rotation
    NotFound,
}

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new user
    ///
    /// Email collisions are reported before username collisions.
    #[instrument(skip(self, request), fields(username = %request.username, email = %request.email))]
    pub async fn signup(&self, request: SignupRequest) -> AppResult<User> {
        request.validate().map_err(AppError::validation)?;

        if let Some(existing) = self
            .ctx
            .user_repo()
            .find_by_email_or_username(&request.username, &request.email)
            .await?
        {
            let field = if existing.email == request.email {
                DuplicateField::Email
            } else {
                DuplicateField::Username
            };
            warn!(%field, "Signup rejected: duplicate user");
            return Err(AppError::DuplicateUser { field });
        }

        let password_hash = self.ctx.hasher().hash(&request.password)?;

        let new_user = NewUser::new(request.username, request.email)
            .with_names(request.first_name, request.last_name);

        // A concurrent signup can still win the unique index
        let user = self.ctx.user_repo().create(&new_user, &password_hash).await?;

        info!(user_id = %user.id, "User registered successfully");
        Ok(user)
    }

    /// Verify an email/password pair
    ///
    /// Unknown email and wrong password fail identically.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<User> {
        let Some(user) = self.ctx.user_repo().find_by_email(email).await? else {
            self.ctx.hasher().verify_dummy(password);
            warn!("Authentication failed: unknown email");
            return Err(AppError::InvalidCredentials);
        };

        let Some(password_hash) = self.ctx.user_repo().get_password_hash(user.id).await? else {
            self.ctx.hasher().verify_dummy(password);
            warn!(user_id = %user.id, "Authentication failed: no password hash");
            return Err(AppError::InvalidCredentials);
        };

        if !self.ctx.hasher().verify(password, &password_hash)? {
            warn!(user_id = %user.id, "Authentication failed: invalid password");
            return Err(AppError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Mint an access/refresh pair for `user` without touching the store
    pub fn issue_token_pair(&self, user: &User) -> AppResult<TokenPair> {
        Ok(self.ctx.token_codec().issue_pair(user.id)?)
    }

    /// Authenticate, mint a pair and persist the refresh token as a new session
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let user = self.authenticate(email, password).await?;
        let tokens = self.issue_token_pair(&user)?;

        self.ctx
            .session_store()
            .create(
                user.id,
                &tokens.refresh_token,
                self.ctx.token_codec().refresh_ttl(),
            )
            .await?;

        info!(user_id = %user.id, "User logged in successfully");
        Ok(AuthSession { user, tokens })
    }

    /// Exchange a refresh token for a new pair, updating its session in place
    ///
    /// The stored record decides: a revoked, expired or superseded token is
    /// rejected even while its signature still verifies.
    #[instrument(skip(self, presented))]
    pub async fn rotate(&self, presented: Option<&str>) -> AppResult<AuthSession> {
        let token = presented
            .filter(|t| !t.is_empty())
            .ok_or(AppError::MissingToken)?;

        let claims = self
            .ctx
            .token_codec()
            .decode(token, TokenType::Refresh)
            .map_err(|reason| {
                debug!(%reason, "Refresh token rejected by codec");
                AppError::InvalidOrExpiredToken
            })?;
        let subject = claims.user_id()?;

        let record = self
            .ctx
            .session_store()
            .find_by_token(token)
            .await?
            .ok_or_else(|| {
                debug!(user_id = %subject, "Refresh token has no session");
                AppError::InvalidOrExpiredToken
            })?;

        if record.revoked {
            warn!(user_id = %subject, record_id = record.id, "Revoked refresh token presented");
            return Err(AppError::InvalidOrExpiredToken);
        }
        if !record.is_active() || record.user_id != subject {
            debug!(user_id = %subject, record_id = record.id, "Refresh session unusable");
            return Err(AppError::InvalidOrExpiredToken);
        }

        let user = self
            .ctx
            .user_repo()
            .find_by_id(subject)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let tokens = self.issue_token_pair(&user)?;

        self.ctx
            .session_store()
            .rotate(
                record.id,
                token,
                &tokens.refresh_token,
                self.ctx.token_codec().refresh_ttl(),
            )
            .await?
            .ok_or_else(|| {
                warn!(user_id = %user.id, record_id = record.id, "Lost rotation race");
                AppError::InvalidOrExpiredToken
            })?;

        info!(user_id = %user.id, record_id = record.id, "Refresh token rotated");
        Ok(AuthSession { user, tokens })
    }

    /// Revoke the session holding `presented`
    ///
    /// Revoking an unknown, superseded or already revoked token still
    /// succeeds; the outcome tells the cases apart. A token replaced by a
    /// rotation leaves the session alive under its new token.
    #[instrument(skip(self, presented))]
    pub async fn logout(&self, presented: Option<&str>) -> AppResult<LogoutOutcome> {
        let token = presented
            .filter(|t| !t.is_empty())
            .ok_or(AppError::MissingToken)?;
        let store = self.ctx.session_store();

        let Some(record) = store.find_by_token(token).await? else {
            warn!("Logout with a refresh token no session holds (unknown or rotated away)");
            return Ok(LogoutOutcome::NotFound);
        };
        if record.revoked {
            warn!(record_id = record.id, "Logout with an already revoked refresh token");
            return Ok(LogoutOutcome::AlreadyRevoked);
        }

        if store.revoke(token).await? {
            info!(user_id = %record.user_id, record_id = record.id, "Session revoked");
            Ok(LogoutOutcome::Revoked)
        } else {
            // Rotated or revoked between lookup and update
            warn!(record_id = record.id, "Refresh token changed before it could be revoked");
            Ok(LogoutOutcome::NotFound)
        }
    }
}
