//! Request-time credential resolution
//!
//! Turns whatever tokens a request carried into a caller identity, rotating
//! the session when the access token is missing or no longer valid.
//!
//! | access | refresh | access valid | outcome                     |
//! |--------|---------|--------------|-----------------------------|
//! | no     | no      | -            | `Unauthenticated`           |
//! | no     | yes     | -            | rotate, use rotated subject |
//! | yes    | any     | yes          | use access subject          |
//! | yes    | yes     | no           | rotate, use rotated subject |
//! | yes    | no      | no           | `Unauthenticated`           |

use tokengate_common::{AppError, AppResult, TokenPair, TokenType};
use tokengate_core::{User, UserId};
use tracing::{debug, instrument};

use super::auth::AuthService;
use super::context::ServiceContext;

/// Raw token strings as they arrived with a request
#[derive(Clone, Default)]
pub struct PresentedCredentials {
    pub access: Option<String>,
    pub refresh: Option<String>,
}

impl PresentedCredentials {
    fn access(&self) -> Option<&str> {
        self.access.as_deref().filter(|t| !t.is_empty())
    }

    fn refresh(&self) -> Option<&str> {
        self.refresh.as_deref().filter(|t| !t.is_empty())
    }
}

impl std::fmt::Debug for PresentedCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresentedCredentials")
            .field("access", &self.access().is_some())
            .field("refresh", &self.refresh().is_some())
            .finish()
    }
}

/// The caller behind a request
///
/// `rotated` holds the replacement pair when resolution had to rotate; the
/// transport layer is expected to hand it back to the client.
#[derive(Debug, Clone)]
pub struct ResolvedCaller {
    pub user: User,
    pub rotated: Option<TokenPair>,
}

/// Credential validation pipeline
pub struct CredentialPipeline<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CredentialPipeline<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Resolve the caller for a request
    ///
    /// Every failure is reported as `Unauthenticated` except server-side
    /// ones (storage, signing), which propagate unchanged.
    #[instrument(skip(self))]
    pub async fn resolve(&self, credentials: &PresentedCredentials) -> AppResult<ResolvedCaller> {
        match (credentials.access(), credentials.refresh()) {
            (None, None) => Err(AppError::Unauthenticated),
            (None, Some(refresh)) => self.rotate(refresh).await,
            (Some(access), refresh) => match self.access_subject(access) {
                Ok(subject) => self.load(subject).await,
                Err(reason) => {
                    debug!(%reason, "Access token rejected");
                    match refresh {
                        Some(refresh) => self.rotate(refresh).await,
                        None => Err(AppError::Unauthenticated),
                    }
                }
            },
        }
    }

    fn access_subject(&self, token: &str) -> Result<UserId, tokengate_common::TokenError> {
        self.ctx
            .token_codec()
            .decode(token, TokenType::Access)?
            .user_id()
    }

    async fn load(&self, subject: UserId) -> AppResult<ResolvedCaller> {
        let user = self
            .ctx
            .user_repo()
            .find_by_id(subject)
            .await
            .map_err(AppError::from)
            .map_err(collapse)?
            .ok_or_else(|| {
                debug!(user_id = %subject, "Token subject no longer exists");
                AppError::Unauthenticated
            })?;

        Ok(ResolvedCaller {
            user,
            rotated: None,
        })
    }

    async fn rotate(&self, refresh: &str) -> AppResult<ResolvedCaller> {
        let session = AuthService::new(self.ctx)
            .rotate(Some(refresh))
            .await
            .map_err(collapse)?;

        Ok(ResolvedCaller {
            user: session.user,
            rotated: Some(session.tokens),
        })
    }
}

fn collapse(err: AppError) -> AppError {
    if err.is_server_error() {
        err
    } else {
        debug!(reason = %err, "Credential resolution failed");
        AppError::Unauthenticated
    }
}
