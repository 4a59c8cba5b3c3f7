//! Business logic services
//!
//! Authentication flows and the request-time credential pipeline, written
//! against the store traits in `tokengate-core`.

pub mod auth;
pub mod context;
pub mod credentials;

pub use auth::{AuthService, AuthSession, LogoutOutcome};
pub use context::{ServiceContext, ServiceContextBuilder};
pub use credentials::{CredentialPipeline, PresentedCredentials, ResolvedCaller};
