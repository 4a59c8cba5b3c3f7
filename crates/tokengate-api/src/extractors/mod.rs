//! Axum extractors for request handling
//!
//! Custom extractors for the authenticated caller and validated bodies.

mod auth;
mod validated;

pub use auth::CurrentUser;
pub use validated::ValidatedJson;
