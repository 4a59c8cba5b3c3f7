//! Repository implementations
//!
//! PostgreSQL implementations of the store traits defined in tokengate-core.

mod error;
mod session;
mod user;

pub use session::PgSessionStore;
pub use user::PgUserRepository;
