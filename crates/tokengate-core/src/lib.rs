//! # tokengate-core
//!
//! Domain layer containing identities, refresh-token records, and the store traits
//! the service layer is written against. No infrastructure dependencies live here.

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{NewUser, RefreshTokenRecord, Role, RoleParseError, User};
pub use error::DomainError;
pub use traits::{RepoResult, SessionStore, UserRepository};
pub use value_objects::{UserId, UserIdParseError};
