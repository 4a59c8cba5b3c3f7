//! Store traits (ports) implemented by the persistence layer

mod repositories;

pub use repositories::{RepoResult, SessionStore, UserRepository};
