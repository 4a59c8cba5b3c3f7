//! Integration test utilities for tokengate
//!
//! Two harnesses drive the full router: [`TestApp`] runs requests in-process
//! over in-memory stores, [`TestServer`] binds a real listener backed by
//! PostgreSQL.

pub mod helpers;
pub mod in_process;

pub use cookies::TestCookies;
pub use fixtures::*;
pub use helpers::*;
pub use in_process::TestApp;
