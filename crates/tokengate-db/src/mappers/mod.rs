//! Model to entity mappers
//!
//! Conversions from database rows to the domain types in `tokengate-core`.

mod refresh_token;
mod user;
