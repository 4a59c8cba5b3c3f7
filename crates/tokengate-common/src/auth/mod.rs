//! Authentication primitives

mod jwt;
mod password;

pub use jwt::{Claims, TokenCodec, TokenError, TokenPair, TokenType};
pub use password::{Argon2Hasher, CredentialHasher, PREHASH_THRESHOLD};
