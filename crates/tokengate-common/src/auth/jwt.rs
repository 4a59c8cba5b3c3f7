//! Token codec for access and refresh tokens
//!
//! HS256 JWTs via the `jsonwebtoken` crate. Access and refresh tokens are
//! signed with separate keys, so neither kind verifies as the other.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use tokengate_core::UserId;
use uuid::Uuid;

use crate::config::JwtConfig;

/// Token type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token kind
    pub typ: TokenType,
    /// Unique token ID
    pub jti: String,
}

impl Claims {
    /// Get the subject as a UserId
    pub fn user_id(&self) -> Result<UserId, TokenError> {
        UserId::parse(&self.sub).map_err(|_| TokenError::Malformed)
    }
}

/// Why a token failed to decode
///
/// Kept for logging only; callers outside this crate see a single
/// unauthorized outcome.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    #[error("token signature mismatch")]
    InvalidSignature,

    #[error("token malformed")]
    Malformed,

    #[error("token kind mismatch")]
    WrongKind,

    #[error("token encoding failed: {0}")]
    Encoding(String),
}

/// Token pair containing access and refresh tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub refresh_expires_in: i64,
}

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKeys {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Signs and verifies access/refresh tokens
pub struct TokenCodec {
    access: SigningKeys,
    refresh: SigningKeys,
    access_ttl: Duration,
    refresh_ttl: Duration,
    validation: Validation,
}

impl TokenCodec {
    /// Build a codec from the JWT section of the app config
    #[must_use]
    pub fn new(config: &JwtConfig) -> Self {
        Self::from_secrets(
            &config.access_secret,
            &config.refresh_secret,
            config.access_ttl(),
            config.refresh_ttl(),
        )
    }

    #[must_use]
    pub fn from_secrets(
        access_secret: &str,
        refresh_secret: &str,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        Self {
            access: SigningKeys::from_secret(access_secret),
            refresh: SigningKeys::from_secret(refresh_secret),
            access_ttl,
            refresh_ttl,
            validation,
        }
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    fn keys(&self, kind: TokenType) -> &SigningKeys {
        match kind {
            TokenType::Access => &self.access,
            TokenType::Refresh => &self.refresh,
        }
    }

    /// Sign a token of `kind` for `subject`, valid for `ttl`
    pub fn issue(
        &self,
        subject: UserId,
        ttl: Duration,
        kind: TokenType,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            typ: kind,
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.keys(kind).encoding)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Verify signature, expiry and kind, returning the claims
    pub fn decode(&self, token: &str, kind: TokenType) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.keys(kind).decoding, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            },
        )?;

        if data.claims.typ != kind {
            return Err(TokenError::WrongKind);
        }

        Ok(data.claims)
    }

    /// Mint a fresh access/refresh pair with the configured lifetimes
    pub fn issue_pair(&self, subject: UserId) -> Result<TokenPair, TokenError> {
        let access_token = self.issue(subject, self.access_ttl, TokenType::Access)?;
        let refresh_token = self.issue(subject, self.refresh_ttl, TokenType::Refresh)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_ttl.num_seconds(),
            refresh_expires_in: self.refresh_ttl.num_seconds(),
        })
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}
