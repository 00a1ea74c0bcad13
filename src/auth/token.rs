//! Bearer token service.
//!
//! Issues and validates HS256 tokens. Token validation yields the caller's
//! uid and email only; the admin flag is always resolved against the role
//! store at request time, so promote/demote take effect without re-issuing
//! tokens.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const ISSUER: &str = "employee-registry";

/// Claims carried in a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Caller uid
    pub sub: String,
    pub email: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),
}

/// Token issuing and validation service.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_minutes: i64,
}

impl TokenService {
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_minutes,
        }
    }

    /// Issue a token for the given caller.
    pub fn issue(&self, uid: &str, email: &str) -> Result<String, TokenError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.ttl_minutes);

        let claims = Claims {
            sub: uid.to_string(),
            email: email.to_string(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| TokenError::GenerationFailed(e.to_string()))
    }

    /// Validate a token and decode its claims.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::ExpiredToken,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::InvalidToken(e.to_string()),
            })?;

        Ok(token_data.claims)
    }

    /// Extract the token from an `Authorization: Bearer <token>` header value.
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}
