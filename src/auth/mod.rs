use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;

pub mod password;

pub use password::{hash_password, verify_password};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingHeader,

    #[error("Authorization header must use Bearer token format")]
    InvalidScheme,

    #[error("Empty JWT token")]
    EmptyToken,

    #[error("Invalid JWT secret")]
    InvalidSecret,

    #[error("Token expiry of {0} hours is out of range")]
    InvalidExpiry(u64),

    #[error("Invalid JWT token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Password task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub account_id: i64,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(account_id: i64, expiry_hours: u64) -> Result<Self, AuthError> {
        let now = Utc::now();
        let exp = i64::try_from(expiry_hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or(AuthError::InvalidExpiry(expiry_hours))?;

        Ok(Self {
            account_id,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        })
    }
}

/// HS256 signing and verification keys
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry_hours: u64,
}

impl JwtKeys {
    pub fn new(secret: &str, expiry_hours: u64) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::InvalidSecret);
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiry_hours,
        })
    }

    pub fn from_config(security: &SecurityConfig) -> Result<Self, AuthError> {
        Self::new(&security.jwt_secret, security.jwt_expiry_hours)
    }

    pub fn generate(&self, account_id: i64) -> Result<String, AuthError> {
        let claims = Claims::new(account_id, self.expiry_hours)?;
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        let token_data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Ok(token_data.claims)
    }

    /// Account id from an `Authorization: Bearer <jwt>` header value
    pub fn extract_id(&self, authorization: Option<&str>) -> Result<i64, AuthError> {
        let header = authorization.ok_or(AuthError::MissingHeader)?;
        let token = header.strip_prefix("Bearer ").ok_or(AuthError::InvalidScheme)?;

        if token.trim().is_empty() {
            return Err(AuthError::EmptyToken);
        }

        Ok(self.decode(token.trim())?.account_id)
    }
}
