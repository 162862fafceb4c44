use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::models::Passport;

/// Errors that can occur while authenticating a caller
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Malformed authorization header")]
    InvalidToken,

    #[error("Token rejected: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid username or password")]
    InvalidCredentials,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    passport: Passport,
    exp: usize,
    iat: usize,
}

/// Issues and verifies HS256 access tokens
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: u64,
}

impl TokenService {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    pub fn issue(&self, passport: &Passport) -> Result<String, AuthError> {
        let now = chrono::Utc::now().timestamp().max(0) as usize;
        let claims = Claims {
            passport: *passport,
            exp: now + self.ttl_secs as usize,
            iat: now,
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Check signature and expiry, returning the embedded passport
    pub fn verify(&self, token: &str) -> Result<Passport, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact: a token lives for the configured TTL, no grace period
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(data.claims.passport)
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` value
pub fn extract_bearer(header: &str) -> Result<&str, AuthError> {
    let mut parts = header.trim().splitn(2, ' ');
    let scheme = parts.next().unwrap_or_default();
    let token = parts.next().map(str::trim).unwrap_or_default();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AuthError::InvalidToken);
    }

    Ok(token)
}

pub fn new_salt() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Hex SHA-256 of salt followed by password
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn verify_password(password: &str, salt: &str, expected_hash: &str) -> bool {
    hash_password(password, salt) == expected_hash
}
