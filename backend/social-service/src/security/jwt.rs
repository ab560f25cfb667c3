/// Access-token generation and validation using HS256
///
/// Keys are derived from the configured secret at startup and injected
/// wherever tokens are issued or checked; there is no process-global key
/// state.
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token type: "access"
    pub token_type: String,
    /// Email address
    pub email: String,
    /// Username
    pub username: String,
}

/// Signing and validation keys plus token lifetime
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_token_ttl_secs: i64,
}

impl JwtKeys {
    pub fn from_secret(secret: &str, access_token_ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            access_token_ttl_secs,
        }
    }

    pub fn access_token_ttl_secs(&self) -> i64 {
        self.access_token_ttl_secs
    }

    /// Generate a new access token
    pub fn generate_access_token(
        &self,
        user_id: Uuid,
        email: &str,
        username: &str,
    ) -> Result<String> {
        let now = Utc::now();
        let expiry = now + Duration::seconds(self.access_token_ttl_secs);

        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            token_type: "access".to_string(),
            email: email.to_string(),
            username: username.to_string(),
        };

        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Validate a token and return its claims; non-access tokens are
    /// rejected
    pub fn validate_token(&self, token: &str) -> Result<TokenData<Claims>> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;

        if data.claims.token_type != "access" {
            return Err(AppError::Unauthorized("Not an access token".to_string()));
        }

        Ok(data)
    }
}
