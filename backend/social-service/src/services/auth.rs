/// Account service - registration and login at the auth boundary
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{User, UserSummary};
use crate::security::{password, JwtKeys};
use crate::store::GraphStore;

/// A freshly issued access token with its owner
pub struct IssuedToken {
    pub user: UserSummary,
    pub access_token: String,
    pub expires_in: i64,
}

pub struct AuthService {
    graph: Arc<dyn GraphStore>,
    keys: Arc<JwtKeys>,
}

impl AuthService {
    pub fn new(graph: Arc<dyn GraphStore>, keys: Arc<JwtKeys>) -> Self {
        Self { graph, keys }
    }

    /// Create an account and issue an access token. Duplicate email or
    /// username is a conflict.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<IssuedToken> {
        if self.graph.find_user_by_email(email).await?.is_some() {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let password_hash = password::hash_password(password)?;
        let user = self
            .graph
            .insert_user(username, email, &password_hash)
            .await?;

        self.issue(&user)
    }

    /// Verify credentials and issue an access token. Unknown email and wrong
    /// password are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedToken> {
        let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

        let user = self
            .graph
            .find_user_by_email(email)
            .await?
            .ok_or_else(invalid)?;

        if !password::verify_password(password, &user.password_hash)? {
            return Err(invalid());
        }

        self.issue(&user)
    }

    fn issue(&self, user: &User) -> Result<IssuedToken> {
        let access_token = self
            .keys
            .generate_access_token(user.id, &user.email, &user.username)?;

        Ok(IssuedToken {
            user: user.summary(),
            access_token,
            expires_in: self.keys.access_token_ttl_secs(),
        })
    }
}
