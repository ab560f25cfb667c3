use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::app_state::AppState;
use crate::error::Result;
use crate::models::UserSummary;
use crate::services::auth::IssuedToken;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserSummary,
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl From<IssuedToken> for AuthResponse {
    fn from(token: IssuedToken) -> Self {
        Self {
            user: token.user,
            access_token: token.access_token,
            token_type: "Bearer".to_string(),
            expires_in: token.expires_in,
        }
    }
}

/// POST /api/v1/auth/register
pub async fn register(
    state: web::Data<AppState>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let issued = state
        .auth
        .register(&req.username, &req.email, &req.password)
        .await?;

    Ok(HttpResponse::Created().json(AuthResponse::from(issued)))
}

/// POST /api/v1/auth/login
pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let issued = state.auth.login(&req.email, &req.password).await?;

    Ok(HttpResponse::Ok().json(AuthResponse::from(issued)))
}
