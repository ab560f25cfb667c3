use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::app_state::AppState;
use crate::error::Result;
use crate::middleware::UserId;

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 5000))]
    pub content: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 2000))]
    pub content: String,
}

/// POST /api/v1/posts
pub async fn create_post(
    state: web::Data<AppState>,
    user_id: UserId,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let post = state.posts.create_post(user_id.0, &req.content).await?;

    Ok(HttpResponse::Created().json(post))
}

/// GET /api/v1/posts/feed
pub async fn get_feed(state: web::Data<AppState>, user_id: UserId) -> Result<HttpResponse> {
    let feed = state.feed.get_feed(user_id.0).await?;

    Ok(HttpResponse::Ok().json(feed))
}

/// GET /api/v1/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post = state.posts.get_post(*post_id).await?;

    Ok(HttpResponse::Ok().json(post))
}

/// POST /api/v1/posts/{id}/comments
pub async fn add_comment(
    state: web::Data<AppState>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
    req: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let post = state
        .posts
        .add_comment(*post_id, user_id.0, &req.content)
        .await?;

    Ok(HttpResponse::Created().json(post))
}
