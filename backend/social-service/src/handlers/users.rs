use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::error::Result;
use crate::middleware::UserId;
use crate::models::FriendRequestStatus;

#[derive(Debug, Deserialize)]
pub struct SendFriendRequestBody {
    pub recipient_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct RespondFriendRequestBody {
    pub response: FriendRequestStatus,
}

/// POST /api/v1/users/friend-requests
pub async fn send_friend_request(
    state: web::Data<AppState>,
    user_id: UserId,
    req: web::Json<SendFriendRequestBody>,
) -> Result<HttpResponse> {
    let request = state
        .friends
        .send_request(user_id.0, req.recipient_id)
        .await?;

    Ok(HttpResponse::Created().json(request))
}

/// POST /api/v1/users/friend-requests/{id}/respond
pub async fn respond_friend_request(
    state: web::Data<AppState>,
    user_id: UserId,
    request_id: web::Path<Uuid>,
    req: web::Json<RespondFriendRequestBody>,
) -> Result<HttpResponse> {
    let request = state
        .friends
        .respond(user_id.0, *request_id, req.response)
        .await?;

    Ok(HttpResponse::Ok().json(request))
}

/// GET /api/v1/users/friends
pub async fn list_friends(state: web::Data<AppState>, user_id: UserId) -> Result<HttpResponse> {
    let friends = state.friends.list_friends(user_id.0).await?;

    Ok(HttpResponse::Ok().json(friends))
}

/// GET /api/v1/users/friend-requests
pub async fn list_pending_requests(
    state: web::Data<AppState>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let requests = state.friends.pending_requests(user_id.0).await?;

    Ok(HttpResponse::Ok().json(requests))
}
