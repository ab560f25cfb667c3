/// Friend graph service - request lifecycle and friend listings
///
/// Request state machine: pending → accepted | rejected, both terminal.
/// Acceptance writes the status transition and both friendship edges in one
/// store transaction, then drops both participants' cached feeds.
use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{FriendRequest, FriendRequestStatus, FriendRequestView, UserSummary};
use crate::services::feed::FeedService;
use crate::store::GraphStore;

pub struct FriendService {
    graph: Arc<dyn GraphStore>,
    feed: Arc<FeedService>,
}

impl FriendService {
    pub fn new(graph: Arc<dyn GraphStore>, feed: Arc<FeedService>) -> Self {
        Self { graph, feed }
    }

    /// Send a friend request. At most one pending request may exist per
    /// (requester, recipient) pair.
    pub async fn send_request(
        &self,
        requester_id: Uuid,
        recipient_id: Uuid,
    ) -> Result<FriendRequest> {
        if requester_id == recipient_id {
            return Err(AppError::BadRequest(
                "Cannot send a friend request to yourself".to_string(),
            ));
        }

        self.graph
            .find_user_by_id(recipient_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if self.graph.are_friends(requester_id, recipient_id).await? {
            return Err(AppError::Conflict("Users are already friends".to_string()));
        }

        if self
            .graph
            .has_pending_request(requester_id, recipient_id)
            .await?
        {
            return Err(AppError::Conflict("Friend request already sent".to_string()));
        }

        self.graph
            .create_friend_request(requester_id, recipient_id)
            .await
    }

    /// Accept or reject a pending request addressed to `recipient_id`.
    /// Responding to an already-responded request is a conflict; on
    /// acceptance both participants' cached feeds are dropped.
    pub async fn respond(
        &self,
        recipient_id: Uuid,
        request_id: Uuid,
        response: FriendRequestStatus,
    ) -> Result<FriendRequest> {
        if response == FriendRequestStatus::Pending {
            return Err(AppError::BadRequest(
                "Response must be accepted or rejected".to_string(),
            ));
        }

        let request = self
            .graph
            .find_friend_request(request_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Friend request not found".to_string()))?;

        if request.recipient_id != recipient_id {
            return Err(AppError::NotFound("Friend request not found".to_string()));
        }

        if request.status != FriendRequestStatus::Pending {
            return Err(AppError::Conflict(
                "Friend request already responded".to_string(),
            ));
        }

        match response {
            FriendRequestStatus::Accepted => {
                self.graph.accept_friend_request(request_id).await?;
                self.feed
                    .invalidate_after_friendship(request.requester_id, recipient_id)
                    .await;
            }
            FriendRequestStatus::Rejected => {
                self.graph.reject_friend_request(request_id).await?;
            }
            FriendRequestStatus::Pending => unreachable!(),
        }

        Ok(FriendRequest {
            status: response,
            responded_at: Some(Utc::now()),
            ..request
        })
    }

    /// The user's friends with display fields, in friendship order
    pub async fn list_friends(&self, user_id: Uuid) -> Result<Vec<UserSummary>> {
        self.graph
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let friend_ids = self.graph.friends_of(user_id).await?;
        let users = self.graph.find_users_by_ids(&friend_ids).await?;

        let by_id: HashMap<Uuid, UserSummary> =
            users.iter().map(|u| (u.id, u.summary())).collect();

        Ok(friend_ids
            .iter()
            .filter_map(|id| by_id.get(id).cloned())
            .collect())
    }

    /// Pending requests addressed to the user, oldest first
    pub async fn pending_requests(&self, user_id: Uuid) -> Result<Vec<FriendRequestView>> {
        self.graph
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let requests = self.graph.pending_requests_for(user_id).await?;

        let requester_ids: Vec<Uuid> = requests.iter().map(|r| r.requester_id).collect();
        let requesters: HashMap<Uuid, UserSummary> = self
            .graph
            .find_users_by_ids(&requester_ids)
            .await?
            .iter()
            .map(|u| (u.id, u.summary()))
            .collect();

        Ok(requests
            .into_iter()
            .filter_map(|request| {
                requesters
                    .get(&request.requester_id)
                    .map(|requester| FriendRequestView {
                        id: request.id,
                        requester: requester.clone(),
                        status: request.status,
                        created_at: request.created_at,
                    })
            })
            .collect())
    }
}
