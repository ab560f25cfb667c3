/// Data models for the social service
///
/// Row types map directly onto the PostgreSQL schema; view types carry the
/// denormalized author/commenter display fields returned to clients and
/// stored in the feed cache.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User record
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

/// Friend request lifecycle state
///
/// `Pending` is the only state that permits a transition; `Accepted` and
/// `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "friend_request_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FriendRequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl std::fmt::Display for FriendRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FriendRequestStatus::Pending => write!(f, "pending"),
            FriendRequestStatus::Accepted => write!(f, "accepted"),
            FriendRequestStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Friend request record
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct FriendRequest {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub recipient_id: Uuid,
    pub status: FriendRequestStatus,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

/// Post record
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Comment record; comments are append-only
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub commenter_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Denormalized user display fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

/// Comment with denormalized commenter fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentView {
    pub id: Uuid,
    pub commenter: UserSummary,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Post with denormalized author/commenter fields, as served in feeds and
/// single-post reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostView {
    pub id: Uuid,
    pub author: UserSummary,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub comments: Vec<CommentView>,
}

/// Envelope stored in the feed cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedFeed {
    pub posts: Vec<PostView>,
}

/// Friend request with denormalized requester fields
#[derive(Debug, Clone, Serialize)]
pub struct FriendRequestView {
    pub id: Uuid,
    pub requester: UserSummary,
    pub status: FriendRequestStatus,
    pub created_at: DateTime<Utc>,
}
