/// Store contracts
///
/// The service core depends on these traits only; production code wires the
/// PostgreSQL implementations from [`postgres`], tests substitute in-memory
/// fakes. Handles are constructed at startup and injected, never held as
/// process globals.
use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Comment, FriendRequest, Post, User};

pub mod postgres;

pub use postgres::{PostgresContentStore, PostgresGraphStore};

/// User records, friendship edges and friend-request state
#[async_trait]
pub trait GraphStore: Send + Sync {
    async fn insert_user(&self, username: &str, email: &str, password_hash: &str) -> Result<User>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_users_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>>;

    /// Friend identities of a user, in the order the friendships were formed
    async fn friends_of(&self, user_id: Uuid) -> Result<Vec<Uuid>>;

    async fn are_friends(&self, user_id: Uuid, other_id: Uuid) -> Result<bool>;

    /// Create a pending friend request; `Conflict` if a pending request for
    /// the same (requester, recipient) pair already exists.
    async fn create_friend_request(
        &self,
        requester_id: Uuid,
        recipient_id: Uuid,
    ) -> Result<FriendRequest>;

    async fn find_friend_request(&self, id: Uuid) -> Result<Option<FriendRequest>>;

    async fn pending_requests_for(&self, recipient_id: Uuid) -> Result<Vec<FriendRequest>>;

    async fn has_pending_request(&self, requester_id: Uuid, recipient_id: Uuid) -> Result<bool>;

    /// Transition the request to `accepted` and write both friendship edges
    /// atomically. The transition is a compare-and-set on the pending state;
    /// a request that is no longer pending yields `Conflict`.
    async fn accept_friend_request(&self, id: Uuid) -> Result<()>;

    /// Transition the request to `rejected`. Compare-and-set as above.
    async fn reject_friend_request(&self, id: Uuid) -> Result<()>;
}

/// Posts and their append-only comment lists
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn insert_post(&self, author_id: Uuid, content: &str) -> Result<Post>;

    async fn find_post_by_id(&self, id: Uuid) -> Result<Option<Post>>;

    /// Every post authored by one of `user_ids`, or carrying a comment
    /// written by one of them, newest first (ties by post identity).
    async fn find_posts_by_authors_or_commenters(&self, user_ids: &[Uuid]) -> Result<Vec<Post>>;

    /// Comments for the given posts in creation order
    async fn comments_for_posts(&self, post_ids: &[Uuid]) -> Result<Vec<Comment>>;

    async fn append_comment(&self, post_id: Uuid, commenter_id: Uuid, content: &str)
        -> Result<Comment>;
}
