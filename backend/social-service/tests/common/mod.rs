#![allow(dead_code)]
//! Shared test fixtures: in-memory implementations of the three store
//! contracts plus a wired-up backend for exercising the services end to end.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use social_service::cache::{CacheStore, FeedCache};
use social_service::error::{AppError, Result};
use social_service::models::{Comment, FriendRequest, FriendRequestStatus, Post, User};
use social_service::services::{FeedService, FriendService, PostService};
use social_service::store::{ContentStore, GraphStore};

const FEED_TTL_SECS: u64 = 600;

fn timestamp(seq: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000 + seq, 0).expect("valid timestamp")
}

#[derive(Default)]
pub struct InMemoryGraphStore {
    users: Mutex<Vec<User>>,
    friendships: Mutex<Vec<(Uuid, Uuid)>>,
    requests: Mutex<Vec<FriendRequest>>,
    seq: AtomicI64,
}

impl InMemoryGraphStore {
    fn next_timestamp(&self) -> DateTime<Utc> {
        timestamp(self.seq.fetch_add(1, Ordering::SeqCst))
    }
}

#[async_trait]
impl GraphStore for InMemoryGraphStore {
    async fn insert_user(&self, username: &str, email: &str, password_hash: &str) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == email || u.username == username) {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: self.next_timestamp(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_users_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn friends_of(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        Ok(self
            .friendships
            .lock()
            .unwrap()
            .iter()
            .filter(|(a, _)| *a == user_id)
            .map(|(_, b)| *b)
            .collect())
    }

    async fn are_friends(&self, user_id: Uuid, other_id: Uuid) -> Result<bool> {
        Ok(self
            .friendships
            .lock()
            .unwrap()
            .contains(&(user_id, other_id)))
    }

    async fn create_friend_request(
        &self,
        requester_id: Uuid,
        recipient_id: Uuid,
    ) -> Result<FriendRequest> {
        let mut requests = self.requests.lock().unwrap();
        let duplicate = requests.iter().any(|r| {
            r.requester_id == requester_id
                && r.recipient_id == recipient_id
                && r.status == FriendRequestStatus::Pending
        });
        if duplicate {
            return Err(AppError::Conflict("Friend request already sent".to_string()));
        }

        let request = FriendRequest {
            id: Uuid::new_v4(),
            requester_id,
            recipient_id,
            status: FriendRequestStatus::Pending,
            created_at: self.next_timestamp(),
            responded_at: None,
        };
        requests.push(request.clone());
        Ok(request)
    }

    async fn find_friend_request(&self, id: Uuid) -> Result<Option<FriendRequest>> {
        Ok(self
            .requests
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn pending_requests_for(&self, recipient_id: Uuid) -> Result<Vec<FriendRequest>> {
        Ok(self
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.recipient_id == recipient_id && r.status == FriendRequestStatus::Pending)
            .cloned()
            .collect())
    }

    async fn has_pending_request(&self, requester_id: Uuid, recipient_id: Uuid) -> Result<bool> {
        Ok(self.requests.lock().unwrap().iter().any(|r| {
            r.requester_id == requester_id
                && r.recipient_id == recipient_id
                && r.status == FriendRequestStatus::Pending
        }))
    }

    async fn accept_friend_request(&self, id: Uuid) -> Result<()> {
        let mut requests = self.requests.lock().unwrap();
        let request = requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound("Friend request not found".to_string()))?;

        if request.status != FriendRequestStatus::Pending {
            return Err(AppError::Conflict(
                "Friend request already responded".to_string(),
            ));
        }

        request.status = FriendRequestStatus::Accepted;
        request.responded_at = Some(Utc::now());
        let (requester_id, recipient_id) = (request.requester_id, request.recipient_id);
        drop(requests);

        let mut friendships = self.friendships.lock().unwrap();
        for edge in [(requester_id, recipient_id), (recipient_id, requester_id)] {
            if !friendships.contains(&edge) {
                friendships.push(edge);
            }
        }

        Ok(())
    }

    async fn reject_friend_request(&self, id: Uuid) -> Result<()> {
        let mut requests = self.requests.lock().unwrap();
        let request = requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound("Friend request not found".to_string()))?;

        if request.status != FriendRequestStatus::Pending {
            return Err(AppError::Conflict(
                "Friend request already responded".to_string(),
            ));
        }

        request.status = FriendRequestStatus::Rejected;
        request.responded_at = Some(Utc::now());
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryContentStore {
    posts: Mutex<Vec<Post>>,
    comments: Mutex<Vec<Comment>>,
    seq: AtomicI64,
    circle_queries: AtomicUsize,
}

impl InMemoryContentStore {
    fn next_timestamp(&self) -> DateTime<Utc> {
        timestamp(self.seq.fetch_add(1, Ordering::SeqCst))
    }

    /// Number of circle-predicate queries served, i.e. feed recomputes
    pub fn circle_query_count(&self) -> usize {
        self.circle_queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn insert_post(&self, author_id: Uuid, content: &str) -> Result<Post> {
        let post = Post {
            id: Uuid::new_v4(),
            author_id,
            content: content.to_string(),
            created_at: self.next_timestamp(),
        };
        self.posts.lock().unwrap().push(post.clone());
        Ok(post)
    }

    async fn find_post_by_id(&self, id: Uuid) -> Result<Option<Post>> {
        Ok(self.posts.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn find_posts_by_authors_or_commenters(&self, user_ids: &[Uuid]) -> Result<Vec<Post>> {
        self.circle_queries.fetch_add(1, Ordering::SeqCst);

        let comments = self.comments.lock().unwrap();
        let mut posts: Vec<Post> = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| {
                user_ids.contains(&p.author_id)
                    || comments
                        .iter()
                        .any(|c| c.post_id == p.id && user_ids.contains(&c.commenter_id))
            })
            .cloned()
            .collect();

        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(posts)
    }

    async fn comments_for_posts(&self, post_ids: &[Uuid]) -> Result<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|c| post_ids.contains(&c.post_id))
            .cloned()
            .collect();

        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(comments)
    }

    async fn append_comment(
        &self,
        post_id: Uuid,
        commenter_id: Uuid,
        content: &str,
    ) -> Result<Comment> {
        let comment = Comment {
            id: Uuid::new_v4(),
            post_id,
            commenter_id,
            content: content.to_string(),
            created_at: self.next_timestamp(),
        };
        self.comments.lock().unwrap().push(comment.clone());
        Ok(comment)
    }
}

#[derive(Default)]
pub struct InMemoryCacheStore {
    entries: Mutex<HashMap<String, (String, Instant)>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fail_deletes: AtomicBool,
}

impl InMemoryCacheStore {
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .lock()
            .unwrap()
            .get(key)
            .map(|(_, expiry)| *expiry > Instant::now())
            .unwrap_or(false)
    }

    pub fn expire(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::Cache("cache unreachable".to_string()));
        }

        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some((value, expiry)) if *expiry > Instant::now() => Ok(Some(value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Cache("cache unreachable".to_string()));
        }

        self.entries.lock().unwrap().insert(
            key.to_string(),
            (
                value.to_string(),
                Instant::now() + Duration::from_secs(ttl_secs),
            ),
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(AppError::Cache("cache unreachable".to_string()));
        }

        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Fully wired service stack over the in-memory stores
pub struct TestBackend {
    pub graph: Arc<InMemoryGraphStore>,
    pub content: Arc<InMemoryContentStore>,
    pub cache: Arc<InMemoryCacheStore>,
    pub feed: Arc<FeedService>,
    pub posts: PostService,
    pub friends: FriendService,
}

impl TestBackend {
    pub fn new() -> Self {
        let graph = Arc::new(InMemoryGraphStore::default());
        let content = Arc::new(InMemoryContentStore::default());
        let cache = Arc::new(InMemoryCacheStore::default());

        let graph_dyn: Arc<dyn GraphStore> = graph.clone();
        let content_dyn: Arc<dyn ContentStore> = content.clone();
        let cache_dyn: Arc<dyn CacheStore> = cache.clone();

        let feed = Arc::new(FeedService::new(
            graph_dyn.clone(),
            content_dyn.clone(),
            FeedCache::new(cache_dyn, FEED_TTL_SECS),
        ));

        let posts = PostService::new(graph_dyn.clone(), content_dyn, feed.clone());
        let friends = FriendService::new(graph_dyn, feed.clone());

        Self {
            graph,
            content,
            cache,
            feed,
            posts,
            friends,
        }
    }

    pub async fn user(&self, name: &str) -> Uuid {
        self.graph
            .insert_user(name, &format!("{}@example.com", name), "hash")
            .await
            .expect("user insert should succeed")
            .id
    }

    /// Form a friendship through the real request/accept flow
    pub async fn befriend(&self, requester_id: Uuid, recipient_id: Uuid) {
        let request = self
            .friends
            .send_request(requester_id, recipient_id)
            .await
            .expect("friend request should be created");

        self.friends
            .respond(recipient_id, request.id, FriendRequestStatus::Accepted)
            .await
            .expect("friend request should be accepted");
    }

    pub fn feed_key(user_id: Uuid) -> String {
        format!("feed:{}", user_id)
    }
}
