/// PostgreSQL implementations of the store contracts
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Comment, FriendRequest, Post, User};
use crate::store::{ContentStore, GraphStore};

#[derive(Clone)]
pub struct PostgresGraphStore {
    pool: PgPool,
}

impl PostgresGraphStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_unique_violation(err: sqlx::Error, conflict_message: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(conflict_message.to_string())
        }
        _ => AppError::Database(err),
    }
}

#[async_trait]
impl GraphStore for PostgresGraphStore {
    async fn insert_user(&self, username: &str, email: &str, password_hash: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "User already exists"))?;

        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_users_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE id = ANY($1)",
        )
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn friends_of(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        let friends = sqlx::query_scalar::<_, Uuid>(
            "SELECT friend_id FROM friendships WHERE user_id = $1 ORDER BY created_at, friend_id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(friends)
    }

    async fn are_friends(&self, user_id: Uuid, other_id: Uuid) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM friendships WHERE user_id = $1 AND friend_id = $2)",
        )
        .bind(user_id)
        .bind(other_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn create_friend_request(
        &self,
        requester_id: Uuid,
        recipient_id: Uuid,
    ) -> Result<FriendRequest> {
        let request = sqlx::query_as::<_, FriendRequest>(
            r#"
            INSERT INTO friend_requests (id, requester_id, recipient_id, status, created_at)
            VALUES ($1, $2, $3, 'pending', NOW())
            RETURNING id, requester_id, recipient_id, status, created_at, responded_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(requester_id)
        .bind(recipient_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Friend request already sent"))?;

        Ok(request)
    }

    async fn find_friend_request(&self, id: Uuid) -> Result<Option<FriendRequest>> {
        let request = sqlx::query_as::<_, FriendRequest>(
            r#"
            SELECT id, requester_id, recipient_id, status, created_at, responded_at
            FROM friend_requests
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    async fn pending_requests_for(&self, recipient_id: Uuid) -> Result<Vec<FriendRequest>> {
        let requests = sqlx::query_as::<_, FriendRequest>(
            r#"
            SELECT id, requester_id, recipient_id, status, created_at, responded_at
            FROM friend_requests
            WHERE recipient_id = $1 AND status = 'pending'
            ORDER BY created_at, id
            "#,
        )
        .bind(recipient_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    async fn has_pending_request(&self, requester_id: Uuid, recipient_id: Uuid) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM friend_requests
                WHERE requester_id = $1 AND recipient_id = $2 AND status = 'pending'
            )
            "#,
        )
        .bind(requester_id)
        .bind(recipient_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn accept_friend_request(&self, id: Uuid) -> Result<()> {
        // Status transition and both friendship edges commit together; the
        // compare-and-set on the pending state makes concurrent responders
        // race safely.
        let mut tx = self.pool.begin().await?;

        let participants = sqlx::query_as::<_, (Uuid, Uuid)>(
            r#"
            UPDATE friend_requests
            SET status = 'accepted', responded_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING requester_id, recipient_id
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let (requester_id, recipient_id) = participants
            .ok_or_else(|| AppError::Conflict("Friend request already responded".to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO friendships (user_id, friend_id, created_at)
            VALUES ($1, $2, NOW()), ($2, $1, NOW())
            ON CONFLICT (user_id, friend_id) DO NOTHING
            "#,
        )
        .bind(requester_id)
        .bind(recipient_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn reject_friend_request(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE friend_requests
            SET status = 'rejected', responded_at = NOW()
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::Conflict(
                "Friend request already responded".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Clone)]
pub struct PostgresContentStore {
    pool: PgPool,
}

impl PostgresContentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentStore for PostgresContentStore {
    async fn insert_post(&self, author_id: Uuid, content: &str) -> Result<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (id, author_id, content, created_at)
            VALUES ($1, $2, $3, NOW())
            RETURNING id, author_id, content, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(author_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    async fn find_post_by_id(&self, id: Uuid) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            "SELECT id, author_id, content, created_at FROM posts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn find_posts_by_authors_or_commenters(&self, user_ids: &[Uuid]) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT DISTINCT p.id, p.author_id, p.content, p.created_at
            FROM posts p
            LEFT JOIN comments c ON c.post_id = p.id
            WHERE p.author_id = ANY($1) OR c.commenter_id = ANY($1)
            ORDER BY p.created_at DESC, p.id
            "#,
        )
        .bind(user_ids.to_vec())
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn comments_for_posts(&self, post_ids: &[Uuid]) -> Result<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, post_id, commenter_id, content, created_at
            FROM comments
            WHERE post_id = ANY($1)
            ORDER BY created_at, id
            "#,
        )
        .bind(post_ids.to_vec())
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn append_comment(
        &self,
        post_id: Uuid,
        commenter_id: Uuid,
        content: &str,
    ) -> Result<Comment> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (id, post_id, commenter_id, content, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING id, post_id, commenter_id, content, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(post_id)
        .bind(commenter_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }
}
