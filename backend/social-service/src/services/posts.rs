/// Post service - post creation, comment appends and single-post reads
///
/// Every write is followed by the matching feed invalidation, after the
/// write is durable.
use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Post, PostView, UserSummary};
use crate::services::feed::{build_post_views, FeedService};
use crate::store::{ContentStore, GraphStore};

pub struct PostService {
    graph: Arc<dyn GraphStore>,
    content: Arc<dyn ContentStore>,
    feed: Arc<FeedService>,
}

impl PostService {
    pub fn new(
        graph: Arc<dyn GraphStore>,
        content: Arc<dyn ContentStore>,
        feed: Arc<FeedService>,
    ) -> Self {
        Self {
            graph,
            content,
            feed,
        }
    }

    /// Create a post, then drop the cached feeds of the author and all of
    /// the author's friends.
    pub async fn create_post(&self, author_id: Uuid, content: &str) -> Result<Post> {
        self.graph
            .find_user_by_id(author_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let post = self.content.insert_post(author_id, content).await?;

        self.feed.invalidate_after_post(author_id).await;

        Ok(post)
    }

    /// Append a comment, then drop the cached feeds of the commenter and the
    /// post author.
    pub async fn add_comment(
        &self,
        post_id: Uuid,
        commenter_id: Uuid,
        content: &str,
    ) -> Result<PostView> {
        let post = self
            .content
            .find_post_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

        self.content
            .append_comment(post_id, commenter_id, content)
            .await?;

        self.feed
            .invalidate_after_comment(commenter_id, post.author_id)
            .await;

        self.view_of(post.id).await
    }

    pub async fn get_post(&self, post_id: Uuid) -> Result<PostView> {
        self.view_of(post_id).await
    }

    async fn view_of(&self, post_id: Uuid) -> Result<PostView> {
        let post = self
            .content
            .find_post_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

        let comments = self.content.comments_for_posts(&[post.id]).await?;

        let mut ids: Vec<Uuid> = comments.iter().map(|c| c.commenter_id).collect();
        ids.push(post.author_id);
        ids.sort_unstable();
        ids.dedup();

        let users: HashMap<Uuid, UserSummary> = self
            .graph
            .find_users_by_ids(&ids)
            .await?
            .iter()
            .map(|u| (u.id, u.summary()))
            .collect();

        build_post_views(vec![post], comments, &users)
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Internal("post author record missing".to_string()))
    }
}
