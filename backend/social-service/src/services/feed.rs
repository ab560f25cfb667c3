/// Feed assembly and cache coherence
///
/// The read path serves a user's feed from cache when possible and
/// recomputes it from the graph and content stores on miss. The write-side
/// methods derive, per mutation kind, the exact set of users whose cached
/// feed must be dropped, and drop them. Derivation always completes before
/// the triggering request is answered; a cache failure during the drop is
/// logged and swallowed, so a durably applied mutation never fails on
/// account of the cache.
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use crate::cache::FeedCache;
use crate::error::{AppError, Result};
use crate::models::{Comment, CommentView, Post, PostView, UserSummary};
use crate::store::{ContentStore, GraphStore};

pub struct FeedService {
    graph: Arc<dyn GraphStore>,
    content: Arc<dyn ContentStore>,
    cache: FeedCache,
}

impl FeedService {
    pub fn new(graph: Arc<dyn GraphStore>, content: Arc<dyn ContentStore>, cache: FeedCache) -> Self {
        Self {
            graph,
            content,
            cache,
        }
    }

    /// Return the user's feed, newest post first.
    ///
    /// A cached entry is returned verbatim. On miss the feed is recomputed,
    /// written back with the default TTL and returned; an empty result is
    /// cached like any other. The recompute path reads the stores but never
    /// writes them.
    pub async fn get_feed(&self, user_id: Uuid) -> Result<Vec<PostView>> {
        match self.cache.read_feed(user_id).await {
            Ok(Some(posts)) => return Ok(posts),
            Ok(None) => {}
            Err(e) => warn!("feed cache read failed for user {}: {}", user_id, e),
        }

        let posts = self.assemble_feed(user_id).await?;

        if let Err(e) = self.cache.write_feed(user_id, &posts).await {
            warn!("feed cache write failed for user {}: {}", user_id, e);
        }

        Ok(posts)
    }

    /// Recompute the feed from the stores: every post authored by, or
    /// commented on by, someone in the user's circle (friends plus the user
    /// themself), with denormalized display fields.
    async fn assemble_feed(&self, user_id: Uuid) -> Result<Vec<PostView>> {
        self.graph
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let friends = self.graph.friends_of(user_id).await?;
        let circle = feed_circle(user_id, &friends);

        let mut posts = self
            .content
            .find_posts_by_authors_or_commenters(&circle)
            .await?;
        sort_newest_first(&mut posts);

        let post_ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
        let comments = self.content.comments_for_posts(&post_ids).await?;

        let users = self.load_summaries(&posts, &comments).await?;

        Ok(build_post_views(posts, comments, &users))
    }

    async fn load_summaries(
        &self,
        posts: &[Post],
        comments: &[Comment],
    ) -> Result<HashMap<Uuid, UserSummary>> {
        let mut ids: HashSet<Uuid> = posts.iter().map(|p| p.author_id).collect();
        ids.extend(comments.iter().map(|c| c.commenter_id));

        let ids: Vec<Uuid> = ids.into_iter().collect();
        let users = self.graph.find_users_by_ids(&ids).await?;

        Ok(users.iter().map(|u| (u.id, u.summary())).collect())
    }

    /// New post by `author_id`: drop the author's own entry and the entry of
    /// every current friend.
    pub async fn invalidate_after_post(&self, author_id: Uuid) {
        let targets = match self.graph.friends_of(author_id).await {
            Ok(friends) => post_invalidation_targets(author_id, &friends),
            Err(e) => {
                warn!(
                    "friend lookup for post invalidation failed for user {}: {}",
                    author_id, e
                );
                vec![author_id]
            }
        };

        self.drop_entries(&targets).await;
    }

    /// New comment by `commenter_id` on a post authored by `author_id`:
    /// drop exactly those two entries. Feeds that surface the post through
    /// some third friend are left to expire by TTL.
    pub async fn invalidate_after_comment(&self, commenter_id: Uuid, author_id: Uuid) {
        let targets = comment_invalidation_targets(commenter_id, author_id);
        self.drop_entries(&targets).await;
    }

    /// Accepted friend request between `requester_id` and `recipient_id`:
    /// drop both entries, since each side can now see the other's content.
    pub async fn invalidate_after_friendship(&self, requester_id: Uuid, recipient_id: Uuid) {
        self.drop_entries(&[requester_id, recipient_id]).await;
    }

    async fn drop_entries(&self, user_ids: &[Uuid]) {
        if let Err(e) = self.cache.invalidate_many(user_ids).await {
            warn!("feed cache invalidation failed: {}", e);
        }
    }
}

/// The set of users whose content qualifies for a feed: the owner and their
/// friends.
fn feed_circle(owner_id: Uuid, friends: &[Uuid]) -> Vec<Uuid> {
    let mut circle = Vec::with_capacity(friends.len() + 1);
    circle.push(owner_id);
    circle.extend_from_slice(friends);
    circle
}

/// Invalidation set for a new post: {author} ∪ friends(author), deduplicated
fn post_invalidation_targets(author_id: Uuid, friends: &[Uuid]) -> Vec<Uuid> {
    let mut targets = vec![author_id];
    for friend in friends {
        if !targets.contains(friend) {
            targets.push(*friend);
        }
    }
    targets
}

/// Invalidation set for a new comment: {commenter, post author}
fn comment_invalidation_targets(commenter_id: Uuid, author_id: Uuid) -> Vec<Uuid> {
    if commenter_id == author_id {
        vec![commenter_id]
    } else {
        vec![commenter_id, author_id]
    }
}

/// Newest first; the sort is stable so equal timestamps keep store order,
/// which is itself deterministic (secondary order by post id).
fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Join posts with their comments and denormalized display fields,
/// preserving post order. Comments keep creation order within each post.
pub(crate) fn build_post_views(
    posts: Vec<Post>,
    comments: Vec<Comment>,
    users: &HashMap<Uuid, UserSummary>,
) -> Vec<PostView> {
    let mut comments_by_post: HashMap<Uuid, Vec<CommentView>> = HashMap::new();
    for comment in comments {
        if let Some(commenter) = users.get(&comment.commenter_id) {
            comments_by_post
                .entry(comment.post_id)
                .or_default()
                .push(CommentView {
                    id: comment.id,
                    commenter: commenter.clone(),
                    content: comment.content,
                    created_at: comment.created_at,
                });
        }
    }

    posts
        .into_iter()
        .filter_map(|post| {
            users.get(&post.author_id).map(|author| PostView {
                id: post.id,
                author: author.clone(),
                content: post.content,
                created_at: post.created_at,
                comments: comments_by_post.remove(&post.id).unwrap_or_default(),
            })
        })
        .collect()
}
