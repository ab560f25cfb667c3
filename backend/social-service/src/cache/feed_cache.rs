use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::cache::CacheStore;
use crate::error::{AppError, Result};
use crate::models::{CachedFeed, PostView};

/// Typed feed cache over a raw [`CacheStore`]
///
/// Owns key derivation, the JSON envelope and the default TTL. Entries are
/// only ever replaced whole; there is no partial update path.
#[derive(Clone)]
pub struct FeedCache {
    store: Arc<dyn CacheStore>,
    default_ttl_secs: u64,
}

impl FeedCache {
    pub fn new(store: Arc<dyn CacheStore>, default_ttl_secs: u64) -> Self {
        Self {
            store,
            default_ttl_secs,
        }
    }

    fn feed_key(user_id: Uuid) -> String {
        format!("feed:{}", user_id)
    }

    pub async fn read_feed(&self, user_id: Uuid) -> Result<Option<Vec<PostView>>> {
        let key = Self::feed_key(user_id);

        match self.store.get(&key).await? {
            Some(data) => {
                let cached = serde_json::from_str::<CachedFeed>(&data).map_err(|e| {
                    AppError::Cache(format!("cache deserialization failed: {}", e))
                })?;
                debug!("feed cache HIT for user {}", user_id);
                Ok(Some(cached.posts))
            }
            None => {
                debug!("feed cache MISS for user {}", user_id);
                Ok(None)
            }
        }
    }

    pub async fn write_feed(&self, user_id: Uuid, posts: &[PostView]) -> Result<()> {
        let key = Self::feed_key(user_id);
        let envelope = CachedFeed {
            posts: posts.to_vec(),
        };

        let data = serde_json::to_string(&envelope)
            .map_err(|e| AppError::Cache(format!("cache serialization failed: {}", e)))?;

        self.store.put(&key, &data, self.default_ttl_secs).await?;

        debug!(
            "feed cache WRITE for user {} ({} posts, ttl {}s)",
            user_id,
            posts.len(),
            self.default_ttl_secs
        );

        Ok(())
    }

    pub async fn invalidate(&self, user_id: Uuid) -> Result<()> {
        let key = Self::feed_key(user_id);
        self.store.delete(&key).await?;

        debug!("feed cache INVALIDATE for user {}", user_id);

        Ok(())
    }

    /// Drop the feed entries of every given user. Stops at the first cache
    /// failure; the caller decides whether that failure is fatal.
    pub async fn invalidate_many(&self, user_ids: &[Uuid]) -> Result<()> {
        for user_id in user_ids {
            self.invalidate(*user_id).await?;
        }

        debug!("feed cache invalidated {} entries", user_ids.len());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_key_format() {
        let user_id = Uuid::new_v4();
        let key = FeedCache::feed_key(user_id);
        assert_eq!(key, format!("feed:{}", user_id));
    }

    #[test]
    fn cached_feed_round_trips_through_json() {
        use crate::models::UserSummary;
        use chrono::Utc;

        let feed = CachedFeed {
            posts: vec![PostView {
                id: Uuid::new_v4(),
                author: UserSummary {
                    id: Uuid::new_v4(),
                    username: "ada".to_string(),
                    email: "ada@example.com".to_string(),
                },
                content: "hello".to_string(),
                created_at: Utc::now(),
                comments: vec![],
            }],
        };

        let json = serde_json::to_string(&feed).unwrap();
        let decoded: CachedFeed = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded.posts.len(), 1);
        assert_eq!(decoded.posts[0].content, "hello");
        assert_eq!(decoded.posts[0].author.username, "ada");
    }
}
