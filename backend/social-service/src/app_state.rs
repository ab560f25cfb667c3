/// Shared application state
///
/// All store and service handles are constructed once at startup and
/// injected here; handlers reach them through `web::Data<AppState>`.
use std::sync::Arc;

use sqlx::PgPool;

use crate::cache::RedisCacheStore;
use crate::config::Config;
use crate::security::JwtKeys;
use crate::services::{AuthService, FeedService, FriendService, PostService};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub auth: Arc<AuthService>,
    pub posts: Arc<PostService>,
    pub friends: Arc<FriendService>,
    pub feed: Arc<FeedService>,
    pub jwt_keys: Arc<JwtKeys>,
    pub db_pool: PgPool,
    pub cache_store: RedisCacheStore,
}
