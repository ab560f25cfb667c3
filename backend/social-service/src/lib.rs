/// Social Service Library
///
/// Backend for the Ripple social platform: accounts, posts, comments, the
/// friend graph, and the cached activity feed with its invalidation policy.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers
/// - `models`: Row and view data structures
/// - `services`: Business logic layer, including feed cache coherence
/// - `store`: Store contracts and PostgreSQL implementations
/// - `cache`: Cache contract, Redis implementation and the typed feed cache
/// - `middleware`: JWT authentication middleware
/// - `security`: Password hashing and access tokens
/// - `error`: Error types and HTTP mapping
/// - `config`: Configuration management
pub mod app_state;
pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod security;
pub mod services;
pub mod store;

pub use app_state::AppState;
pub use config::Config;
pub use error::{AppError, Result};
