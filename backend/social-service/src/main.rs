use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use db_pool::{create_pool, DbConfig};
use social_service::app_state::AppState;
use social_service::cache::{FeedCache, RedisCacheStore};
use social_service::routes::configure_routes;
use social_service::security::JwtKeys;
use social_service::services::{AuthService, FeedService, FriendService, PostService};
use social_service::store::{
    ContentStore, GraphStore, PostgresContentStore, PostgresGraphStore,
};
use social_service::Config;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting social-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let mut db_cfg = DbConfig::from_env("social-service").unwrap_or_default();
    if db_cfg.database_url.is_empty() {
        db_cfg.database_url = config.database.url.clone();
    }
    if db_cfg.max_connections < config.database.max_connections {
        db_cfg.max_connections = config.database.max_connections;
    }
    db_cfg.log_config();

    let db_pool = match create_pool(db_cfg).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database pool creation failed: {}", e);
            eprintln!("ERROR: Failed to create database pool: {}", e);
            std::process::exit(1);
        }
    };

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("migrations failed: {}", e)))?;

    tracing::info!("Database migrations applied");

    let cache_store = RedisCacheStore::connect(&config.cache.url).await.map_err(|e| {
        io::Error::new(
            io::ErrorKind::Other,
            format!("Failed to initialize Redis connection: {}", e),
        )
    })?;

    tracing::info!("Connected to Redis at {}", config.cache.url);

    let graph: Arc<dyn GraphStore> = Arc::new(PostgresGraphStore::new(db_pool.clone()));
    let content: Arc<dyn ContentStore> = Arc::new(PostgresContentStore::new(db_pool.clone()));

    let feed_cache = FeedCache::new(Arc::new(cache_store.clone()), config.feed.cache_ttl_secs);
    let feed = Arc::new(FeedService::new(graph.clone(), content.clone(), feed_cache));

    let jwt_keys = Arc::new(JwtKeys::from_secret(
        &config.auth.jwt_secret,
        config.auth.access_token_ttl_secs,
    ));

    let state = AppState {
        config: config.clone(),
        auth: Arc::new(AuthService::new(graph.clone(), jwt_keys.clone())),
        posts: Arc::new(PostService::new(graph.clone(), content.clone(), feed.clone())),
        friends: Arc::new(FriendService::new(graph.clone(), feed.clone())),
        feed,
        jwt_keys,
        db_pool,
        cache_store,
    };

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    let allowed_origins: Vec<String> = config
        .cors
        .allowed_origins
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    tracing::info!("Starting HTTP server at {}", bind_address);

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST"])
            .allow_any_header()
            .max_age(3600);
        for origin in &allowed_origins {
            cors = cors.allowed_origin(origin);
        }

        let jwt_keys = state.jwt_keys.clone();

        App::new()
            .wrap(TracingLogger::default())
            .wrap(cors)
            .app_data(web::Data::new(state.clone()))
            .configure(|cfg| configure_routes(cfg, jwt_keys))
    })
    .bind(bind_address)?
    .run()
    .await
}
