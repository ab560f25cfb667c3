//! Route configuration
//!
//! Centralized route setup; authenticated scopes are wrapped with the JWT
//! middleware built from the injected keys.

use std::sync::Arc;

use actix_web::web;

use crate::handlers;
use crate::middleware::JwtAuth;
use crate::security::JwtKeys;

/// Configure all routes for the application
pub fn configure_routes(cfg: &mut web::ServiceConfig, jwt_keys: Arc<JwtKeys>) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(handlers::health::health))
            .route("/health/ready", web::get().to(handlers::health::readiness))
            .route("/health/live", web::get().to(handlers::health::liveness))
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(handlers::auth::register))
                    .route("/login", web::post().to(handlers::auth::login)),
            )
            .service(
                web::scope("/posts")
                    .wrap(JwtAuth::new(jwt_keys.clone()))
                    .route("", web::post().to(handlers::posts::create_post))
                    .route("/feed", web::get().to(handlers::posts::get_feed))
                    .route("/{id}", web::get().to(handlers::posts::get_post))
                    .route("/{id}/comments", web::post().to(handlers::posts::add_comment)),
            )
            .service(
                web::scope("/users")
                    .wrap(JwtAuth::new(jwt_keys))
                    .route(
                        "/friend-requests",
                        web::post().to(handlers::users::send_friend_request),
                    )
                    .route(
                        "/friend-requests",
                        web::get().to(handlers::users::list_pending_requests),
                    )
                    .route(
                        "/friend-requests/{id}/respond",
                        web::post().to(handlers::users::respond_friend_request),
                    )
                    .route("/friends", web::get().to(handlers::users::list_friends)),
            ),
    );
}
