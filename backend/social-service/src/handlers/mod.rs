/// HTTP request handlers
pub mod auth;
pub mod health;
pub mod posts;
pub mod users;
