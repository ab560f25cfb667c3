/// HTTP middleware
pub mod jwt_auth;

pub use jwt_auth::{JwtAuth, UserId};
