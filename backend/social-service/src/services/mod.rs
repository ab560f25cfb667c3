/// Business logic layer
pub mod auth;
pub mod feed;
pub mod friends;
pub mod posts;

pub use auth::AuthService;
pub use feed::FeedService;
pub use friends::FriendService;
pub use posts::PostService;
