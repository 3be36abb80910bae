/// Posts, likes and comments
pub mod models;
pub mod service;

pub use models::{Comment, NewPost, Post};
pub use service::FeedService;
