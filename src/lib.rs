/// Social Feed
///
/// A small feed backend: clients upload media, submit posts, read the feed,
/// like posts and comment on them. Posts live as JSON members of one sorted
/// set scored by creation time; media goes to a blob store.

pub mod api;
pub mod blob_store;
pub mod config;
pub mod context;
pub mod error;
pub mod feed;
pub mod feed_store;
pub mod server;
