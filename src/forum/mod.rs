pub mod client;
pub mod topics;
pub mod types;

pub use client::{ForumApi, ForumClient, NewPost, NewTopic};
pub use types::{Member, PagedResponse, Post, Topic, Visibility};
