//! Typed request helpers for the forum REST API.

use anyhow::Result;
use async_trait::async_trait;
use log::debug;

use crate::http::HttpClient;

use super::types::{PagedResponse, Post, Topic, Visibility};

/// Production forum API base URL.
pub const DEFAULT_BASE_URL: &str = "https://www.ascensiongamedev.com/api";

/// Request payload for creating a topic with its first post.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTopic {
    pub forum_id: u64,
    pub title: String,
    pub author_id: u64,
    pub hidden: Visibility,
    pub prefix: String,
    pub featured: bool,
    pub pinned: bool,
    /// HTML content of the first post.
    pub post_body: String,
}

/// Request payload for creating a post on an existing topic.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub topic_id: u64,
    pub author_id: u64,
    /// Omitted from the request when `None`; the server then applies its
    /// default visibility.
    pub hidden: Option<Visibility>,
    /// Creation date override; omitted when `None`, in which case the
    /// server stamps the current time.
    pub date: Option<String>,
    /// HTML content of the post.
    pub post_body: String,
}

/// Operations this tool needs from the forum REST API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ForumApi: Send + Sync {
    /// Lists topics in a forum authored by a member, up to `per_page`
    /// results.
    async fn list_topics(
        &self,
        forum_id: u64,
        author_id: u64,
        per_page: u32,
    ) -> Result<PagedResponse<Topic>>;

    /// Fetches a topic by id. A missing topic is an error carrying the
    /// 404 status, not a `None`.
    async fn get_topic(&self, topic_id: u64) -> Result<Topic>;

    /// Creates a topic together with its first post.
    async fn create_topic(&self, new_topic: &NewTopic) -> Result<Topic>;

    /// Creates a post on an existing topic.
    async fn create_post(&self, new_post: &NewPost) -> Result<Post>;

    /// Replaces the content of a topic's first post.
    async fn update_first_post(&self, topic_id: u64, post_body: &str) -> Result<Topic>;
}

/// Forum REST API client.
pub struct ForumClient {
    http: HttpClient,
    base_url: String,
}

impl ForumClient {
    pub fn new(http: HttpClient, base_url: Option<String>) -> Self {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self { http, base_url }
    }
}

#[async_trait]
impl ForumApi for ForumClient {
    #[tracing::instrument(skip(self))]
    async fn list_topics(
        &self,
        forum_id: u64,
        author_id: u64,
        per_page: u32,
    ) -> Result<PagedResponse<Topic>> {
        let url = format!("{}/forums/topics", self.base_url);
        debug!("Listing topics for forum {} from {}...", forum_id, url);

        self.http
            .get_json_with_query(
                &url,
                &[
                    ("forums", &forum_id.to_string()),
                    ("authors", &author_id.to_string()),
                    ("perPage", &per_page.to_string()),
                ],
            )
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn get_topic(&self, topic_id: u64) -> Result<Topic> {
        let url = format!("{}/forums/topics/{}", self.base_url, topic_id);
        debug!("Fetching topic from {}...", url);

        self.http.get_json(&url).await
    }

    #[tracing::instrument(skip(self, new_topic))]
    async fn create_topic(&self, new_topic: &NewTopic) -> Result<Topic> {
        let url = format!("{}/forums/topics", self.base_url);
        debug!("Creating topic '{}' at {}...", new_topic.title, url);

        let form = [
            ("forum", new_topic.forum_id.to_string()),
            ("title", new_topic.title.clone()),
            ("author", new_topic.author_id.to_string()),
            ("hidden", new_topic.hidden.code().to_string()),
            ("prefix", new_topic.prefix.clone()),
            ("featured", flag(new_topic.featured)),
            ("pinned", flag(new_topic.pinned)),
            ("post", new_topic.post_body.clone()),
        ];

        self.http.post_form_json(&url, &form).await
    }

    #[tracing::instrument(skip(self, new_post))]
    async fn create_post(&self, new_post: &NewPost) -> Result<Post> {
        let url = format!("{}/forums/posts", self.base_url);
        debug!("Creating post on topic {} at {}...", new_post.topic_id, url);

        let mut form = vec![
            ("topic", new_post.topic_id.to_string()),
            ("author", new_post.author_id.to_string()),
        ];
        if let Some(hidden) = new_post.hidden {
            form.push(("hidden", hidden.code().to_string()));
        }
        if let Some(date) = &new_post.date {
            form.push(("date", date.clone()));
        }
        form.push(("post", new_post.post_body.clone()));

        self.http.post_form_json(&url, &form).await
    }

    #[tracing::instrument(skip(self, post_body))]
    async fn update_first_post(&self, topic_id: u64, post_body: &str) -> Result<Topic> {
        let url = format!("{}/forums/topics/{}", self.base_url, topic_id);
        debug!("Updating first post of topic {} at {}...", topic_id, url);

        let form = [("post", post_body.to_string())];

        self.http.post_form_json(&url, &form).await
    }
}

fn flag(value: bool) -> String {
    if value { "1" } else { "0" }.to_string()
}
