//! Find-or-create and update workflows for nightly-build topics.
//!
//! A version's announcements live in one topic whose first post is the
//! current nightly build. Updating replaces that first post, but the API
//! has no atomic "replace" operation: the old announcement is first
//! cloned into a new post on the topic, and only then is the first post
//! overwritten through a topic-level update.

use anyhow::Result;
use log::debug;

use crate::http::HttpError;
use crate::post::build_post_body;
use crate::version::topic_title;

use super::client::{ForumApi, NewPost, NewTopic};
use super::types::{Post, Topic, Visibility};

/// Forum section that nightly-build topics live in.
pub const NIGHTLY_FORUM_ID: u64 = 312;

/// Bot account that authors nightly-build topics and posts.
pub const BOT_AUTHOR_ID: u64 = 5203;

/// Prefix label applied to created topics.
pub const TOPIC_PREFIX: &str = "Intersect";

/// Large enough to cover every topic the bot has in the nightly forum in
/// one page; the API offers no exact-title filter, so the match happens
/// client-side over this listing.
const TOPIC_PAGE_SIZE: u32 = 1000;

/// Options for [`create_topic_for_version`].
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTopicOptions {
    pub forum_id: u64,
    pub author_id: u64,
    pub hidden: Visibility,
}

impl Default for CreateTopicOptions {
    /// Defaults to a moderator-hidden topic so ad-hoc runs stay invisible
    /// until explicitly published.
    fn default() -> Self {
        Self {
            forum_id: NIGHTLY_FORUM_ID,
            author_id: BOT_AUTHOR_ID,
            hidden: Visibility::HiddenByModerator,
        }
    }
}

/// Result of replacing a topic's announcement.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicUpdate {
    /// The updated topic, with the new announcement as its first post.
    pub topic: Topic,
    /// The clone post that preserves the previous announcement.
    pub post: Post,
}

/// Finds the nightly-build topic for a version by exact title match.
///
/// Returns `None` when no topic with the canonical title exists; that is
/// a normal outcome, not an error.
#[tracing::instrument(skip(api))]
pub async fn find_topic_for_version(api: &dyn ForumApi, version: &str) -> Result<Option<Topic>> {
    let title = topic_title(version);
    let response = api
        .list_topics(NIGHTLY_FORUM_ID, BOT_AUTHOR_ID, TOPIC_PAGE_SIZE)
        .await?;
    Ok(response.results.into_iter().find(|topic| topic.title == title))
}

/// Fetches a topic by id, mapping a 404 to `None`.
#[tracing::instrument(skip(api))]
pub async fn find_topic_by_id(api: &dyn ForumApi, topic_id: u64) -> Result<Option<Topic>> {
    match api.get_topic(topic_id).await {
        Ok(topic) => Ok(Some(topic)),
        Err(error) => match error.downcast_ref::<HttpError>() {
            Some(http_error) if http_error.is_not_found() => Ok(None),
            _ => Err(error),
        },
    }
}

/// Creates the nightly-build topic for a version, with the announcement
/// for the given build as its first post.
#[tracing::instrument(skip(api, runtime_identifiers, options))]
pub async fn create_topic_for_version(
    api: &dyn ForumApi,
    version: &str,
    build: u64,
    hash: &str,
    runtime_identifiers: &[String],
    options: CreateTopicOptions,
) -> Result<Topic> {
    let post_body = build_post_body(version, build, hash, runtime_identifiers);

    api.create_topic(&NewTopic {
        forum_id: options.forum_id,
        title: topic_title(version),
        author_id: options.author_id,
        hidden: options.hidden,
        prefix: TOPIC_PREFIX.to_string(),
        featured: true,
        pinned: true,
        post_body,
    })
    .await
}

/// Creates a post on a topic, optionally backdated.
pub async fn make_topic_post(
    api: &dyn ForumApi,
    topic_id: u64,
    author_id: u64,
    post_body: &str,
    date: Option<&str>,
) -> Result<Post> {
    api.create_post(&NewPost {
        topic_id,
        author_id,
        hidden: None,
        date: date.map(str::to_string),
        post_body: post_body.to_string(),
    })
    .await
}

/// Snapshots a topic's current first post into a new post on the same
/// topic, carrying the original author, content, and date forward.
async fn clone_first_post(api: &dyn ForumApi, topic_id: u64) -> Result<Post> {
    let existing = api.get_topic(topic_id).await?;
    debug!(
        "Cloning post {} to preserve the current announcement of topic {}...",
        existing.first_post.id, existing.id
    );

    make_topic_post(
        api,
        existing.id,
        existing.first_post.author.id,
        &existing.first_post.content,
        Some(&existing.first_post.date),
    )
    .await
}

/// Replaces a topic's announcement with the one for a new build.
///
/// The previous announcement is cloned into a new post before the first
/// post is overwritten; if the clone fails the overwrite never runs, so
/// no history is lost on partial failure.
#[tracing::instrument(skip(api, runtime_identifiers))]
pub async fn update_topic_for_version(
    api: &dyn ForumApi,
    version: &str,
    build: u64,
    hash: &str,
    topic_id: u64,
    runtime_identifiers: &[String],
) -> Result<TopicUpdate> {
    let post = clone_first_post(api, topic_id).await?;

    let post_body = build_post_body(version, build, hash, runtime_identifiers);
    let topic = api.update_first_post(topic_id, &post_body).await?;

    Ok(TopicUpdate { topic, post })
}

/// Appends a build announcement as a new post on an existing topic,
/// leaving the topic's first post untouched.
#[tracing::instrument(skip(api, runtime_identifiers))]
pub async fn post_build_announcement(
    api: &dyn ForumApi,
    version: &str,
    build: u64,
    hash: &str,
    runtime_identifiers: &[String],
    topic_id: u64,
    author_id: u64,
    hidden: Visibility,
) -> Result<Post> {
    let post_body = build_post_body(version, build, hash, runtime_identifiers);

    api.create_post(&NewPost {
        topic_id,
        author_id,
        hidden: Some(hidden),
        date: None,
        post_body,
    })
    .await
}
