//! Wire types for the Invision Community forum REST API.

use serde::{Deserialize, Serialize};

/// Visibility codes accepted by the forum API on create/update requests.
///
/// Responses report visibility as a plain boolean `hidden` flag; these
/// codes are request-side only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    HiddenPendingApproval,
    HiddenByModerator,
}

impl Visibility {
    /// Wire code sent in form-encoded request fields.
    pub fn code(self) -> i8 {
        match self {
            Visibility::Visible => 0,
            Visibility::HiddenPendingApproval => 1,
            Visibility::HiddenByModerator => -1,
        }
    }
}

/// A forum member, as embedded in posts and topics.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Member {
    pub id: u64,
    pub name: String,
}

/// A post on a topic.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Post {
    pub id: u64,
    /// Id of the topic this post belongs to.
    pub item_id: u64,
    pub date: String,
    pub author: Member,
    /// HTML content of the post.
    pub content: String,
    pub hidden: bool,
    pub url: String,
}

/// A forum topic; one exists per version, holding its nightly-build
/// announcement as the first post.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Topic {
    pub id: u64,
    pub title: String,
    pub posts: u64,
    pub views: u64,
    pub tags: Vec<String>,
    pub prefix: Option<String>,
    pub locked: bool,
    pub hidden: bool,
    pub pinned: bool,
    pub featured: bool,
    pub url: String,
    #[serde(rename = "firstPost")]
    pub first_post: Post,
}

/// One page of a paginated listing response.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse<T> {
    pub page: u64,
    pub per_page: u64,
    pub total_results: u64,
    pub total_pages: u64,
    pub results: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_codes() {
        assert_eq!(Visibility::Visible.code(), 0);
        assert_eq!(Visibility::HiddenPendingApproval.code(), 1);
        assert_eq!(Visibility::HiddenByModerator.code(), -1);
    }

    #[test]
    fn test_topic_deserializes_from_api_shape() {
        let topic: Topic = serde_json::from_str(
            r#"{
                "id": 6746,
                "title": "v0.7.2-beta Nightly Builds",
                "posts": 3,
                "views": 1200,
                "tags": ["nightly"],
                "prefix": "Intersect",
                "locked": false,
                "hidden": false,
                "pinned": true,
                "featured": true,
                "url": "https://forum.example/topic/6746",
                "firstPost": {
                    "id": 51,
                    "item_id": 6746,
                    "date": "2023-06-01T00:00:00Z",
                    "author": { "id": 5203, "name": "intersectbot" },
                    "content": "<p>old</p>",
                    "hidden": false,
                    "url": "https://forum.example/post/51"
                }
            }"#,
        )
        .unwrap();

        assert_eq!(topic.id, 6746);
        assert_eq!(topic.title, "v0.7.2-beta Nightly Builds");
        assert_eq!(topic.prefix.as_deref(), Some("Intersect"));
        assert!(topic.pinned);
        assert_eq!(topic.first_post.item_id, 6746);
        assert_eq!(topic.first_post.author.name, "intersectbot");
    }

    #[test]
    fn test_paged_response_camel_case_fields() {
        let page: PagedResponse<Member> = serde_json::from_str(
            r#"{
                "page": 1,
                "perPage": 1000,
                "totalResults": 1,
                "totalPages": 1,
                "results": [{ "id": 5203, "name": "intersectbot" }]
            }"#,
        )
        .unwrap();

        assert_eq!(page.per_page, 1000);
        assert_eq!(page.total_results, 1);
        assert_eq!(page.results.len(), 1);
    }
}
