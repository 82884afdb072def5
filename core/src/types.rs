//! Domain DTOs for the blog API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Timestamps stay as the strings the server sent so a record passes through
//! the client unaltered. Integration tests catch any schema drift between the
//! two crates.

use serde::{Deserialize, Deserializer, Serialize};

/// Lifecycle state of a post.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
    Archived,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
            PostStatus::Archived => "archived",
        }
    }
}

/// A single post returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub content: String,
    pub slug: String,
    pub status: PostStatus,
    pub tags: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
    pub published_at: Option<String>,
}

/// Request payload for creating a draft.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostCreate {
    pub title: String,
    pub content: String,
    pub author_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Request payload for updating a post.
///
/// Each optional field has three states: `None` leaves the key out of the
/// JSON, `Some(None)` sends an explicit `null`, `Some(Some(v))` sends `v`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostUpdate {
    pub author_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub content: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub tags: Option<Option<Vec<String>>>,
}

impl PostUpdate {
    pub fn new(author_id: i64) -> Self {
        Self {
            author_id,
            ..Self::default()
        }
    }
}

/// A key that is present maps to `Some`, even when its value is `null`.
fn present<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// Request payload for publishing a post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostPublishRequest {
    pub author_id: i64,
}

/// Filters for listing published posts. Unset filters are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPostsQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub tag: Option<String>,
    pub author_id: Option<i64>,
}

pub const DEFAULT_UPLOAD_TITLE: &str = "Untitled";
pub const MARKDOWN_MIME: &str = "text/markdown";

/// A markdown file to turn into a draft on the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownUpload {
    pub file_name: String,
    /// Media type of the file part.
    pub content_type: String,
    pub content: Vec<u8>,
    pub author_id: i64,
    /// Used when the document has no title of its own.
    pub default_title: String,
    /// Comma separated; used when the document declares no tags.
    pub default_tags: String,
}

impl MarkdownUpload {
    pub fn new(file_name: &str, content: impl Into<Vec<u8>>, author_id: i64) -> Self {
        Self {
            file_name: file_name.to_string(),
            content_type: MARKDOWN_MIME.to_string(),
            content: content.into(),
            author_id,
            default_title: DEFAULT_UPLOAD_TITLE.to_string(),
            default_tags: String::new(),
        }
    }

    pub fn default_title(mut self, title: &str) -> Self {
        self.default_title = title.to_string();
        self
    }

    pub fn default_tags(mut self, tags: &str) -> Self {
        self.default_tags = tags.to_string();
        self
    }

    pub fn content_type(mut self, content_type: &str) -> Self {
        self.content_type = content_type.to_string();
        self
    }
}
