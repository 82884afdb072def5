//! In-memory post repository and the blog rules applied to it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::{Result, ServerError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
    Archived,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub content: String,
    pub slug: String,
    pub status: PostStatus,
    pub tags: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize)]
pub struct PostCreate {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub author_id: i64,
}

/// Fields left out or sent as `null` keep their current value.
#[derive(Debug, Deserialize)]
pub struct PostUpdate {
    pub author_id: i64,
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct PostPublishRequest {
    pub author_id: i64,
}

/// Validated listing filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFilter {
    pub limit: usize,
    pub offset: usize,
    pub tag: Option<String>,
    pub author_id: Option<i64>,
}

#[derive(Debug)]
pub struct Store {
    posts: BTreeMap<i64, Post>,
    next_id: i64,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            posts: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl Store {
    pub fn create_draft(&mut self, input: PostCreate) -> Post {
        let now = OffsetDateTime::now_utc();
        let id = self.next_id;
        self.next_id += 1;

        let post = Post {
            id,
            author_id: input.author_id,
            slug: self.generate_slug(&input.title, None),
            title: input.title,
            content: input.content,
            status: PostStatus::Draft,
            tags: input.tags,
            created_at: now,
            updated_at: now,
            published_at: None,
        };
        self.posts.insert(id, post.clone());
        post
    }

    /// Only published posts are visible to readers.
    pub fn get_published_by_slug(&self, slug: &str) -> Option<&Post> {
        self.posts
            .values()
            .find(|p| p.slug == slug && p.status == PostStatus::Published)
    }

    /// Newest first by publication time, falling back to creation time.
    pub fn list_published(&self, filter: &ListFilter) -> Vec<Post> {
        let mut posts: Vec<&Post> = self
            .posts
            .values()
            .filter(|p| p.status == PostStatus::Published)
            .filter(|p| filter.tag.as_ref().map_or(true, |tag| p.tags.contains(tag)))
            .filter(|p| filter.author_id.map_or(true, |author| p.author_id == author))
            .collect();

        posts.sort_by(|a, b| {
            let key_a = a.published_at.unwrap_or(a.created_at);
            let key_b = b.published_at.unwrap_or(b.created_at);
            key_b.cmp(&key_a).then(b.id.cmp(&a.id))
        });

        posts
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit)
            .cloned()
            .collect()
    }

    pub fn update(&mut self, id: i64, input: PostUpdate) -> Result<Post> {
        let current = self.posts.get(&id).ok_or(ServerError::NotFound)?;
        if current.author_id != input.author_id {
            return Err(ServerError::Forbidden);
        }

        let new_slug = match &input.title {
            Some(title) if *title != current.title => Some(self.generate_slug(title, Some(id))),
            _ => None,
        };

        let post = self.posts.get_mut(&id).ok_or(ServerError::NotFound)?;
        if let Some(title) = input.title {
            post.title = title;
        }
        if let Some(content) = input.content {
            post.content = content;
        }
        if let Some(tags) = input.tags {
            post.tags = tags;
        }
        if let Some(slug) = new_slug {
            post.slug = slug;
        }
        post.updated_at = OffsetDateTime::now_utc();
        Ok(post.clone())
    }

    /// Publishing an already published post changes nothing.
    pub fn publish(&mut self, id: i64, author_id: i64) -> Result<Post> {
        let post = self.posts.get_mut(&id).ok_or(ServerError::NotFound)?;
        if post.author_id != author_id {
            return Err(ServerError::Forbidden);
        }
        if post.status != PostStatus::Published {
            let now = OffsetDateTime::now_utc();
            post.status = PostStatus::Published;
            post.published_at = Some(now);
            post.updated_at = now;
        }
        Ok(post.clone())
    }

    /// Lowercased title with whitespace runs joined by `-`, suffixed with
    /// `-1`, `-2`, ... until no other post uses it.
    fn generate_slug(&self, title: &str, owner: Option<i64>) -> String {
        let base = title
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-");
        let base = if base.is_empty() { "post".to_string() } else { base };

        let taken = |slug: &str| {
            self.posts
                .values()
                .any(|p| p.slug == slug && Some(p.id) != owner)
        };

        let mut slug = base.clone();
        let mut index = 1;
        while taken(&slug) {
            slug = format!("{base}-{index}");
            index += 1;
        }
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(store: &mut Store, title: &str, author_id: i64, tags: &[&str]) -> Post {
        store.create_draft(PostCreate {
            title: title.to_string(),
            content: "body".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            author_id,
        })
    }

    fn all() -> ListFilter {
        ListFilter {
            limit: 10,
            offset: 0,
            tag: None,
            author_id: None,
        }
    }

    #[test]
    fn create_assigns_ids_and_draft_status() {
        let mut store = Store::default();
        let first = draft(&mut store, "Hello World", 1, &[]);
        let second = draft(&mut store, "Other", 1, &[]);
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.status, PostStatus::Draft);
        assert_eq!(first.slug, "hello-world");
        assert!(first.published_at.is_none());
    }

    #[test]
    fn slug_collisions_get_suffixes() {
        let mut store = Store::default();
        assert_eq!(draft(&mut store, "Same", 1, &[]).slug, "same");
        assert_eq!(draft(&mut store, "same", 1, &[]).slug, "same-1");
        assert_eq!(draft(&mut store, "  SAME ", 1, &[]).slug, "same-2");
        assert_eq!(draft(&mut store, "   ", 1, &[]).slug, "post");
    }

    #[test]
    fn drafts_are_hidden_from_readers() {
        let mut store = Store::default();
        let post = draft(&mut store, "Secret", 1, &[]);
        assert!(store.get_published_by_slug("secret").is_none());
        assert!(store.list_published(&all()).is_empty());

        store.publish(post.id, 1).unwrap();
        assert_eq!(store.get_published_by_slug("secret").unwrap().id, post.id);
        assert_eq!(store.list_published(&all()).len(), 1);
    }

    #[test]
    fn publish_is_idempotent() {
        let mut store = Store::default();
        let post = draft(&mut store, "P", 1, &[]);
        let first = store.publish(post.id, 1).unwrap();
        let again = store.publish(post.id, 1).unwrap();
        assert_eq!(first.published_at, again.published_at);
        assert_eq!(again.status, PostStatus::Published);
    }

    #[test]
    fn publish_checks_author_and_existence() {
        let mut store = Store::default();
        let post = draft(&mut store, "P", 1, &[]);
        assert!(matches!(store.publish(post.id, 2), Err(ServerError::Forbidden)));
        assert!(matches!(store.publish(99, 1), Err(ServerError::NotFound)));
    }

    #[test]
    fn update_applies_present_fields_and_renames_slug() {
        let mut store = Store::default();
        let post = draft(&mut store, "Old Title", 1, &["a"]);
        let updated = store
            .update(
                post.id,
                PostUpdate {
                    author_id: 1,
                    title: Some("New Title".to_string()),
                    content: None,
                    tags: None,
                },
            )
            .unwrap();
        assert_eq!(updated.title, "New Title");
        assert_eq!(updated.slug, "new-title");
        assert_eq!(updated.content, "body");
        assert_eq!(updated.tags, ["a"]);
    }

    #[test]
    fn update_with_same_slug_keeps_it() {
        let mut store = Store::default();
        let post = draft(&mut store, "Title", 1, &[]);
        let updated = store
            .update(
                post.id,
                PostUpdate {
                    author_id: 1,
                    title: Some("title".to_string()),
                    content: None,
                    tags: None,
                },
            )
            .unwrap();
        assert_eq!(updated.slug, "title");
    }

    #[test]
    fn update_rejects_other_authors() {
        let mut store = Store::default();
        let post = draft(&mut store, "T", 1, &[]);
        let result = store.update(
            post.id,
            PostUpdate {
                author_id: 2,
                title: None,
                content: None,
                tags: None,
            },
        );
        assert!(matches!(result, Err(ServerError::Forbidden)));
    }

    #[test]
    fn list_filters_and_paginates() {
        let mut store = Store::default();
        for (title, author, tags) in [("A", 1, &["rust"][..]), ("B", 2, &["rust"][..]), ("C", 1, &["go"][..])] {
            let post = draft(&mut store, title, author, tags);
            store.publish(post.id, author).unwrap();
        }

        let titles = |filter: ListFilter| -> Vec<String> {
            store.list_published(&filter).into_iter().map(|p| p.title).collect()
        };

        assert_eq!(titles(all()), ["C", "B", "A"]);
        assert_eq!(
            titles(ListFilter {
                tag: Some("rust".to_string()),
                ..all()
            }),
            ["B", "A"]
        );
        assert_eq!(
            titles(ListFilter {
                author_id: Some(1),
                ..all()
            }),
            ["C", "A"]
        );
        assert_eq!(
            titles(ListFilter {
                limit: 1,
                offset: 1,
                ..all()
            }),
            ["B"]
        );
    }
}
