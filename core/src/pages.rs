//! Page-load adapters: fetch what a view needs and hand it over unchanged.

use serde::Serialize;

use crate::api::PostApiClient;
use crate::error::ApiError;
use crate::transport::{RequestOptions, Transport};
use crate::types::{ListPostsQuery, Post};

/// Number of posts shown on the home page.
pub const HOME_PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HomePage {
    pub posts: Vec<Post>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostPage {
    pub post: Post,
}

pub async fn load_home<T: Transport>(api: &PostApiClient<T>) -> Result<HomePage, ApiError> {
    let query = ListPostsQuery {
        limit: Some(HOME_PAGE_SIZE),
        ..ListPostsQuery::default()
    };
    let posts = api
        .list_published_posts(&query, &RequestOptions::default())
        .await?;
    Ok(HomePage { posts })
}

pub async fn load_post<T: Transport>(
    api: &PostApiClient<T>,
    slug: &str,
) -> Result<PostPage, ApiError> {
    let post = api.get_post_by_slug(slug, &RequestOptions::default()).await?;
    Ok(PostPage { post })
}
