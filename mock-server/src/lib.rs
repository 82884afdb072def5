//! In-memory implementation of the blog HTTP API.
//!
//! Serves the same routes and JSON shapes as the production backend so the
//! client crate can be exercised end to end.

pub mod error;
pub mod markdown;
pub mod store;

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use tracing::info;

pub use error::ServerError;
pub use store::{ListFilter, Post, PostCreate, PostPublishRequest, PostStatus, PostUpdate, Store};

use error::Result;

pub type Db = Arc<RwLock<Store>>;

const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 100;
const DEFAULT_UPLOAD_TITLE: &str = "Untitled";

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/posts", get(list_published_posts).post(create_post))
        .route("/posts/upload-markdown", post(upload_markdown_post))
        .route("/posts/{key}", get(get_post_by_slug).put(update_post))
        .route("/posts/{key}/publish", post(publish_post))
        .with_state(db)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub tag: Option<String>,
    pub author_id: Option<i64>,
}

impl ListParams {
    fn validate(self) -> Result<ListFilter> {
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(ServerError::Unprocessable(format!(
                "limit must be between 1 and {MAX_LIMIT}"
            )));
        }
        let offset = self.offset.unwrap_or(0);
        if offset < 0 {
            return Err(ServerError::Unprocessable(
                "offset must not be negative".to_string(),
            ));
        }
        Ok(ListFilter {
            limit: limit as usize,
            offset: offset as usize,
            tag: self.tag,
            author_id: self.author_id,
        })
    }
}

async fn list_published_posts(
    State(db): State<Db>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Post>>> {
    let filter = params.validate()?;
    let store = db.read().await;
    Ok(Json(store.list_published(&filter)))
}

async fn get_post_by_slug(State(db): State<Db>, Path(slug): Path<String>) -> Result<Json<Post>> {
    let store = db.read().await;
    store
        .get_published_by_slug(&slug)
        .cloned()
        .map(Json)
        .ok_or(ServerError::NotFound)
}

async fn create_post(State(db): State<Db>, Json(input): Json<PostCreate>) -> Json<Post> {
    let post = db.write().await.create_draft(input);
    info!(id = post.id, slug = %post.slug, "created draft");
    Json(post)
}

async fn update_post(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<PostUpdate>,
) -> Result<Json<Post>> {
    let post = db.write().await.update(id, input)?;
    Ok(Json(post))
}

async fn publish_post(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<PostPublishRequest>,
) -> Result<Json<Post>> {
    info!(author_id = input.author_id, id, "publishing post");
    let post = db.write().await.publish(id, input.author_id)?;
    Ok(Json(post))
}

async fn upload_markdown_post(State(db): State<Db>, mut form: Multipart) -> Result<Json<Post>> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut author_id = None;
    let mut default_title = DEFAULT_UPLOAD_TITLE.to_string();
    let mut default_tags = String::new();

    while let Some(field) = form.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                file = Some((file_name, bytes.to_vec()));
            }
            "author_id" => {
                let value = field.text().await?;
                let id = value.trim().parse::<i64>().map_err(|_| {
                    ServerError::Unprocessable(format!("invalid author_id: {value}"))
                })?;
                author_id = Some(id);
            }
            "default_title" => default_title = field.text().await?,
            "default_tags" => default_tags = field.text().await?,
            _ => {}
        }
    }

    let (file_name, bytes) =
        file.ok_or_else(|| ServerError::Unprocessable("missing file".to_string()))?;
    let author_id =
        author_id.ok_or_else(|| ServerError::Unprocessable("missing author_id".to_string()))?;

    if !file_name.ends_with(".md") {
        return Err(ServerError::BadRequest(
            "Only .md files are allowed.".to_string(),
        ));
    }
    let content = String::from_utf8(bytes)
        .map_err(|_| ServerError::BadRequest("File is not valid UTF-8.".to_string()))?;

    let title = markdown::extract_title(&content).unwrap_or(default_title);
    let mut tags = markdown::extract_tags(&content);
    if tags.is_empty() {
        tags = markdown::parse_tags(&default_tags);
    }

    let post = db.write().await.create_draft(PostCreate {
        title,
        content,
        tags,
        author_id,
    });
    info!(id = post.id, file = %file_name, "created draft from markdown");
    Ok(Json(post))
}
