//! Stateless HTTP request builder and response parser for the blog API.
//!
//! # Design
//! `PostClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The transport executes the round trip in between, keeping this module
//! deterministic and free of I/O.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{de::DeserializeOwned, Serialize};
use url::form_urlencoded;

use crate::error::ApiError;
use crate::http::{HttpBody, HttpMethod, HttpRequest, HttpResponse, MultipartForm};
use crate::types::{ListPostsQuery, MarkdownUpload, Post, PostCreate, PostPublishRequest, PostUpdate};

/// Characters left as-is by `encodeURIComponent`.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Synchronous, stateless client for the blog API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network.
#[derive(Debug, Clone)]
pub struct PostClient {
    base_url: String,
}

impl PostClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_published_posts(&self, query: &ListPostsQuery) -> HttpRequest {
        let mut search = form_urlencoded::Serializer::new(String::new());
        if let Some(limit) = query.limit.filter(|&l| l != 0) {
            search.append_pair("limit", &limit.to_string());
        }
        if let Some(offset) = query.offset.filter(|&o| o != 0) {
            search.append_pair("offset", &offset.to_string());
        }
        if let Some(tag) = query.tag.as_deref().filter(|t| !t.is_empty()) {
            search.append_pair("tag", tag);
        }
        if let Some(author_id) = query.author_id {
            search.append_pair("author_id", &author_id.to_string());
        }

        let search = search.finish();
        let url = if search.is_empty() {
            format!("{}/posts", self.base_url)
        } else {
            format!("{}/posts?{search}", self.base_url)
        };
        get(url)
    }

    pub fn build_get_post_by_slug(&self, slug: &str) -> HttpRequest {
        let slug = utf8_percent_encode(slug, PATH_SEGMENT);
        get(format!("{}/posts/{slug}", self.base_url))
    }

    pub fn build_create_post(&self, input: &PostCreate) -> Result<HttpRequest, ApiError> {
        json_request(HttpMethod::Post, format!("{}/posts", self.base_url), input)
    }

    pub fn build_update_post(&self, id: i64, input: &PostUpdate) -> Result<HttpRequest, ApiError> {
        json_request(HttpMethod::Put, format!("{}/posts/{id}", self.base_url), input)
    }

    pub fn build_publish_post(
        &self,
        id: i64,
        input: &PostPublishRequest,
    ) -> Result<HttpRequest, ApiError> {
        json_request(
            HttpMethod::Post,
            format!("{}/posts/{id}/publish", self.base_url),
            input,
        )
    }

    /// Multipart request; carries no content-type header of its own.
    pub fn build_upload_markdown_post(&self, upload: &MarkdownUpload) -> HttpRequest {
        let form = MultipartForm::new()
            .file(
                "file",
                &upload.file_name,
                &upload.content_type,
                upload.content.clone(),
            )
            .text("author_id", upload.author_id.to_string())
            .text("default_title", upload.default_title.as_str())
            .text("default_tags", upload.default_tags.as_str());

        HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/posts/upload-markdown", self.base_url),
            headers: Vec::new(),
            body: Some(HttpBody::Multipart(form)),
        }
    }

    pub fn parse_list_published_posts(&self, response: HttpResponse) -> Result<Vec<Post>, ApiError> {
        parse_json(response)
    }

    pub fn parse_get_post_by_slug(&self, response: HttpResponse) -> Result<Post, ApiError> {
        parse_json(response)
    }

    pub fn parse_create_post(&self, response: HttpResponse) -> Result<Post, ApiError> {
        parse_json(response)
    }

    pub fn parse_update_post(&self, response: HttpResponse) -> Result<Post, ApiError> {
        parse_json(response)
    }

    pub fn parse_publish_post(&self, response: HttpResponse) -> Result<Post, ApiError> {
        parse_json(response)
    }

    pub fn parse_upload_markdown_post(&self, response: HttpResponse) -> Result<Post, ApiError> {
        parse_json(response)
    }
}

fn get(url: String) -> HttpRequest {
    HttpRequest {
        method: HttpMethod::Get,
        url,
        headers: Vec::new(),
        body: None,
    }
}

fn json_request<T: Serialize>(
    method: HttpMethod,
    url: String,
    input: &T,
) -> Result<HttpRequest, ApiError> {
    let body = serde_json::to_string(input).map_err(ApiError::Serialization)?;
    Ok(HttpRequest {
        method,
        url,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Some(HttpBody::Json(body)),
    })
}

/// Map non-2xx status codes to `ApiError::Http`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    tracing::warn!(status = response.status, "API request failed");
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(ApiError::InvalidResponse)
}
