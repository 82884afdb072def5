//! Async operations of the blog API: one build, one round trip, one parse.

use crate::client::PostClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::transport::{RequestOptions, ReqwestTransport, Transport};
use crate::types::{ListPostsQuery, MarkdownUpload, Post, PostCreate, PostPublishRequest, PostUpdate};

/// Blog API client bound to a base URL and a transport.
///
/// Holds no state besides the two; concurrent calls are independent and no
/// ordering between them is imposed.
#[derive(Debug, Clone)]
pub struct PostApiClient<T = ReqwestTransport> {
    client: PostClient,
    transport: T,
}

impl PostApiClient<ReqwestTransport> {
    pub fn new(base_url: &str) -> Self {
        Self::with_transport(base_url, ReqwestTransport::default())
    }

    /// Build a client from configuration, applying its default timeout to
    /// every request.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let transport = ReqwestTransport::new(builder.build()?);
        Ok(Self::with_transport(&config.base_url, transport))
    }
}

impl<T: Transport> PostApiClient<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            client: PostClient::new(base_url),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `GET /posts` with the filters that are set.
    pub async fn list_published_posts(
        &self,
        query: &ListPostsQuery,
        options: &RequestOptions,
    ) -> Result<Vec<Post>, ApiError> {
        let request = self.client.build_list_published_posts(query);
        let response = self.transport.execute(request, options).await?;
        self.client.parse_list_published_posts(response)
    }

    /// `GET /posts/{slug}`.
    pub async fn get_post_by_slug(
        &self,
        slug: &str,
        options: &RequestOptions,
    ) -> Result<Post, ApiError> {
        let request = self.client.build_get_post_by_slug(slug);
        let response = self.transport.execute(request, options).await?;
        self.client.parse_get_post_by_slug(response)
    }

    /// `POST /posts`, creating a draft.
    pub async fn create_post(
        &self,
        input: &PostCreate,
        options: &RequestOptions,
    ) -> Result<Post, ApiError> {
        let request = self.client.build_create_post(input)?;
        let response = self.transport.execute(request, options).await?;
        self.client.parse_create_post(response)
    }

    /// `PUT /posts/{id}`.
    pub async fn update_post(
        &self,
        id: i64,
        input: &PostUpdate,
        options: &RequestOptions,
    ) -> Result<Post, ApiError> {
        let request = self.client.build_update_post(id, input)?;
        let response = self.transport.execute(request, options).await?;
        self.client.parse_update_post(response)
    }

    /// `POST /posts/{id}/publish`.
    pub async fn publish_post(
        &self,
        id: i64,
        input: &PostPublishRequest,
        options: &RequestOptions,
    ) -> Result<Post, ApiError> {
        let request = self.client.build_publish_post(id, input)?;
        let response = self.transport.execute(request, options).await?;
        self.client.parse_publish_post(response)
    }

    /// `POST /posts/upload-markdown` as a multipart form.
    pub async fn upload_markdown_post(
        &self,
        upload: &MarkdownUpload,
        options: &RequestOptions,
    ) -> Result<Post, ApiError> {
        let request = self.client.build_upload_markdown_post(upload);
        let response = self.transport.execute(request, options).await?;
        self.client.parse_upload_markdown_post(response)
    }
}
