//! Async API client core for the blog service.
//!
//! # Overview
//! `PostClient` builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network. `PostApiClient` pairs it with a `Transport`
//! so each operation is one build, one round trip and one parse.
//!
//! # Design
//! - `PostClient` is stateless: it holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - JSON and multipart bodies are distinct `HttpBody` variants chosen by
//!   the builder, never inferred at send time.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod import;
pub mod pages;
pub mod transport;
pub mod types;

pub use api::PostApiClient;
pub use client::PostClient;
pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use http::{FormPart, FormValue, HttpBody, HttpMethod, HttpRequest, HttpResponse, MultipartForm};
pub use import::{import_markdown, ImportArgs, ImportError};
pub use pages::{load_home, load_post, HomePage, PostPage};
pub use transport::{RequestOptions, ReqwestTransport, Transport};
pub use types::{
    ListPostsQuery, MarkdownUpload, Post, PostCreate, PostPublishRequest, PostStatus, PostUpdate,
};
