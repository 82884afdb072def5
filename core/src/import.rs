//! Import a local markdown file as a draft post.
//!
//! The file is sent through the markdown upload endpoint. When no default
//! title is given, the file stem is used so an untitled document still gets a
//! meaningful name.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;
use tracing::info;

use crate::api::PostApiClient;
use crate::config::ConfigError;
use crate::error::ApiError;
use crate::transport::{RequestOptions, Transport};
use crate::types::{MarkdownUpload, Post, DEFAULT_UPLOAD_TITLE};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Error reading {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Import a markdown file as a blog post.
#[derive(Debug, Clone, Parser)]
#[command(name = "import-markdown", version, long_about = None)]
pub struct ImportArgs {
    /// Path to the markdown file.
    #[arg(short, long)]
    pub file: PathBuf,

    /// Author id.
    #[arg(short, long)]
    pub author_id: i64,

    /// Title used when the document has none. Defaults to the file stem.
    #[arg(long)]
    pub default_title: Option<String>,

    /// Comma separated tags used when the document declares none.
    #[arg(long)]
    pub default_tags: Option<String>,
}

impl ImportArgs {
    pub fn effective_default_title(&self) -> String {
        if let Some(title) = self.default_title.as_deref().filter(|t| !t.is_empty()) {
            return title.to_string();
        }
        self.file
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .filter(|stem| !stem.is_empty())
            .unwrap_or_else(|| DEFAULT_UPLOAD_TITLE.to_string())
    }

    /// Tags trimmed, blanks dropped, joined back with commas.
    pub fn normalized_default_tags(&self) -> String {
        self.default_tags
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(",")
    }

    pub async fn load_upload(&self) -> Result<MarkdownUpload, ImportError> {
        let content = tokio::fs::read(&self.file)
            .await
            .map_err(|source| ImportError::Read {
                path: self.file.clone(),
                source,
            })?;
        let file_name = self
            .file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(MarkdownUpload::new(&file_name, content, self.author_id)
            .default_title(&self.effective_default_title())
            .default_tags(&self.normalized_default_tags()))
    }
}

pub async fn import_markdown<T: Transport>(
    api: &PostApiClient<T>,
    args: &ImportArgs,
    options: &RequestOptions,
) -> Result<Post, ImportError> {
    let upload = args.load_upload().await?;
    info!(file = %args.file.display(), author_id = args.author_id, "importing markdown");
    Ok(api.upload_markdown_post(&upload, options).await?)
}
