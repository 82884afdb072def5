//! Client configuration read from the environment.
//!
//! Variables use the `BLOG_API_` prefix: `BLOG_API_BASE_URL` and
//! `BLOG_API_TIMEOUT_SECS`. A `.env` file is read first when present; values
//! already set in the process environment take precedence over it.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

const ENV_PREFIX: &str = "BLOG_API_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Error parsing .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
    #[error("Error parsing environment: {0}")]
    Envy(#[from] envy::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

impl ClientConfig {
    /// Searches the current directory and its ancestors for `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::with_dotenv(dotenvy::dotenv_iter())
    }

    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::with_dotenv(dotenvy::from_path_iter(path))
    }

    fn with_dotenv(
        file: Result<dotenvy::Iter<File>, dotenvy::Error>,
    ) -> Result<Self, ConfigError> {
        let mut vars: HashMap<String, String> = match file {
            Ok(iter) => iter.collect::<Result<_, _>>()?,
            Err(e) if e.not_found() => {
                debug!("No .env file found");
                HashMap::new()
            }
            Err(e) => return Err(e.into()),
        };
        vars.extend(std::env::vars_os().filter_map(|(key, value)| {
            Some((key.into_string().ok()?, value.into_string().ok()?))
        }));

        Self::from_vars(vars)
    }

    /// Read configuration from explicit key/value pairs instead of the
    /// process environment.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX).from_iter(vars).map_err(ConfigError::from)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
