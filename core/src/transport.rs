//! Executes `HttpRequest` values against the network.
//!
//! # Design
//! `Transport` is the single I/O seam of the crate; `ReqwestTransport` is the
//! production implementation and tests swap in their own. Deadlines and
//! cancellation are applied per call through `RequestOptions`, around the
//! whole round trip.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::ApiError;
use crate::http::{FormValue, HttpBody, HttpMethod, HttpRequest, HttpResponse, MultipartForm};

/// Per-request limits. The default waits indefinitely and cannot be cancelled.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub timeout: Option<Duration>,
    pub cancel: Option<CancellationToken>,
}

impl RequestOptions {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            cancel: None,
        }
    }

    pub fn with_cancel(token: CancellationToken) -> Self {
        Self {
            timeout: None,
            cancel: Some(token),
        }
    }

    /// Drive `fut` to completion unless the deadline passes or the token fires.
    pub async fn run<F, T>(&self, fut: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        let bounded = async {
            match self.timeout {
                Some(limit) => match tokio::time::timeout(limit, fut).await {
                    Ok(result) => result,
                    Err(_) => Err(ApiError::Timeout),
                },
                None => fut.await,
            }
        };

        match &self.cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(ApiError::Cancelled),
                result = bounded => result,
            },
            None => bounded.await,
        }
    }
}

/// Performs exactly one HTTP round trip per call.
///
/// Non-2xx responses are returned as data; only transport failures, timeouts
/// and cancellation are errors here.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(
        &self,
        request: HttpRequest,
        options: &RequestOptions,
    ) -> Result<HttpResponse, ApiError>;
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn round_trip(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = request.method.as_str(), url = %request.url, "sending request");

        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
        };

        let mut builder = self.client.request(method, request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match request.body {
            Some(HttpBody::Json(body)) => builder.body(body),
            Some(HttpBody::Multipart(form)) => builder.multipart(to_reqwest_form(form)?),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.text().await?;

        debug!(status, "received response");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(
        &self,
        request: HttpRequest,
        options: &RequestOptions,
    ) -> Result<HttpResponse, ApiError> {
        options.run(self.round_trip(request)).await
    }
}

fn to_reqwest_form(form: MultipartForm) -> Result<Form, ApiError> {
    let mut out = Form::new();
    for part in form.parts {
        out = match part.value {
            FormValue::Text(text) => out.text(part.name, text),
            FormValue::File {
                file_name,
                content_type,
                bytes,
            } => {
                let file = Part::bytes(bytes)
                    .file_name(file_name)
                    .mime_str(&content_type)?;
                out.part(part.name, file)
            }
        };
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn run_without_limits_passes_result_through() {
        let result = RequestOptions::default().run(async { Ok::<_, ApiError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn run_times_out() {
        let options = RequestOptions::with_timeout(Duration::from_millis(10));
        let result = options
            .run(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, ApiError>(())
            })
            .await;
        assert!(matches!(result, Err(ApiError::Timeout)));
    }

    #[tokio::test]
    async fn run_observes_cancellation() {
        let token = CancellationToken::new();
        token.cancel();
        let options = RequestOptions::with_cancel(token);
        let result = options
            .run(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, ApiError>(())
            })
            .await;
        assert!(matches!(result, Err(ApiError::Cancelled)));
    }

    #[test]
    fn form_conversion_accepts_markdown_mime() {
        let form = MultipartForm::new()
            .file("file", "a.md", "text/markdown", b"# A".to_vec())
            .text("author_id", "1");
        assert!(to_reqwest_form(form).is_ok());
    }
}
