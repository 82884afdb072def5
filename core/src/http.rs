//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! builds `HttpRequest` values and parses `HttpResponse` values; a
//! `Transport` is responsible for executing the actual I/O.
//!
//! The body is a closed enum so the builder decides statically whether a
//! request is JSON (with an explicit content-type) or multipart (content-type
//! and boundary left to the transport).

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }
}

/// Request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum HttpBody {
    /// Serialized JSON document.
    Json(String),
    /// Form parts; the transport chooses the boundary.
    Multipart(MultipartForm),
}

/// Ordered list of multipart form parts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    pub parts: Vec<FormPart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.parts.push(FormPart {
            name: name.to_string(),
            value: FormValue::Text(value.into()),
        });
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: Vec<u8>) -> Self {
        self.parts.push(FormPart {
            name: name.to_string(),
            value: FormValue::File {
                file_name: file_name.to_string(),
                content_type: content_type.to_string(),
                bytes,
            },
        });
        self
    }

    /// Text value of the first part called `name`, if it is a text part.
    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.parts.iter().find(|p| p.name == name).and_then(|p| match &p.value {
            FormValue::Text(s) => Some(s.as_str()),
            FormValue::File { .. } => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormPart {
    pub name: String,
    pub value: FormValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    File {
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

/// An HTTP request described as plain data.
///
/// Built by `PostClient::build_*` methods and executed by a `Transport`.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<HttpBody>,
}

/// An HTTP response described as plain data.
///
/// Constructed by the transport after executing an `HttpRequest`, then passed
/// to `PostClient::parse_*` methods for deserialization.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
