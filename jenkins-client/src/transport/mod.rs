//! Pluggable HTTP transport
//!
//! The client core never talks to an HTTP library directly. It asks a
//! [`Transport`] to parse URIs, build requests and bodies, and to execute
//! requests asynchronously, getting a [`Promise`] back.
//!
//! Two backends ship with the crate:
//! - [`ReqwestTransport`]: bundled reqwest client driven by a tokio runtime
//! - [`FactoryTransport`]: client-agnostic, built from explicit URI, request and
//!   stream factories around any [`AsyncHttpClient`]
//!
//! Both deliver every HTTP status as a fulfilled response; only failures to
//! reach the server reject the promise.

pub mod bundled;
pub mod factory;
pub mod multipart;
pub mod request;

pub use factory::{
    AsyncHttpClient, FactoryTransport, RequestFactory, StandardFactories, StreamFactory,
    UriFactory,
};
pub use request::{ApiRequest, Credentials, Fields, FormField};
pub use bundled::ReqwestTransport;

use std::fmt;

use bytes::Bytes;
use thiserror::Error;
use url::Url;

use crate::promise::{Promise, PromiseError};

pub const CONTENT_TYPE: &str = "Content-Type";
pub const AUTHORIZATION: &str = "Authorization";

/// Errors raised while building or dispatching a request
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("invalid URI '{uri}': {message}")]
    InvalidUri { uri: String, message: String },

    /// Multipart bodies need the outgoing request to find their boundary
    #[error("a request is required to build a multipart body")]
    MissingRequest,

    #[error("request has no multipart boundary in its Content-Type header")]
    MissingBoundary,

    /// The backend could not be set up (runtime or client construction)
    #[error("transport setup failed: {0}")]
    Setup(String),

    /// The request never produced a response (connection refused, timeout, ...)
    #[error("failed to send request: {0}")]
    Send(String),

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error(transparent)]
    Promise(#[from] PromiseError),
}

/// HTTP methods used by the Jenkins API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body produced by [`Transport::create_stream`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyStream {
    contents: Bytes,
    content_type: Option<String>,
}

impl BodyStream {
    pub fn new(contents: impl Into<Bytes>) -> Self {
        Self {
            contents: contents.into(),
            content_type: None,
        }
    }

    /// Content type the request must advertise for this body
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn contents(&self) -> &Bytes {
        &self.contents
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

/// Outgoing HTTP request
///
/// Builder methods take and return the request by value, so a request handed
/// to a transport is never changed behind its back.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    method: Method,
    uri: Url,
    headers: Vec<(String, String)>,
    body: Option<BodyStream>,
}

impl HttpRequest {
    pub fn new(method: Method, uri: Url) -> Self {
        Self {
            method,
            uri,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    /// Path plus query, as the server sees it
    pub fn path_and_query(&self) -> String {
        match self.uri.query() {
            Some(query) => format!("{}?{}", self.uri.path(), query),
            None => self.uri.path().to_string(),
        }
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// First value of a header, compared case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn body(&self) -> Option<&BodyStream> {
        self.body.as_ref()
    }

    /// Set a header, replacing any existing values
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(key, _)| !key.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    /// Append a header value, keeping existing ones
    pub fn with_added_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach a body; its content type, if any, replaces the request's
    pub fn with_body(mut self, body: BodyStream) -> Self {
        if let Some(content_type) = body.content_type() {
            self = self.with_header(CONTENT_TYPE, content_type);
        }
        self.body = Some(body);
        self
    }
}

/// Response as delivered by a transport, whatever its status
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, headers: Vec<(String, String)>, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Body as text; invalid UTF-8 sequences are replaced
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// 2xx, or a redirect the backend chose not to follow
    pub fn is_success(&self) -> bool {
        (200..400).contains(&self.status)
    }
}

/// Capability set the client core needs from an HTTP backend
pub trait Transport: Send + Sync {
    /// Parse and validate an absolute URI
    fn create_uri(&self, raw: &str) -> Result<Url, TransportError>;

    /// Build an outgoing request without body
    fn create_request(&self, method: Method, uri: &str) -> Result<HttpRequest, TransportError> {
        Ok(HttpRequest::new(method, self.create_uri(uri)?))
    }

    /// Build a request body from a raw string or a form field list
    ///
    /// Field lists always become `multipart/form-data`. The request, when
    /// given, is where the boundary is looked up.
    fn create_stream(
        &self,
        fields: &Fields,
        request: Option<&HttpRequest>,
    ) -> Result<BodyStream, TransportError>;

    /// Dispatch without blocking; the promise settles once a response arrives
    fn async_execute(&self, request: HttpRequest) -> Promise<HttpResponse, TransportError>;
}

/// URI parsing shared by the bundled factories and backends
pub(crate) fn parse_uri(raw: &str) -> Result<Url, TransportError> {
    Url::parse(raw).map_err(|error| TransportError::InvalidUri {
        uri: raw.to_string(),
        message: error.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> HttpRequest {
        HttpRequest::new(
            Method::Post,
            parse_uri("https://ci.example.com:8443/job/a%20b/build?delay=0sec").unwrap(),
        )
    }

    #[test]
    fn test_header_replace_and_append() {
        let request = request()
            .with_header("content-type", "text/plain")
            .with_header(CONTENT_TYPE, "text/xml")
            .with_added_header("X-Trace", "1")
            .with_added_header("X-Trace", "2");

        assert_eq!(request.header("Content-Type"), Some("text/xml"));
        assert_eq!(request.headers().len(), 3);
        assert_eq!(request.header("x-trace"), Some("1"));
    }

    #[test]
    fn test_body_content_type_overrides_header() {
        let request = request()
            .with_header(CONTENT_TYPE, "text/xml")
            .with_body(
                BodyStream::new("a=b").with_content_type("multipart/form-data; boundary=\"x\""),
            );
        assert_eq!(
            request.header(CONTENT_TYPE),
            Some("multipart/form-data; boundary=\"x\"")
        );

        let raw = self::request()
            .with_header(CONTENT_TYPE, "text/xml")
            .with_body(BodyStream::new("<project/>"));
        assert_eq!(raw.header(CONTENT_TYPE), Some("text/xml"));
        assert_eq!(raw.body().map(BodyStream::len), Some(10));
    }

    #[test]
    fn test_path_and_query() {
        assert_eq!(request().path_and_query(), "/job/a%20b/build?delay=0sec");
    }

    #[test]
    fn test_parse_uri_rejects_relative() {
        let error = parse_uri("/api/json").unwrap_err();
        assert!(matches!(error, TransportError::InvalidUri { .. }));
    }

    #[test]
    fn test_response_success_range() {
        assert!(HttpResponse::new(201, Vec::new(), "").is_success());
        assert!(HttpResponse::new(302, Vec::new(), "").is_success());
        assert!(!HttpResponse::new(404, Vec::new(), "").is_success());
        assert_eq!(HttpResponse::new(200, Vec::new(), vec![0x68, 0xff]).text(), "h\u{fffd}");
    }
}
