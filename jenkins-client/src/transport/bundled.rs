//! Bundled transport built on reqwest
//!
//! Requests run on a tokio runtime: either one owned by the transport, or the
//! handle of an application runtime. In the latter case the runtime must be
//! multi-threaded, since the client core blocks the calling thread while the
//! request is in flight.

use std::fmt;

use async_trait::async_trait;
use tokio::runtime::{Builder, Handle, Runtime};
use tracing::debug;
use url::Url;

use super::factory::AsyncHttpClient;
use super::{
    BodyStream, CONTENT_TYPE, Fields, HttpRequest, HttpResponse, Method, Transport,
    TransportError, multipart, parse_uri,
};
use crate::config::Config;
use crate::promise::Promise;

const RUNTIME_THREADS: usize = 2;

/// Transport backed by a [`reqwest::Client`]
pub struct ReqwestTransport {
    client: reqwest::Client,
    runtime: Handle,
    /// Present when the transport created its own runtime
    owned: Option<Runtime>,
}

impl ReqwestTransport {
    /// Create a transport with a default reqwest client and its own runtime
    pub fn new() -> Result<Self, TransportError> {
        Self::with_client(reqwest::Client::new())
    }

    /// Create a transport honoring the timeout of a client configuration
    pub fn from_config(config: &Config) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|error| TransportError::Setup(error.to_string()))?;
        Self::with_client(client)
    }

    /// Create a transport around a configured reqwest client
    ///
    /// This allows you to configure proxies, TLS settings, etc.
    pub fn with_client(client: reqwest::Client) -> Result<Self, TransportError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(RUNTIME_THREADS)
            .thread_name("jenkins-transport")
            .enable_all()
            .build()
            .map_err(|error| TransportError::Setup(error.to_string()))?;
        Ok(Self {
            client,
            runtime: runtime.handle().clone(),
            owned: Some(runtime),
        })
    }

    /// Create a transport that spawns onto an existing multi-thread runtime
    pub fn with_handle(client: reqwest::Client, runtime: Handle) -> Self {
        Self {
            client,
            runtime,
            owned: None,
        }
    }
}

impl Drop for ReqwestTransport {
    fn drop(&mut self) {
        // Dropping a runtime from async context panics; background shutdown does not.
        if let Some(runtime) = self.owned.take() {
            runtime.shutdown_background();
        }
    }
}

impl fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("owns_runtime", &self.owned.is_some())
            .finish()
    }
}

impl Transport for ReqwestTransport {
    fn create_uri(&self, raw: &str) -> Result<Url, TransportError> {
        parse_uri(raw)
    }

    fn create_stream(
        &self,
        fields: &Fields,
        request: Option<&HttpRequest>,
    ) -> Result<BodyStream, TransportError> {
        match fields {
            Fields::Raw(raw) => Ok(BodyStream::new(raw.clone())),
            Fields::Form(form) => {
                let boundary = request
                    .and_then(|request| request.header(CONTENT_TYPE))
                    .and_then(multipart::boundary_from_content_type)
                    .map(str::to_string)
                    .unwrap_or_else(multipart::generate_boundary);
                Ok(BodyStream::new(multipart::encode(&boundary, form))
                    .with_content_type(multipart::content_type(&boundary)))
            }
        }
    }

    fn async_execute(&self, request: HttpRequest) -> Promise<HttpResponse, TransportError> {
        let client = self.client.clone();
        Promise::spawn(&self.runtime, async move { send(&client, request).await })
    }
}

/// Plain reqwest clients can also sit behind the factory transport
#[async_trait]
impl AsyncHttpClient for reqwest::Client {
    async fn send_async_request(
        &self,
        request: HttpRequest,
    ) -> Result<HttpResponse, TransportError> {
        send(self, request).await
    }
}

async fn send(
    client: &reqwest::Client,
    request: HttpRequest,
) -> Result<HttpResponse, TransportError> {
    let method = match request.method() {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
    };
    debug!(method = %request.method(), uri = %request.uri(), "sending request");

    let mut builder = client.request(method, request.uri().clone());
    for (name, value) in request.headers() {
        builder = builder.header(name.as_str(), value.as_str());
    }
    if let Some(body) = request.body() {
        builder = builder.body(body.contents().clone());
    }

    let response = builder
        .send()
        .await
        .map_err(|error| TransportError::Send(error.to_string()))?;

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
    let body = response
        .bytes()
        .await
        .map_err(|error| TransportError::Body(error.to_string()))?;

    debug!(status, bytes = body.len(), "received response");
    Ok(HttpResponse::new(status, headers, body))
}
