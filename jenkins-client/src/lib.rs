//! Jenkins HTTP Client
//!
//! A typed, blocking client for the Jenkins JSON API.
//!
//! Requests are built as [`ApiRequest`] descriptors, turned into HTTP requests
//! by a pluggable [`Transport`] and dispatched asynchronously. Every public
//! operation then waits on the returned [`Promise`], so the API is synchronous
//! from the caller's point of view.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use jenkins_client::{Config, JenkinsClient, ReqwestTransport};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::new("ci.example.com", 443, "admin", "11abc");
//!     let transport = ReqwestTransport::from_config(&config)?;
//!     let client = JenkinsClient::new(Arc::new(transport), config)?;
//!
//!     client.enable_crumbs()?;
//!     let job = client.get_job("nightly")?;
//!     if let Some(build) = job.last_build()? {
//!         println!("#{} {:?}", build.number(), build.result());
//!     }
//!     Ok(())
//! }
//! ```

pub mod components;
mod computers;
pub mod config;
mod crumb;
pub mod error;
mod jobs;
pub mod promise;
mod queue;
#[cfg(test)]
mod test_support;
pub mod transport;
mod views;

// Re-export commonly used types
pub use components::{Build, Computer, Executor, Job, JobQueue, Queue, TestReport, View};
pub use config::Config;
pub use error::{ClientError, Result};
pub use jenkins_core::domain::build::{BuildStatus, DEFAULT_BUILD_TREE};
pub use promise::{Outcome, Promise, PromiseError, PromiseState, Settled};
pub use transport::{
    ApiRequest, AsyncHttpClient, Credentials, FactoryTransport, Fields, FormField, HttpRequest,
    HttpResponse, Method, ReqwestTransport, Transport, TransportError,
};

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use jenkins_core::domain::root::RootInfo;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::crumb::CrumbState;
use crate::transport::AUTHORIZATION;

const ROOT_PATH: &str = "/api/json";

/// Client for one Jenkins controller
///
/// Cheap to clone: clones share the transport, the crumb state and the cached
/// root snapshot. Projections such as [`Job`] or [`Build`] keep a clone to
/// issue their follow-up requests.
#[derive(Clone)]
pub struct JenkinsClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    transport: Arc<dyn Transport>,
    /// Scheme, host and port (e.g., "https://ci.example.com:443")
    base_url: String,
    credentials: Credentials,
    crumb: Mutex<CrumbState>,
    /// Serializes crumb fetches
    crumb_flight: Mutex<()>,
    /// Root snapshot; the lock is held while it is being fetched
    root: Mutex<Option<Arc<RootInfo>>>,
}

impl JenkinsClient {
    /// Create a client, validating the configuration first
    ///
    /// No request is sent; crumbs start disabled.
    pub fn new(transport: Arc<dyn Transport>, config: Config) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                transport,
                base_url: config.base_url(),
                credentials: Credentials::new(config.username, config.token),
                crumb: Mutex::new(CrumbState::default()),
                crumb_flight: Mutex::new(()),
                root: Mutex::new(None),
            }),
        })
    }

    /// Get the base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn username(&self) -> &str {
        self.inner.credentials.username()
    }

    /// Fetch and cache the root snapshot unless it is already cached
    ///
    /// Concurrent callers wait for a single fetch. On failure nothing is
    /// cached, so the next call tries again.
    pub fn initialize(&self) -> Result<()> {
        self.root().map(|_| ())
    }

    /// Whether the server answers both the crumb issuer and the queue
    pub fn is_available(&self) -> bool {
        let probe = self.api_request(crumb::CRUMB_PATH);
        let result = self
            .execute(Method::Get, &probe, ignore_body)
            .and_then(|()| self.get_queue());

        match result {
            Ok(_) => true,
            Err(error) => {
                debug!(base_url = %self.base_url(), error = %error, "Jenkins is not available");
                false
            }
        }
    }

    // =============================================================================
    // Request Plumbing
    // =============================================================================

    /// Descriptor for `path` carrying the credentials and, when enabled, the crumb
    pub(crate) fn api_request(&self, path: impl Into<String>) -> ApiRequest {
        let request = ApiRequest::new(path, self.inner.credentials.clone());
        match self.crumb_header() {
            Some((name, value)) => request.with_header(name, value),
            None => request,
        }
    }

    pub(crate) fn root(&self) -> Result<Arc<RootInfo>> {
        let mut root = lock(&self.inner.root);
        if let Some(snapshot) = root.as_ref() {
            return Ok(Arc::clone(snapshot));
        }

        let request = self.api_request(ROOT_PATH);
        let snapshot = self
            .execute(Method::Get, &request, decode_json::<RootInfo>)
            .map_err(|error| match error {
                ClientError::Protocol { .. } => error,
                other => ClientError::Protocol {
                    path: ROOT_PATH.to_string(),
                    message: format!("failed to load root snapshot: {other}"),
                    source: Some(Arc::new(other)),
                },
            })?;

        let snapshot = Arc::new(snapshot);
        *root = Some(Arc::clone(&snapshot));
        debug!(jobs = snapshot.jobs.len(), views = snapshot.views.len(), "root snapshot cached");
        Ok(snapshot)
    }

    /// Build the HTTP request for a descriptor and hand it to the transport
    fn dispatch(
        &self,
        method: Method,
        request: &ApiRequest,
    ) -> Result<Promise<HttpResponse, TransportError>> {
        let path = request.path();
        let transport = &self.inner.transport;
        let build_failed = |source| ClientError::Transport {
            path: path.to_string(),
            source,
        };

        let uri = format!("{}{}", self.inner.base_url, path);
        let mut http = transport
            .create_request(method, &uri)
            .map_err(build_failed)?
            .with_header(AUTHORIZATION, request.credentials().basic_auth());
        for (name, value) in request.headers() {
            http = http.with_header(name.as_str(), value.as_str());
        }
        if let Some(fields) = request.fields() {
            let body = transport
                .create_stream(fields, Some(&http))
                .map_err(build_failed)?;
            http = http.with_body(body);
        }

        debug!(%method, path, "dispatching request");
        Ok(transport.async_execute(http))
    }

    /// Dispatch and chain `decode`, without waiting
    pub(crate) fn submit<T, D>(
        &self,
        method: Method,
        request: &ApiRequest,
        decode: D,
    ) -> Result<Promise<T, ClientError>>
    where
        T: Clone + Send + Sync + 'static,
        D: FnOnce(&str, HttpResponse) -> Result<T> + Send + 'static,
    {
        let pending = self.dispatch(method, request)?;
        let path = request.path().to_string();

        // Abandoned requests still report their path
        Ok(pending.then_settled(move |outcome| match outcome {
            Ok(Settled::Fulfilled(response)) => decode(path.as_str(), response),
            Ok(Settled::Rejected(error)) => Err(ClientError::request_failed(path, error)),
            Err(abandoned) => Err(ClientError::request_failed(path, abandoned.into())),
        }))
    }

    /// Dispatch, wait for the response and decode it
    pub(crate) fn execute<T, D>(&self, method: Method, request: &ApiRequest, decode: D) -> Result<T>
    where
        T: Clone + Send + Sync + 'static,
        D: FnOnce(&str, HttpResponse) -> Result<T> + Send + 'static,
    {
        let path = request.path();
        let outcome = match self.submit(method, request, decode)?.wait_settled() {
            Ok(settled) => settled.into_result(),
            Err(abandoned) => Err(ClientError::request_failed(path, abandoned.into())),
        };

        if let Err(error) = &outcome {
            warn!(%method, path, error = %error, "request failed");
        }
        outcome
    }

    /// Shorthand for a crumb-carrying GET decoded as JSON
    pub(crate) fn get_json<T>(&self, path: impl Into<String>) -> Result<T>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        self.execute(Method::Get, &self.api_request(path), decode_json::<T>)
    }

    /// Shorthand for a crumb-carrying GET returning the raw body
    pub(crate) fn get_text(&self, path: impl Into<String>) -> Result<String> {
        self.execute(Method::Get, &self.api_request(path), decode_text)
    }

    /// Shorthand for a crumb-carrying POST whose body is ignored
    pub(crate) fn post(&self, request: ApiRequest) -> Result<()> {
        self.execute(Method::Post, &request, ignore_body)
    }
}

impl fmt::Debug for JenkinsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JenkinsClient")
            .field("base_url", &self.inner.base_url)
            .field("credentials", &self.inner.credentials)
            .field("crumbs_enabled", &self.are_crumbs_enabled())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Response Handlers
// =============================================================================

/// Map non-success statuses to errors: 404 is `NotFound`, the rest `Request`
pub(crate) fn check_status(path: &str, response: &HttpResponse) -> Result<()> {
    if response.is_success() {
        return Ok(());
    }

    match response.status() {
        404 => Err(ClientError::NotFound {
            path: path.to_string(),
        }),
        status => {
            let message = match response.header("X-Error") {
                Some(reason) => format!("HTTP {status}: {reason}"),
                None => format!("HTTP {status}"),
            };
            Err(ClientError::status(path, status, message))
        }
    }
}

/// Strict JSON decode; malformed bodies and missing required fields fail
pub(crate) fn decode_json<T: DeserializeOwned>(path: &str, response: HttpResponse) -> Result<T> {
    check_status(path, &response)?;
    serde_json::from_slice(response.body()).map_err(|error| ClientError::protocol(path, error))
}

/// Body as text (console logs, XML configuration)
pub(crate) fn decode_text(path: &str, response: HttpResponse) -> Result<String> {
    check_status(path, &response)?;
    Ok(response.text())
}

pub(crate) fn ignore_body(path: &str, response: HttpResponse) -> Result<()> {
    check_status(path, &response)
}

/// Lock a mutex, recovering the data if a previous holder panicked
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
