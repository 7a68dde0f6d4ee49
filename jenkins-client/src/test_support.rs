//! Scripted Jenkins stub for unit tests
//!
//! Routes are keyed by method and path (query excluded). Unknown routes answer
//! 404 like Jenkins does. Every request is recorded for call-count assertions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::runtime::{Builder, Runtime};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::transport::{
    AsyncHttpClient, FactoryTransport, HttpRequest, HttpResponse, Method, Transport,
    TransportError,
};
use crate::{Config, JenkinsClient};

#[derive(Clone)]
enum Reply {
    Respond {
        status: u16,
        headers: Vec<(String, String)>,
        body: String,
    },
    Refuse,
}

#[derive(Default)]
pub(crate) struct StubJenkins {
    routes: Mutex<HashMap<(Method, String), Reply>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl StubJenkins {
    pub fn respond(
        &self,
        method: Method,
        path: &str,
        status: u16,
        headers: &[(&str, &str)],
        body: &str,
    ) {
        let headers = headers
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        self.routes.lock().unwrap().insert(
            (method, path.to_string()),
            Reply::Respond {
                status,
                headers,
                body: body.to_string(),
            },
        );
    }

    pub fn on_get_json(&self, path: &str, body: &str) {
        self.respond(
            Method::Get,
            path,
            200,
            &[("Content-Type", "application/json")],
            body,
        );
    }

    pub fn on_get(&self, path: &str, status: u16, body: &str) {
        self.respond(Method::Get, path, status, &[], body);
    }

    pub fn on_post(&self, path: &str, status: u16) {
        self.respond(Method::Post, path, status, &[], "");
    }

    /// Simulate a refused connection for both methods
    pub fn fail(&self, path: &str) {
        let mut routes = self.routes.lock().unwrap();
        for method in [Method::Get, Method::Post] {
            routes.insert((method, path.to_string()), Reply::Refuse);
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<HttpRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    /// Requests sent to `path` (query excluded) with `method`
    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|request| request.method() == method && request.uri().path() == path)
            .count()
    }
}

#[async_trait]
impl AsyncHttpClient for StubJenkins {
    async fn send_async_request(
        &self,
        request: HttpRequest,
    ) -> Result<HttpResponse, TransportError> {
        let key = (request.method(), request.uri().path().to_string());
        self.requests.lock().unwrap().push(request);

        let reply = self.routes.lock().unwrap().get(&key).cloned();
        match reply {
            Some(Reply::Respond {
                status,
                headers,
                body,
            }) => Ok(HttpResponse::new(status, headers, body)),
            Some(Reply::Refuse) => Err(TransportError::Send("connection refused".to_string())),
            None => Ok(HttpResponse::new(404, Vec::new(), "Not Found")),
        }
    }
}

/// Client wired to a [`StubJenkins`] through the factory transport
pub(crate) struct Harness {
    pub client: JenkinsClient,
    pub stub: Arc<StubJenkins>,
    transport: Arc<dyn Transport>,
    _runtime: Runtime,
}

/// Route client logs to the test output; `RUST_LOG` picks the level
fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jenkins_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

/// Multi-thread runtime for driving transports in tests
pub(crate) fn test_runtime() -> Runtime {
    init_tracing();
    Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .unwrap()
}

/// Plaintext client for ci.local:8080 sending through `http`
pub(crate) fn client_over<C>(http: Arc<C>, runtime: &Runtime) -> (JenkinsClient, Arc<dyn Transport>)
where
    C: AsyncHttpClient + 'static,
{
    let transport: Arc<dyn Transport> = Arc::new(FactoryTransport::with_standard_factories(
        http,
        runtime.handle().clone(),
    ));
    let config = Config::new("ci.local", 8080, "admin", "secret").with_https(false);
    let client = JenkinsClient::new(Arc::clone(&transport), config).unwrap();
    (client, transport)
}

impl Harness {
    pub fn new() -> Self {
        let runtime = test_runtime();
        let stub = Arc::new(StubJenkins::default());
        let (client, transport) = client_over(Arc::clone(&stub), &runtime);

        Self {
            client,
            stub,
            transport,
            _runtime: runtime,
        }
    }

    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }
}
