//! Client-agnostic transport
//!
//! [`FactoryTransport`] does not know any HTTP library. It is assembled from
//! an [`AsyncHttpClient`] that sends requests and three small factories that
//! build URIs, requests and bodies. Any of them can be swapped independently.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::runtime::Handle;
use url::Url;

use super::{
    BodyStream, CONTENT_TYPE, Fields, HttpRequest, HttpResponse, Method, Transport,
    TransportError, multipart, parse_uri,
};
use crate::promise::Promise;

/// Anything that can send an [`HttpRequest`] and await its response
///
/// Every HTTP status must be returned as `Ok`; `Err` is reserved for requests
/// that never got an answer.
#[async_trait]
pub trait AsyncHttpClient: Send + Sync + 'static {
    async fn send_async_request(&self, request: HttpRequest)
    -> Result<HttpResponse, TransportError>;
}

pub trait UriFactory: Send + Sync {
    fn create_uri(&self, raw: &str) -> Result<Url, TransportError>;
}

pub trait RequestFactory: Send + Sync {
    fn create_request(&self, method: Method, uri: Url) -> HttpRequest;
}

pub trait StreamFactory: Send + Sync {
    fn create_stream(&self, contents: Bytes) -> BodyStream;
}

/// Default factories
///
/// Requests are stamped with a fresh multipart boundary up front, which is
/// what [`FactoryTransport::create_stream`] later reads back.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFactories;

impl UriFactory for StandardFactories {
    fn create_uri(&self, raw: &str) -> Result<Url, TransportError> {
        parse_uri(raw)
    }
}

impl RequestFactory for StandardFactories {
    fn create_request(&self, method: Method, uri: Url) -> HttpRequest {
        HttpRequest::new(method, uri).with_header(
            CONTENT_TYPE,
            multipart::content_type(&multipart::generate_boundary()),
        )
    }
}

impl StreamFactory for StandardFactories {
    fn create_stream(&self, contents: Bytes) -> BodyStream {
        BodyStream::new(contents)
    }
}

/// Transport composed from a client and factories
pub struct FactoryTransport<C> {
    client: Arc<C>,
    runtime: Handle,
    uri_factory: Box<dyn UriFactory>,
    request_factory: Box<dyn RequestFactory>,
    stream_factory: Box<dyn StreamFactory>,
}

impl<C: AsyncHttpClient> FactoryTransport<C> {
    /// `runtime` must be a multi-thread runtime: callers block while requests run.
    pub fn new(
        client: Arc<C>,
        runtime: Handle,
        uri_factory: Box<dyn UriFactory>,
        request_factory: Box<dyn RequestFactory>,
        stream_factory: Box<dyn StreamFactory>,
    ) -> Self {
        Self {
            client,
            runtime,
            uri_factory,
            request_factory,
            stream_factory,
        }
    }

    pub fn with_standard_factories(client: Arc<C>, runtime: Handle) -> Self {
        Self::new(
            client,
            runtime,
            Box::new(StandardFactories),
            Box::new(StandardFactories),
            Box::new(StandardFactories),
        )
    }

    pub fn client(&self) -> &Arc<C> {
        &self.client
    }
}

impl<C> fmt::Debug for FactoryTransport<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryTransport")
            .field("client", &std::any::type_name::<C>())
            .finish_non_exhaustive()
    }
}

impl<C: AsyncHttpClient> Transport for FactoryTransport<C> {
    fn create_uri(&self, raw: &str) -> Result<Url, TransportError> {
        self.uri_factory.create_uri(raw)
    }

    fn create_request(&self, method: Method, uri: &str) -> Result<HttpRequest, TransportError> {
        let uri = self.uri_factory.create_uri(uri)?;
        Ok(self.request_factory.create_request(method, uri))
    }

    fn create_stream(
        &self,
        fields: &Fields,
        request: Option<&HttpRequest>,
    ) -> Result<BodyStream, TransportError> {
        let request = request.ok_or(TransportError::MissingRequest)?;
        match fields {
            Fields::Raw(raw) => Ok(self
                .stream_factory
                .create_stream(Bytes::from(raw.clone()))),
            Fields::Form(form) => {
                let content_type = request
                    .header(CONTENT_TYPE)
                    .ok_or(TransportError::MissingBoundary)?;
                let boundary = multipart::boundary_from_content_type(content_type)
                    .ok_or(TransportError::MissingBoundary)?;
                Ok(self
                    .stream_factory
                    .create_stream(multipart::encode(boundary, form))
                    .with_content_type(multipart::content_type(boundary)))
            }
        }
    }

    fn async_execute(&self, request: HttpRequest) -> Promise<HttpResponse, TransportError> {
        let client = Arc::clone(&self.client);
        Promise::spawn(&self.runtime, async move {
            client.send_async_request(request).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::FormField;
    use std::sync::Mutex;
    use tokio::runtime::{Builder, Runtime};

    /// Echoes the request path and records what it was sent
    #[derive(Default)]
    struct Echo {
        seen: Mutex<Vec<HttpRequest>>,
    }

    #[async_trait]
    impl AsyncHttpClient for Echo {
        async fn send_async_request(
            &self,
            request: HttpRequest,
        ) -> Result<HttpResponse, TransportError> {
            let path = request.path_and_query();
            self.seen.lock().unwrap().push(request);
            if path == "/down" {
                return Err(TransportError::Send("connection refused".to_string()));
            }
            Ok(HttpResponse::new(200, Vec::new(), path))
        }
    }

    fn runtime() -> Runtime {
        Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap()
    }

    fn transport(runtime: &Runtime) -> FactoryTransport<Echo> {
        FactoryTransport::with_standard_factories(Arc::new(Echo::default()), runtime.handle().clone())
    }

    #[test]
    fn test_requests_carry_multipart_boundary() {
        let runtime = runtime();
        let transport = transport(&runtime);
        let request = transport
            .create_request(Method::Post, "http://ci.local:8080/job/foo/buildWithParameters")
            .unwrap();

        let content_type = request.header(CONTENT_TYPE).unwrap();
        assert!(content_type.starts_with("multipart/form-data; boundary=\""));

        let stream = transport
            .create_stream(&Fields::Form(vec![FormField::new("file1", "hello")]), Some(&request))
            .unwrap();
        let boundary = multipart::boundary_from_content_type(content_type).unwrap();
        let body = String::from_utf8(stream.contents().to_vec()).unwrap();
        assert!(body.starts_with(&format!("--{boundary}\r\n")));
        assert!(body.contains("Content-Disposition: form-data; name=\"file1\"\r\n"));
        assert!(body.contains("\r\n\r\nhello\r\n"));
        assert!(body.ends_with(&format!("--{boundary}--\r\n")));
        assert_eq!(stream.content_type(), Some(content_type));
    }

    #[test]
    fn test_stream_requires_request_and_boundary() {
        let runtime = runtime();
        let transport = transport(&runtime);
        let form = Fields::form([("a", "b")]);

        let missing = transport.create_stream(&form, None).unwrap_err();
        assert!(matches!(missing, TransportError::MissingRequest));

        let plain = HttpRequest::new(Method::Post, parse_uri("http://ci.local/x").unwrap())
            .with_header(CONTENT_TYPE, "text/xml");
        let missing = transport.create_stream(&form, Some(&plain)).unwrap_err();
        assert!(matches!(missing, TransportError::MissingBoundary));

        // Raw bodies do not care about the boundary
        let raw = transport
            .create_stream(&Fields::Raw("<project/>".to_string()), Some(&plain))
            .unwrap();
        assert_eq!(raw.contents().as_ref(), b"<project/>");
    }

    #[test]
    fn test_async_execute_settles_promise() {
        let runtime = runtime();
        let transport = transport(&runtime);

        let request = transport
            .create_request(Method::Get, "http://ci.local/api/json?tree=jobs")
            .unwrap();
        let response = transport.async_execute(request).wait().unwrap();
        assert_eq!(response.text(), "/api/json?tree=jobs");
        assert_eq!(transport.client().seen.lock().unwrap().len(), 1);

        let request = transport.create_request(Method::Get, "http://ci.local/down").unwrap();
        let error = transport.async_execute(request).wait().unwrap_err();
        assert!(matches!(error, TransportError::Send(_)));
    }

    #[test]
    fn test_invalid_uri_is_rejected() {
        let runtime = runtime();
        let transport = transport(&runtime);
        let error = transport.create_request(Method::Get, "not a uri").unwrap_err();
        assert!(matches!(error, TransportError::InvalidUri { .. }));
    }
}
