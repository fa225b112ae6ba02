//! Request/response transport.
//!
//! One attempt per call, no retries. A single deadline covers connect,
//! TLS handshake, request, and the full response body read. The body is
//! buffered in full before returning, which hands the connection back to
//! the pool. Both `http` and `https` remotes are served by the same client.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::{Method, Request, header};
use http_body_util::{BodyExt, Full};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use tracing::debug;
use url::Url;

use warpgrid_provider::{ProviderError, ProviderResult, TransportError, TransportErrorKind};

/// Deadline for a single provider call.
pub const PROVIDER_TIMEOUT: Duration = Duration::from_secs(5);

const USER_AGENT: &str = concat!("warpgrid-provider-http/", env!("CARGO_PKG_VERSION"));

/// Boxed future returned by [`Transport::send`].
pub type TransportFuture<'a> = Pin<Box<dyn Future<Output = Result<Bytes, TransportError>> + Send + 'a>>;

/// Sends one request and returns the raw response body.
///
/// Injected into the client for testability.
pub trait Transport: Send + Sync {
    fn send<'a>(&'a self, method: Method, url: &'a Url, body: Option<Vec<u8>>) -> TransportFuture<'a>;
}

/// Client TLS configuration trusting the Mozilla root store.
fn tls_config() -> ProviderResult<rustls::ClientConfig> {
    let mut root_store = rustls::RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let config = rustls::ClientConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_safe_default_protocol_versions()
    .map_err(|e| ProviderError::Config(format!("tls protocol version error: {e}")))?
    .with_root_certificates(root_store)
    .with_no_client_auth();
    Ok(config)
}

/// HTTP/1.1 transport backed by a pooled hyper client.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    timeout: Duration,
}

impl HttpTransport {
    /// Transport with the standard [`PROVIDER_TIMEOUT`].
    pub fn new() -> ProviderResult<Self> {
        Self::with_timeout(PROVIDER_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> ProviderResult<Self> {
        let connector = HttpsConnectorBuilder::new()
            .with_tls_config(tls_config()?)
            .https_or_http()
            .enable_http1()
            .build();
        let client = Client::builder(TokioExecutor::new()).build(connector);
        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn round_trip(
        &self,
        method: Method,
        url: &Url,
        body: Option<Vec<u8>>,
    ) -> Result<Bytes, TransportError> {
        let mut builder = Request::builder()
            .method(method.clone())
            .uri(url.as_str())
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::ACCEPT, "application/json");
        if body.is_some() {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }
        let req = builder
            .body(Full::new(body.map(Bytes::from).unwrap_or_default()))
            .map_err(|e| TransportError::new(TransportErrorKind::Request, e.to_string()))?;

        let resp = self
            .client
            .request(req)
            .await
            .map_err(|e| TransportError::connect(e.to_string()))?;
        let status = resp.status();

        let bytes = resp
            .into_body()
            .collect()
            .await
            .map_err(|e| TransportError::connect(format!("reading response body: {e}")))?
            .to_bytes();

        debug!(%method, %url, status = status.as_u16(), bytes = bytes.len(), "provider response");

        if !status.is_success() {
            let snippet = String::from_utf8_lossy(&bytes[..bytes.len().min(256)]).into_owned();
            return Err(TransportError::status(status.as_u16(), snippet));
        }

        Ok(bytes)
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Transport for HttpTransport {
    fn send<'a>(&'a self, method: Method, url: &'a Url, body: Option<Vec<u8>>) -> TransportFuture<'a> {
        Box::pin(async move {
            match tokio::time::timeout(self.timeout, self.round_trip(method, url, body)).await {
                Ok(result) => result,
                Err(_) => Err(TransportError::timeout(format!(
                    "no complete response within {:?}",
                    self.timeout
                ))),
            }
        })
    }
}
