//! Shared HTTP session.
//!
//! One [`HttpClient`] is built at startup and reused for every call, so
//! cookies, keep-alive connections and proxy credentials carry across the
//! whole run.

use reqwest::header::HeaderMap;
use reqwest::{Client, Proxy, Response};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::error::FetchError;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Proxy
// ============================================================================

/// Upstream HTTP proxy with basic credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Proxy host name or address.
    pub host: String,
    /// Proxy port.
    pub port: u16,
    /// Proxy login.
    pub login: String,
    /// Proxy password.
    pub password: String,
}

impl ProxyConfig {
    /// Returns the proxy URL with embedded credentials.
    pub fn url(&self) -> Result<Url, FetchError> {
        let mut url = Url::parse(&format!("http://{}:{}", self.host, self.port))
            .map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        url.set_username(&self.login)
            .map_err(|()| FetchError::InvalidUrl("proxy login rejected".to_string()))?;
        url.set_password(Some(&self.password))
            .map_err(|()| FetchError::InvalidUrl("proxy password rejected".to_string()))?;
        Ok(url)
    }
}

impl std::fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client wrapper with tracing, cookies and an optional proxy.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    proxied: bool,
}

impl HttpClient {
    /// Creates a client with the default timeout and no proxy.
    pub fn new() -> Result<Self, FetchError> {
        Self::builder().build()
    }

    /// Returns a builder.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Returns true if requests go through an upstream proxy.
    pub fn is_proxied(&self) -> bool {
        self.proxied
    }

    /// Performs a GET request.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get(&self, url: &str) -> Result<Response, FetchError> {
        debug!("GET request");

        let response = self.inner.get(url).send().await?;
        debug!(status = %response.status(), "Response received");
        Ok(response)
    }

    /// Performs a POST request with a JSON body and custom headers.
    #[instrument(skip(self, headers, body), fields(url = %url))]
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        headers: HeaderMap,
        body: &T,
    ) -> Result<Response, FetchError> {
        debug!("POST request with JSON");

        let response = self
            .inner
            .post(url)
            .headers(headers)
            .json(body)
            .send()
            .await?;
        debug!(status = %response.status(), "Response received");
        Ok(response)
    }

    /// Performs a POST request with an empty body.
    #[instrument(skip(self, headers), fields(url = %url))]
    pub async fn post_empty(&self, url: &str, headers: HeaderMap) -> Result<Response, FetchError> {
        debug!("POST request without body");

        let response = self.inner.post(url).headers(headers).send().await?;
        debug!(status = %response.status(), "Response received");
        Ok(response)
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`HttpClient`].
#[derive(Debug, Clone)]
pub struct HttpClientBuilder {
    timeout: Duration,
    proxy: Option<ProxyConfig>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            proxy: None,
        }
    }
}

impl HttpClientBuilder {
    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Routes every request through an upstream proxy.
    pub fn proxy(mut self, proxy: Option<ProxyConfig>) -> Self {
        self.proxy = proxy;
        self
    }

    /// Builds the client.
    pub fn build(self) -> Result<HttpClient, FetchError> {
        let mut builder = Client::builder()
            .timeout(self.timeout)
            .cookie_store(true)
            .gzip(true);

        if let Some(proxy) = &self.proxy {
            let url = proxy.url()?;
            debug!(host = %proxy.host, port = proxy.port, "Using upstream proxy");
            builder = builder.proxy(Proxy::all(url.as_str())?);
        }

        Ok(HttpClient {
            inner: builder.build()?,
            proxied: self.proxy.is_some(),
        })
    }
}
