//! High-level Elasticsearch client.
//!
//! [`ElasticClient`] combines a transport, the cluster URL and the
//! throw-on-error flag. Every call builds a request from an [`Endpoint`],
//! executes it, and validates the answer through [`ElasticResponse`].

use std::time::Duration;

use sift_core::{ElasticResponse, Endpoint, Params, endpoints};
use tracing::debug;
use url::Url;

use crate::{ClientConfig, Error, HttpClient, HyperClient, HyperClientBuilder, Result};

/// Default cluster address.
pub const DEFAULT_HOST: &str = "http://localhost:9200";

/// Elasticsearch client over any [`HttpClient`].
///
/// # Example
///
/// ```no_run
/// use sift::ElasticClient;
///
/// # async fn run() -> sift::Result<()> {
/// let client = ElasticClient::builder()
///     .host("https://search.example.com:9243")
///     .api_key("VnVhQ2ZHY0JDZGJrUW0tZTVhT3g6dWkybHAyYXhUTm1zeWFrdzl0dk5udw==")
///     .build()?;
///
/// let health = client.cluster_health(None).await?;
/// println!("status: {:?}", health.get("status")?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ElasticClient<C = HyperClient> {
    client: C,
    base_url: Url,
    throw_on_error: bool,
}

impl<C> ElasticClient<C> {
    /// Create a client for the given cluster URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn new(client: C, base_url: impl AsRef<str>) -> Result<Self> {
        Ok(Self::with_url(client, parse_host(base_url.as_ref())?))
    }

    /// Create a client with a pre-parsed URL.
    #[must_use]
    pub fn with_url(client: C, base_url: Url) -> Self {
        Self {
            client,
            base_url,
            throw_on_error: true,
        }
    }

    /// Whether 4xx/5xx responses are raised as errors (default `true`).
    ///
    /// When `false`, failure statuses are recorded and only visible through
    /// [`ElasticResponse::as_bool`] and [`ElasticResponse::status`].
    #[must_use]
    pub fn throw_on_error(mut self, throw_on_error: bool) -> Self {
        self.throw_on_error = throw_on_error;
        self
    }

    /// Current throw-on-error setting.
    #[must_use]
    pub const fn throws_on_error(&self) -> bool {
        self.throw_on_error
    }

    /// Cluster URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The transport.
    #[must_use]
    pub fn inner(&self) -> &C {
        &self.client
    }

    /// Consume the client and return the transport.
    #[must_use]
    pub fn into_inner(self) -> C {
        self.client
    }
}

impl ElasticClient<HyperClient> {
    /// Create a new client builder.
    #[must_use]
    pub fn builder() -> ElasticClientBuilder {
        ElasticClientBuilder::default()
    }
}

impl<C: HttpClient> ElasticClient<C> {
    /// Call an endpoint.
    ///
    /// # Errors
    ///
    /// - request building errors ([`Error::MissingParameter`], [`Error::UnexpectedParameter`], ...)
    /// - transport errors ([`Error::Connection`], [`Error::Timeout`], ...)
    /// - [`Error::ProductCheck`] when the server is not Elasticsearch
    /// - [`Error::ClientResponse`] / [`Error::ServerResponse`] when throwing on error
    pub async fn send(&self, endpoint: &Endpoint, params: Params) -> Result<ElasticResponse> {
        self.send_with(endpoint, params, self.throw_on_error).await
    }

    async fn send_with(
        &self,
        endpoint: &Endpoint,
        params: Params,
        throw_on_error: bool,
    ) -> Result<ElasticResponse> {
        let request = endpoint.request(&self.base_url, params)?;
        debug!(endpoint = endpoint.name, method = %request.method(), url = %request.url(), "calling endpoint");

        let response = self.client.execute(request).await?;
        ElasticResponse::from_response(response, throw_on_error)
    }

    /// Call an endpoint by API name, e.g. `cluster.health`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRequest`] for an unknown name, otherwise as [`Self::send`].
    pub async fn call(&self, name: &str, params: Params) -> Result<ElasticResponse> {
        let endpoint = endpoints::find(name)
            .ok_or_else(|| Error::invalid_request(format!("unknown endpoint '{name}'")))?;
        self.send(endpoint, params).await
    }

    /// `GET /`
    ///
    /// # Errors
    ///
    /// As [`Self::send`].
    pub async fn info(&self) -> Result<ElasticResponse> {
        self.send(&endpoints::INFO, Params::new()).await
    }

    /// `GET /{index}/_count`
    ///
    /// # Errors
    ///
    /// As [`Self::send`].
    pub async fn count(&self, index: &str) -> Result<ElasticResponse> {
        self.send(&endpoints::COUNT, Params::new().path("index", index))
            .await
    }

    /// `GET /{index}/_search_shards`
    ///
    /// # Errors
    ///
    /// As [`Self::send`].
    pub async fn search_shards(&self, index: &str) -> Result<ElasticResponse> {
        self.send(&endpoints::SEARCH_SHARDS, Params::new().path("index", index))
            .await
    }

    /// `GET /_cluster/health[/{index}]`
    ///
    /// # Errors
    ///
    /// As [`Self::send`].
    pub async fn cluster_health(&self, index: Option<&str>) -> Result<ElasticResponse> {
        let params = match index {
            Some(index) => Params::new().path("index", index),
            None => Params::new(),
        };
        self.send(&endpoints::cluster::HEALTH, params).await
    }

    /// `HEAD /{index}/_doc/{id}`, `true` when the document exists.
    ///
    /// A 404 is an answer here, not an error, whatever the throw-on-error setting.
    ///
    /// # Errors
    ///
    /// Transport errors, [`Error::ProductCheck`], and [`Error::ServerResponse`]
    /// when throwing on error.
    pub async fn exists(&self, index: &str, id: &str) -> Result<bool> {
        let params = Params::new().path("index", index).path("id", id);
        let response = self.send_with(&endpoints::EXISTS, params, false).await?;
        if self.throw_on_error
            && let Some(raw) = response.response().filter(|raw| raw.is_server_error())
        {
            return Err(Error::server_response(raw.clone()));
        }
        Ok(response.as_bool())
    }
}

/// Accept `host:port` as well as full URLs.
fn parse_host(host: &str) -> Result<Url> {
    let url = if host.contains("://") {
        Url::parse(host)?
    } else {
        Url::parse(&format!("http://{host}"))?
    };
    Ok(url)
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for an [`ElasticClient`] over [`HyperClient`].
#[derive(Debug)]
pub struct ElasticClientBuilder {
    host: String,
    transport: HyperClientBuilder,
    throw_on_error: bool,
}

impl Default for ElasticClientBuilder {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            transport: HyperClient::builder(),
            throw_on_error: true,
        }
    }
}

impl ElasticClientBuilder {
    /// Cluster address, e.g. `https://localhost:9200` or `localhost:9200`.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Transport configuration.
    #[must_use]
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.transport = self.transport.config(config);
        self
    }

    /// Request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.transport = self.transport.timeout(timeout);
        self
    }

    /// Connection timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.transport = self.transport.connect_timeout(timeout);
        self
    }

    /// Basic authentication.
    #[cfg(feature = "middleware-basic-auth")]
    #[must_use]
    pub fn basic_auth(mut self, username: impl AsRef<str>, password: impl AsRef<str>) -> Self {
        self.transport = self.transport.with_basic_auth(username, password);
        self
    }

    /// API key authentication.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.transport = self.transport.with_api_key(key);
        self
    }

    /// Request/response logging.
    #[must_use]
    pub fn logging(mut self) -> Self {
        self.transport = self.transport.with_logging();
        self
    }

    /// Retry transient failures up to `max_retries` times.
    #[cfg(feature = "middleware-retry")]
    #[must_use]
    pub fn retries(mut self, max_retries: u32) -> Self {
        self.transport = self.transport.with_retry(max_retries);
        self
    }

    /// Whether 4xx/5xx responses are raised as errors (default `true`).
    #[must_use]
    pub const fn throw_on_error(mut self, throw_on_error: bool) -> Self {
        self.throw_on_error = throw_on_error;
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the host cannot be parsed.
    pub fn build(self) -> Result<ElasticClient<HyperClient>> {
        let base_url = parse_host(&self.host)?;
        Ok(ElasticClient::with_url(self.transport.build(), base_url)
            .throw_on_error(self.throw_on_error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_host_forms() {
        assert_eq!(
            parse_host("localhost:9200").expect("host").as_str(),
            "http://localhost:9200/"
        );
        assert_eq!(
            parse_host("https://es.example.com:9243").expect("host").as_str(),
            "https://es.example.com:9243/"
        );
        assert!(parse_host("http://").is_err());
    }

    #[test]
    fn builder_defaults() {
        let client = ElasticClient::builder().build().expect("client");
        assert_eq!(client.base_url().as_str(), "http://localhost:9200/");
        assert!(client.throws_on_error());
    }

    #[test]
    fn builder_overrides() {
        let client = ElasticClient::builder()
            .host("es.internal:9200")
            .timeout(Duration::from_secs(5))
            .throw_on_error(false)
            .build()
            .expect("client");
        assert_eq!(client.base_url().host_str(), Some("es.internal"));
        assert_eq!(client.inner().config().timeout, Duration::from_secs(5));
        assert!(!client.throws_on_error());
    }
}
