//! Elasticsearch API key authentication middleware.
//!
//! Adds `Authorization: ApiKey <key>` to every outgoing request, where `<key>`
//! is the base64 `encoded` value returned by the create API key API.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use tower::{Layer, Service};

use crate::{Error, Request, Response, Result};

/// Layer that adds API key authentication to requests.
///
/// # Example
///
/// ```
/// use sift::HyperClient;
/// use sift::middleware::ApiKeyLayer;
///
/// let client = HyperClient::builder()
///     .layer(ApiKeyLayer::new("VnVhQ2ZHY0JDZGJrUW0tZTVhT3g6dWkybHAyYXhUTm1zeWFrdzl0dk5udw=="))
///     .build();
/// ```
#[derive(Clone)]
pub struct ApiKeyLayer {
    key: Arc<str>,
}

impl ApiKeyLayer {
    /// Create a new API key layer from an encoded key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: Arc::from(key.into()),
        }
    }
}

impl std::fmt::Debug for ApiKeyLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyLayer")
            .field("key", &"<redacted>")
            .finish()
    }
}

impl<S> Layer<S> for ApiKeyLayer {
    type Service = ApiKey<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ApiKey {
            inner,
            key: Arc::clone(&self.key),
        }
    }
}

/// Service that adds API key authentication to requests.
#[derive(Clone)]
pub struct ApiKey<S> {
    inner: S,
    key: Arc<str>,
}

impl<S> ApiKey<S> {
    /// Create a new API key service wrapping the given service.
    pub fn new(inner: S, key: impl Into<String>) -> Self {
        Self {
            inner,
            key: Arc::from(key.into()),
        }
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for ApiKey<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKey")
            .field("inner", &self.inner)
            .field("key", &"<redacted>")
            .finish()
    }
}

impl<S> Service<Request<Bytes>> for ApiKey<S>
where
    S: Service<Request<Bytes>, Response = Response<Bytes>, Error = Error> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response<Bytes>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Bytes>) -> Self::Future {
        request
            .headers_mut()
            .insert("Authorization".to_string(), format!("ApiKey {}", self.key));

        let mut inner = self.inner.clone();
        Box::pin(async move { inner.call(request).await })
    }
}
