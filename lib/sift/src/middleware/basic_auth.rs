//! Basic authentication middleware.
//!
//! Adds `Authorization: Basic <base64(user:pass)>` to every outgoing request,
//! for clusters secured with native realm users.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use base64::Engine;
use bytes::Bytes;
use tower::{Layer, Service};

use crate::{Error, Request, Response, Result};

fn encode(username: &str, password: &str) -> Arc<str> {
    let credentials = format!("{username}:{password}");
    Arc::from(base64::engine::general_purpose::STANDARD.encode(credentials))
}

/// Layer that adds basic authentication to requests.
///
/// # Example
///
/// ```
/// use sift::HyperClient;
/// use sift::middleware::BasicAuthLayer;
///
/// let client = HyperClient::builder()
///     .layer(BasicAuthLayer::new("elastic", "changeme"))
///     .build();
/// ```
#[derive(Clone)]
pub struct BasicAuthLayer {
    /// Base64-encoded "username:password".
    encoded_credentials: Arc<str>,
}

impl BasicAuthLayer {
    /// Create a new basic auth layer with the given username and password.
    pub fn new(username: impl AsRef<str>, password: impl AsRef<str>) -> Self {
        Self {
            encoded_credentials: encode(username.as_ref(), password.as_ref()),
        }
    }
}

impl std::fmt::Debug for BasicAuthLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuthLayer")
            .field("encoded_credentials", &"<redacted>")
            .finish()
    }
}

impl<S> Layer<S> for BasicAuthLayer {
    type Service = BasicAuth<S>;

    fn layer(&self, inner: S) -> Self::Service {
        BasicAuth {
            inner,
            encoded_credentials: Arc::clone(&self.encoded_credentials),
        }
    }
}

/// Service that adds basic authentication to requests.
#[derive(Clone)]
pub struct BasicAuth<S> {
    inner: S,
    encoded_credentials: Arc<str>,
}

impl<S> BasicAuth<S> {
    /// Create a new basic auth service wrapping the given service.
    pub fn new(inner: S, username: impl AsRef<str>, password: impl AsRef<str>) -> Self {
        Self {
            inner,
            encoded_credentials: encode(username.as_ref(), password.as_ref()),
        }
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for BasicAuth<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("inner", &self.inner)
            .field("encoded_credentials", &"<redacted>")
            .finish()
    }
}

impl<S> Service<Request<Bytes>> for BasicAuth<S>
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
        request.headers_mut().insert(
            "Authorization".to_string(),
            format!("Basic {}", self.encoded_credentials),
        );

        let mut inner = self.inner.clone();
        Box::pin(async move { inner.call(request).await })
    }
}
