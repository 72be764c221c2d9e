//! HTTP transport trait.
//!
//! [`HttpClient`] is the seam between request building and the network.
//! The `sift` crate provides a hyper-based implementation; tests and custom
//! transports implement it directly.

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;

use crate::{Request, Response, Result};

/// Core HTTP client trait.
///
/// Implementations return the fully buffered response for any status code;
/// status classification happens in [`crate::ElasticResponse`].
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and return the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for any reason:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send;
}

impl<T: HttpClient> HttpClient for Arc<T> {
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send {
        T::execute(self, request)
    }
}
