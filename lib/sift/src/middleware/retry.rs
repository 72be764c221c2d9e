//! Retry policy for transient Elasticsearch failures.
//!
//! Retries happen at the transport layer; a response handed to
//! [`crate::ElasticResponse`] is always the final attempt.

use std::future;

use bytes::Bytes;
use tower::retry::Policy;
use tracing::debug;

use crate::{Error, Request, Response};

/// Statuses Elasticsearch returns for transient node conditions.
///
/// A retried status is still subject to the product check: a proxy's 502
/// without `X-Elastic-Product` surfaces as [`crate::Error::ProductCheck`],
/// not as a server error, once the retries are exhausted.
pub const RETRY_STATUSES: &[u16] = &[429, 502, 503, 504];

/// Retry policy for [`tower::retry::RetryLayer`].
///
/// By default, retries:
/// - Connection errors and timeouts, for idempotent methods only: a `POST`
///   may already have been applied when the connection dropped
/// - 429 Too Many Requests (rejected execution)
/// - 502, 503 and 504 (node unavailable, gateway errors)
///
/// # Example
///
/// ```
/// use sift::HyperClient;
/// use sift::middleware::{RetryLayer, RetryPolicy};
///
/// let client = HyperClient::builder()
///     .layer(RetryLayer::new(RetryPolicy::new(3)))
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    remaining: u32,
    statuses: &'static [u16],
}

impl RetryPolicy {
    /// Create a new retry policy with the given maximum number of retries.
    #[must_use]
    pub fn new(max_retries: u32) -> Self {
        Self {
            remaining: max_retries,
            statuses: RETRY_STATUSES,
        }
    }

    /// Replace the retried status codes.
    #[must_use]
    pub fn with_statuses(mut self, statuses: &'static [u16]) -> Self {
        self.statuses = statuses;
        self
    }

    fn should_retry_response(&self, response: &Response<Bytes>) -> bool {
        self.statuses.contains(&response.status())
    }

    fn should_retry_error(request: &Request<Bytes>, error: &Error) -> bool {
        request.method().is_idempotent() && (error.is_connection() || error.is_timeout())
    }
}

impl Policy<Request<Bytes>, Response<Bytes>, Error> for RetryPolicy {
    type Future = future::Ready<()>;

    fn retry(
        &mut self,
        req: &mut Request<Bytes>,
        result: &mut Result<Response<Bytes>, Error>,
    ) -> Option<Self::Future> {
        if self.remaining == 0 {
            return None;
        }

        let should_retry = match result {
            Ok(response) => self.should_retry_response(response),
            Err(error) => Self::should_retry_error(req, error),
        };

        if should_retry {
            self.remaining -= 1;
            debug!(url = %req.url(), remaining = self.remaining, "retrying request");
            Some(future::ready(()))
        } else {
            None
        }
    }

    fn clone_request(&mut self, req: &Request<Bytes>) -> Option<Request<Bytes>> {
        Some(req.clone())
    }
}

#[cfg(test)]
mod tests {
    use sift_core::HeaderMap;

    use super::*;

    fn response(status: u16) -> Response<Bytes> {
        Response::new(status, HeaderMap::new(), Bytes::new())
    }

    #[test]
    fn retries_transient_statuses() {
        let policy = RetryPolicy::new(3);
        for status in [429, 502, 503, 504] {
            assert!(policy.should_retry_response(&response(status)), "{status}");
        }
    }

    #[test]
    fn does_not_retry_other_statuses() {
        let policy = RetryPolicy::new(3);
        for status in [200, 400, 404, 409, 500] {
            assert!(!policy.should_retry_response(&response(status)), "{status}");
        }
    }

    #[test]
    fn custom_statuses() {
        let policy = RetryPolicy::new(1).with_statuses(&[500]);
        assert!(policy.should_retry_response(&response(500)));
        assert!(!policy.should_retry_response(&response(503)));
    }

    fn request(method: crate::Method) -> Request<Bytes> {
        let url = url::Url::parse("http://localhost:9200/").expect("valid URL");
        Request::builder(method, url).build()
    }

    #[test]
    fn retries_connection_and_timeout_errors() {
        let get = request(crate::Method::Get);
        assert!(RetryPolicy::should_retry_error(
            &get,
            &Error::connection("connection refused")
        ));
        assert!(RetryPolicy::should_retry_error(&get, &Error::Timeout));
        assert!(!RetryPolicy::should_retry_error(&get, &Error::ProductCheck));
    }

    #[test]
    fn does_not_retry_errors_on_post() {
        let mut post = request(crate::Method::Post);
        assert!(!RetryPolicy::should_retry_error(&post, &Error::Timeout));
        assert!(!RetryPolicy::should_retry_error(
            &post,
            &Error::connection("connection reset")
        ));

        let mut policy = RetryPolicy::new(3);
        let mut result = Err(Error::Timeout);
        assert!(policy.retry(&mut post, &mut result).is_none());

        let mut result = Ok(response(429));
        assert!(policy.retry(&mut post, &mut result).is_some());
    }

    #[test]
    fn stops_after_max_retries() {
        let mut request = request(crate::Method::Get);
        let mut policy = RetryPolicy::new(1);

        let mut result = Ok(response(503));
        assert!(policy.retry(&mut request, &mut result).is_some());
        assert!(policy.retry(&mut request, &mut result).is_none());
    }
}
