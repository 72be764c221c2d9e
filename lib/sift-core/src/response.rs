//! Raw HTTP response as delivered by the transport.
//!
//! [`Response`] provides access to status, headers, and a fully buffered body.
//! Buffering happens once, in the transport, so the body can be decoded in
//! several modes without re-reading a stream.
//!
//! Higher-level, validated access lives in [`crate::ElasticResponse`].

use bytes::Bytes;
use http::HeaderMap;
use http::header::{AsHeaderName, CONTENT_TYPE};

/// HTTP response with status, headers, and body.
#[derive(Debug, Clone)]
pub struct Response<B = Bytes> {
    status: u16,
    headers: HeaderMap,
    body: B,
}

impl<B> Response<B> {
    /// Creates a new response.
    #[must_use]
    pub fn new(status: u16, headers: HeaderMap, body: B) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Response headers, in the order they were received.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of a header, if present and visible ASCII.
    ///
    /// Header names are case-insensitive.
    #[must_use]
    pub fn header<K: AsHeaderName>(&self, name: K) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// All values of a header.
    pub fn header_all<K: AsHeaderName>(&self, name: K) -> impl Iterator<Item = &str> {
        self.headers
            .get_all(name)
            .into_iter()
            .filter_map(|value| value.to_str().ok())
    }

    /// The `Content-Type` header.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE)
    }

    /// Response body.
    #[must_use]
    pub const fn body(&self) -> &B {
        &self.body
    }

    /// Status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Status is 4xx.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status < 500
    }

    /// Status is 5xx.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500 && self.status < 600
    }

}

#[cfg(test)]
mod tests {
    use http::HeaderValue;

    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn response_basic() {
        let response = Response::new(
            200,
            headers(&[("content-type", "application/json")]),
            Bytes::from(r#"{"id":1}"#),
        );

        assert_eq!(response.status(), 200);
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.content_type(), Some("application/json"));
        assert!(response.is_success());
        assert!(!response.is_client_error());
        assert!(!response.is_server_error());
    }

    #[test]
    fn response_header_lookup_is_case_insensitive() {
        let response = Response::new(
            200,
            headers(&[("x-elastic-product", "Elasticsearch")]),
            Bytes::new(),
        );

        assert_eq!(response.header("X-Elastic-Product"), Some("Elasticsearch"));
        assert_eq!(response.header("X-ELASTIC-PRODUCT"), Some("Elasticsearch"));
        assert_eq!(response.header("x-missing"), None);
    }

    #[test]
    fn response_multi_valued_header() {
        let response = Response::new(
            200,
            headers(&[("warning", "299 first"), ("warning", "299 second")]),
            Bytes::new(),
        );

        let warnings: Vec<_> = response.header_all("warning").collect();
        assert_eq!(warnings, ["299 first", "299 second"]);
        assert_eq!(response.header("warning"), Some("299 first"));
    }

    #[test]
    fn response_status_checks() {
        let response = Response::new(301, HeaderMap::new(), Bytes::new());
        assert!(!response.is_success());
        assert!(!response.is_client_error());

        let response = Response::new(404, HeaderMap::new(), Bytes::new());
        assert!(response.is_client_error());

        let response = Response::new(500, HeaderMap::new(), Bytes::new());
        assert!(response.is_server_error());
    }
}
