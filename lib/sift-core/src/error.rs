//! Error types for sift.

use bytes::Bytes;
use derive_more::{Display, Error, From};

use crate::Response;

// ============================================================================
// Decode Error
// ============================================================================

/// A response body could not be decoded in the requested mode.
///
/// Cloneable so a failed decode can be cached and reported again on the
/// next access without decoding twice.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("cannot decode response body at '{path}': {message}")]
pub struct DecodeError {
    /// JSON path to the failure (e.g. `hits.hits[0]._source`), empty for syntax errors.
    pub path: String,
    /// Decoder message.
    pub message: String,
}

impl DecodeError {
    /// Create a decode error.
    #[must_use]
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

/// Main error type for sift operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// The response was not produced by Elasticsearch.
    ///
    /// Raised when the `X-Elastic-Product` header is missing or holds another
    /// value, usually because of a proxy, a gateway or an incompatible server.
    #[display(
        "the client noticed that the server is not Elasticsearch and does not support this unknown product"
    )]
    #[from(skip)]
    ProductCheck,

    /// 4xx status code.
    #[display("{message}")]
    #[from(skip)]
    ClientResponse {
        /// HTTP status code.
        status: u16,
        /// Status line and body.
        message: String,
        /// The full response.
        #[error(not(source))]
        response: Box<Response<Bytes>>,
    },

    /// 5xx status code.
    #[display("{message}")]
    #[from(skip)]
    ServerResponse {
        /// HTTP status code.
        status: u16,
        /// Status line and body.
        message: String,
        /// The full response.
        #[error(not(source))]
        response: Box<Response<Bytes>>,
    },

    /// Body cannot be decoded in the requested mode.
    #[display("{_0}")]
    #[from]
    Decode(DecodeError),

    /// Attempt to mutate the read-only payload view.
    #[display("the response payload is read-only, mutate a copy of it instead")]
    #[from(skip)]
    ArrayAccess,

    /// A required path parameter or body was not supplied.
    #[display("missing parameter(s) for '{endpoint}': {}", names.join(", "))]
    #[from(skip)]
    MissingParameter {
        /// API name of the endpoint.
        #[error(not(source))]
        endpoint: &'static str,
        /// Names of the missing parameters.
        names: Vec<String>,
    },

    /// A parameter that the endpoint does not accept.
    #[display("parameter '{name}' is not supported by '{endpoint}'")]
    #[from(skip)]
    UnexpectedParameter {
        /// API name of the endpoint.
        #[error(not(source))]
        endpoint: &'static str,
        /// Rejected parameter name.
        name: String,
    },

    /// Invalid request configuration.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// Query string serialization error.
    #[display("query serialization error: {_0}")]
    #[from]
    QuerySerialization(serde_html_form::ser::Error),

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Request timeout.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a [`Error::ClientResponse`] from a 4xx response.
    #[must_use]
    pub fn client_response(response: Response<Bytes>) -> Self {
        let status = response.status();
        Self::ClientResponse {
            status,
            message: status_message(&response),
            response: Box::new(response),
        }
    }

    /// Build a [`Error::ServerResponse`] from a 5xx response.
    #[must_use]
    pub fn server_response(response: Response<Bytes>) -> Self {
        let status = response.status();
        Self::ServerResponse {
            status,
            message: status_message(&response),
            response: Box::new(response),
        }
    }

    /// Create a missing parameter error.
    #[must_use]
    pub fn missing_parameter<I, S>(endpoint: &'static str, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MissingParameter {
            endpoint,
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Create an unexpected parameter error.
    #[must_use]
    pub fn unexpected_parameter(endpoint: &'static str, name: impl Into<String>) -> Self {
        Self::UnexpectedParameter {
            endpoint,
            name: name.into(),
        }
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns `true` if this is a product check failure.
    #[must_use]
    pub const fn is_product_check(&self) -> bool {
        matches!(self, Self::ProductCheck)
    }

    /// Returns the HTTP status code for client/server response errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::ClientResponse { status, .. } | Self::ServerResponse { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Returns `true` if this is a client error (4xx).
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::ClientResponse { .. })
    }

    /// Returns `true` if this is a server error (5xx).
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::ServerResponse { .. })
    }

    /// Returns `true` if this is a 404 Not Found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// The response carried by a client/server response error.
    #[must_use]
    pub fn response(&self) -> Option<&Response<Bytes>> {
        match self {
            Self::ClientResponse { response, .. } | Self::ServerResponse { response, .. } => {
                Some(response)
            }
            _ => None,
        }
    }

    /// Try to decode the body of a client/server response error as JSON.
    ///
    /// Elasticsearch reports failures as `{"error": {...}, "status": 404}`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// match client.send(&endpoints::GET, params).await {
    ///     Err(e) if e.is_not_found() => {
    ///         if let Some(Ok(body)) = e.decode_body::<serde_json::Value>() {
    ///             println!("{}", body["error"]["reason"]);
    ///         }
    ///     }
    ///     other => { /* ... */ }
    /// }
    /// ```
    pub fn decode_body<T: serde::de::DeserializeOwned>(&self) -> Option<Result<T>> {
        self.response()
            .map(|response| crate::from_json(response.body()))
    }
}

/// `"404 Not Found: {body}"`, the message carried by status errors.
fn status_message(response: &Response<Bytes>) -> String {
    let status = response.status();
    let reason = http::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("Unknown Status");
    format!(
        "{status} {reason}: {}",
        String::from_utf8_lossy(response.body())
    )
}

#[cfg(test)]
mod tests {
    use http::HeaderMap;

    use super::*;

    fn response(status: u16, body: &'static str) -> Response<Bytes> {
        Response::new(status, HeaderMap::new(), Bytes::from_static(body.as_bytes()))
    }

    #[test]
    fn error_display() {
        let err = Error::client_response(response(404, r#"{"found":false}"#));
        assert_eq!(err.to_string(), r#"404 Not Found: {"found":false}"#);

        let err = Error::server_response(response(503, "unavailable"));
        assert_eq!(err.to_string(), "503 Service Unavailable: unavailable");

        let err = Error::Timeout;
        assert_eq!(err.to_string(), "request timeout");

        let err = Error::missing_parameter("get", ["index", "id"]);
        assert_eq!(err.to_string(), "missing parameter(s) for 'get': index, id");

        let err = Error::from(DecodeError::new("hits.total", "invalid type"));
        assert_eq!(
            err.to_string(),
            "cannot decode response body at 'hits.total': invalid type"
        );
    }

    #[test]
    fn error_status() {
        let err = Error::client_response(response(404, ""));
        assert_eq!(err.status(), Some(404));
        assert!(err.is_client_error());
        assert!(!err.is_server_error());
        assert!(err.is_not_found());

        let err = Error::server_response(response(500, ""));
        assert_eq!(err.status(), Some(500));
        assert!(!err.is_client_error());
        assert!(err.is_server_error());

        assert_eq!(Error::ProductCheck.status(), None);
        assert!(!Error::ArrayAccess.is_client_error());
    }

    #[test]
    fn error_predicates() {
        assert!(Error::Timeout.is_timeout());
        assert!(Error::connection("refused").is_connection());
        assert!(Error::ProductCheck.is_product_check());
        assert!(!Error::Timeout.is_connection());
    }

    #[test]
    fn error_carries_response() {
        let err = Error::client_response(response(400, "bad"));
        let carried = err.response().expect("response");
        assert_eq!(carried.status(), 400);
        assert_eq!(carried.body().as_ref(), b"bad");

        assert!(Error::ArrayAccess.response().is_none());
    }

    #[test]
    fn error_decode_body() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct Failure {
            status: u16,
        }

        let err = Error::client_response(response(404, r#"{"status":404}"#));
        let decoded = err
            .decode_body::<Failure>()
            .expect("should have body")
            .expect("should decode");
        assert_eq!(decoded, Failure { status: 404 });

        assert!(Error::Timeout.decode_body::<Failure>().is_none());
    }
}
