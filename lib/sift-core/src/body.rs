//! Body serialization utilities and content negotiation.

use bytes::Bytes;

use crate::Result;
use crate::error::DecodeError;

/// Media types understood by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// JSON (`application/json` or `application/vnd.elasticsearch+json`).
    Json,
    /// Newline-delimited JSON (`application/x-ndjson` or the vendor variant).
    NdJson,
    /// Anything else, handled as text.
    PlainText,
}

impl ContentType {
    /// Get the MIME type string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::NdJson => "application/x-ndjson",
            Self::PlainText => "text/plain",
        }
    }

    /// Classify a `Content-Type` header value.
    ///
    /// Parameters (`charset`, `compatible-with`) are ignored and the
    /// comparison is case-insensitive. A missing header is text.
    #[must_use]
    pub fn from_header(value: Option<&str>) -> Self {
        let Some(value) = value else {
            return Self::PlainText;
        };
        let essence = value.split(';').next().unwrap_or_default().trim();

        if essence.eq_ignore_ascii_case("application/json")
            || essence.eq_ignore_ascii_case("application/vnd.elasticsearch+json")
        {
            Self::Json
        } else if essence.eq_ignore_ascii_case("application/x-ndjson")
            || essence.eq_ignore_ascii_case("application/vnd.elasticsearch+x-ndjson")
        {
            Self::NdJson
        } else {
            Self::PlainText
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Serialize a value to JSON bytes.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Example
///
/// ```
/// use sift_core::to_json;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Query { size: u32 }
///
/// let bytes = to_json(&Query { size: 10 }).expect("serialize");
/// assert_eq!(bytes.as_ref(), br#"{"size":10}"#);
/// ```
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(Into::into)
}

/// Serialize a value to a query string.
///
/// Uses `serde_html_form` which supports `Vec<T>` for repeated query parameters.
///
/// # Errors
///
/// Returns an error if query serialization fails.
///
/// # Example
///
/// ```
/// use sift_core::to_query_string;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Health {
///     wait_for_status: String,
///     #[serde(skip_serializing_if = "Option::is_none")]
///     timeout: Option<String>,
/// }
///
/// let health = Health { wait_for_status: "yellow".to_string(), timeout: None };
/// let query = to_query_string(&health).expect("serialize");
/// assert_eq!(query, "wait_for_status=yellow");
/// ```
pub fn to_query_string<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_html_form::to_string(value).map_err(Into::into)
}

/// Deserialize JSON bytes to a value with path-aware error messages.
///
/// # Errors
///
/// Returns [`crate::Error::Decode`] with the path to the problematic field
/// (e.g. `hits.total.value`).
///
/// # Example
///
/// ```
/// use sift_core::from_json;
/// use serde::Deserialize;
///
/// #[derive(Debug, PartialEq, Deserialize)]
/// struct Count { count: u64 }
///
/// let count: Count = from_json(br#"{"count":3}"#).expect("deserialize");
/// assert_eq!(count, Count { count: 3 });
/// ```
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    decode_json(bytes).map_err(Into::into)
}

/// [`from_json`] returning the cloneable [`DecodeError`].
pub(crate) fn decode_json<T: serde::de::DeserializeOwned>(
    bytes: &[u8],
) -> std::result::Result<T, DecodeError> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    let value = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|e| DecodeError::new(e.path().to_string(), e.inner().to_string()))?;
    deserializer
        .end()
        .map_err(|e| DecodeError::new("", e.to_string()))?;
    Ok(value)
}

/// Decode newline-delimited JSON, one value per non-blank line.
///
/// Errors report the failing line as `line <n>` in the path.
pub(crate) fn decode_ndjson<T: serde::de::DeserializeOwned>(
    bytes: &[u8],
) -> std::result::Result<Vec<T>, DecodeError> {
    bytes
        .split(|b| *b == b'\n')
        .enumerate()
        .filter(|(_, line)| !line.trim_ascii().is_empty())
        .map(|(number, line)| {
            decode_json(line).map_err(|e| {
                let path = if e.path.is_empty() || e.path == "." {
                    format!("line {}", number + 1)
                } else {
                    format!("line {}: {}", number + 1, e.path)
                };
                DecodeError::new(path, e.message)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    #[test]
    fn content_type_as_str() {
        assert_eq!(ContentType::Json.as_str(), "application/json");
        assert_eq!(ContentType::NdJson.as_str(), "application/x-ndjson");
        assert_eq!(ContentType::PlainText.as_str(), "text/plain");
        assert_eq!(ContentType::Json.to_string(), "application/json");
    }

    #[test]
    fn content_type_from_header() {
        assert_eq!(
            ContentType::from_header(Some("application/json")),
            ContentType::Json
        );
        assert_eq!(
            ContentType::from_header(Some("Application/JSON; charset=UTF-8")),
            ContentType::Json
        );
        assert_eq!(
            ContentType::from_header(Some(
                "application/vnd.elasticsearch+json; compatible-with=8"
            )),
            ContentType::Json
        );
        assert_eq!(
            ContentType::from_header(Some("application/x-ndjson")),
            ContentType::NdJson
        );
        assert_eq!(
            ContentType::from_header(Some("text/plain; charset=UTF-8")),
            ContentType::PlainText
        );
        assert_eq!(ContentType::from_header(None), ContentType::PlainText);
    }

    #[test]
    fn to_json_serialize() {
        let bytes = to_json(&json!({"query": {"match_all": {}}})).expect("serialize");
        assert_eq!(bytes.as_ref(), br#"{"query":{"match_all":{}}}"#);
    }

    #[test]
    fn to_query_string_with_vec() {
        #[derive(serde::Serialize)]
        struct Filter {
            metric: Vec<String>,
        }

        let filter = Filter {
            metric: vec!["nodes".to_string(), "routing_table".to_string()],
        };

        let query = to_query_string(&filter).expect("serialize");
        assert_eq!(query, "metric=nodes&metric=routing_table");
    }

    #[test]
    fn from_json_missing_field_error_with_path() {
        #[derive(Debug, serde::Deserialize)]
        struct Total {
            #[allow(dead_code)]
            value: u64,
        }

        #[derive(Debug, serde::Deserialize)]
        struct Hits {
            #[allow(dead_code)]
            total: Total,
        }

        let result: Result<Hits> = from_json(br#"{"total":{}}"#);

        let msg = result.expect_err("should fail").to_string();
        assert!(msg.contains("total"), "Expected path 'total' in error: {msg}");
        assert!(msg.contains("value"), "Expected field 'value' in error: {msg}");
    }

    #[test]
    fn from_json_syntax_error() {
        let result: Result<Value> = from_json(b"not json");
        assert!(result.is_err());
    }

    #[test]
    fn decode_ndjson_lines() {
        let body = b"{\"index\":{\"_id\":\"1\"}}\n{\"field\":\"value\"}\n\n";
        let values: Vec<Value> = decode_ndjson(body).expect("ndjson");
        assert_eq!(
            values,
            vec![json!({"index": {"_id": "1"}}), json!({"field": "value"})]
        );
    }

    #[test]
    fn decode_ndjson_reports_line() {
        let body = b"{\"ok\":true}\n{oops\n";
        let err = decode_ndjson::<Value>(body).expect_err("should fail");
        assert!(err.path.starts_with("line 2"), "unexpected path: {}", err.path);
    }
}
