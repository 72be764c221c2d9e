//! Validated, lazily decoded Elasticsearch response.
//!
//! [`ElasticResponse`] receives a raw [`Response`] from the transport, checks
//! that it comes from Elasticsearch and classifies its status, then exposes
//! the payload through three decode modes:
//!
//! - [`ElasticResponse::as_array`]: keyed-array view ([`serde_json::Value`]),
//! - [`ElasticResponse::as_object`]: named-field view ([`Document`]),
//! - [`ElasticResponse::as_str`]: the raw body text.
//!
//! Each mode decodes at most once per assigned response and caches its
//! outcome, failures included.
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use http::{HeaderMap, HeaderValue};
//! use sift_core::{ElasticResponse, Response};
//!
//! let mut headers = HeaderMap::new();
//! headers.insert("x-elastic-product", HeaderValue::from_static("Elasticsearch"));
//! headers.insert("content-type", HeaderValue::from_static("application/json"));
//! let raw = Response::new(200, headers, Bytes::from(r#"{"count":7}"#));
//!
//! let response = ElasticResponse::from_response(raw, true).expect("valid response");
//! assert!(response.as_bool());
//! assert_eq!(response.get("count").expect("json"), Some(&serde_json::json!(7)));
//! assert_eq!(response.to_string(), r#"{"count":7}"#);
//! ```

use std::cell::OnceCell;
use std::fmt;

use bytes::Bytes;
use serde_json::Value;
use tracing::{debug, warn};

use crate::body::{decode_json, decode_ndjson};
use crate::error::DecodeError;
use crate::{ContentType, Document, Error, Key, Response, Result};

/// Header naming the product that served the response.
pub const PRODUCT_HEADER: &str = "x-elastic-product";

/// Expected value of [`PRODUCT_HEADER`].
pub const PRODUCT_NAME: &str = "Elasticsearch";

type Decoded<T> = std::result::Result<T, DecodeError>;

/// One slot per decode mode, reset on every new response.
#[derive(Debug, Default)]
struct DecodeCache {
    array: OnceCell<Decoded<Value>>,
    object: OnceCell<Decoded<Document>>,
    text: OnceCell<Decoded<String>>,
}

/// Response wrapper with product check, status classification and cached decoding.
///
/// Not `Sync`: a wrapper belongs to one request/response cycle.
#[derive(Debug, Default)]
pub struct ElasticResponse {
    response: Option<Response<Bytes>>,
    cache: DecodeCache,
}

impl ElasticResponse {
    /// Creates an empty wrapper.
    ///
    /// Until a response is assigned it behaves as an empty text body with no
    /// status: [`Self::as_bool`] is `false`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a wrapper and assigns `response`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::set_response`].
    pub fn from_response(response: Response<Bytes>, throw_on_error: bool) -> Result<Self> {
        let mut wrapper = Self::new();
        wrapper.set_response(response, throw_on_error)?;
        Ok(wrapper)
    }

    /// Assign a new response, replacing the previous one and its decode cache.
    ///
    /// The response is stored before validation, so it stays inspectable
    /// whatever the outcome.
    ///
    /// # Errors
    ///
    /// - [`Error::ProductCheck`] if the `X-Elastic-Product` header is missing
    ///   or is not `Elasticsearch`, regardless of `throw_on_error`.
    /// - [`Error::ClientResponse`] for a 4xx status when `throw_on_error`.
    /// - [`Error::ServerResponse`] for a 5xx status when `throw_on_error`.
    pub fn set_response(&mut self, response: Response<Bytes>, throw_on_error: bool) -> Result<()> {
        self.cache = DecodeCache::default();
        let response = self.response.insert(response);
        let status = response.status();
        debug!(
            status,
            content_type = response.content_type(),
            body_len = response.body().len(),
            "response assigned"
        );

        for warning in response.header_all(http::header::WARNING) {
            warn!(status, warning, "Elasticsearch returned a warning");
        }

        if !is_from_elasticsearch(response) {
            warn!(
                status,
                product = response.header(PRODUCT_HEADER),
                "product check failed"
            );
            return Err(Error::ProductCheck);
        }

        if response.is_client_error() {
            if throw_on_error {
                return Err(Error::client_response(response.clone()));
            }
            warn!(status, "client error recorded without raising");
        } else if response.is_server_error() {
            if throw_on_error {
                return Err(Error::server_response(response.clone()));
            }
            warn!(status, "server error recorded without raising");
        }

        Ok(())
    }

    /// The last assigned response.
    #[must_use]
    pub fn response(&self) -> Option<&Response<Bytes>> {
        self.response.as_ref()
    }

    /// Status of the last assigned response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.response.as_ref().map(Response::status)
    }

    /// `Content-Type` of the last assigned response.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.response.as_ref().and_then(Response::content_type)
    }

    /// `true` if the last assigned status was 2xx, even when an error was swallowed.
    #[must_use]
    pub fn as_bool(&self) -> bool {
        self.response.as_ref().is_some_and(Response::is_success)
    }

    /// Raw body bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.response
            .as_ref()
            .map(|response| response.body().as_ref())
            .unwrap_or_default()
    }

    /// Raw body text, exactly as received.
    ///
    /// # Errors
    ///
    /// [`Error::Decode`] if the body is not UTF-8.
    pub fn as_str(&self) -> Result<&str> {
        self.text().map_err(Error::Decode)
    }

    /// Keyed-array view of the body.
    ///
    /// JSON is decoded to a [`Value`], NDJSON to an array of values. Any other
    /// content type yields an array of one-character strings (legacy fallback,
    /// kept for compatibility).
    ///
    /// # Errors
    ///
    /// [`Error::Decode`] if the body does not parse. The failure is cached.
    pub fn as_array(&self) -> Result<&Value> {
        cached(&self.cache.array, || match self.negotiated() {
            ContentType::Json => decode_json(self.as_bytes()),
            ContentType::NdJson => decode_ndjson(self.as_bytes()).map(Value::Array),
            ContentType::PlainText => self.text().map(|text| {
                Value::Array(
                    text.chars()
                        .map(|c| Value::String(c.to_string()))
                        .collect(),
                )
            }),
        })
    }

    /// Named-field view of the body.
    ///
    /// Same negotiation as [`Self::as_array`], cached separately.
    ///
    /// # Errors
    ///
    /// [`Error::Decode`] if the body does not parse. The failure is cached.
    pub fn as_object(&self) -> Result<&Document> {
        cached(&self.cache.object, || match self.negotiated() {
            ContentType::Json => decode_json::<Value>(self.as_bytes()).map(Document::from),
            ContentType::NdJson => decode_ndjson::<Value>(self.as_bytes())
                .map(|values| Document::List(values.into_iter().map(Document::from).collect())),
            ContentType::PlainText => self.text().map(|text| {
                Document::List(text.chars().map(|c| Document::Text(c.to_string())).collect())
            }),
        })
    }

    /// Deserialize the body into a typed value.
    ///
    /// Not cached: each call decodes the body again.
    ///
    /// # Errors
    ///
    /// [`Error::Decode`] with the path to the failing field.
    pub fn deserialize<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        crate::from_json(self.as_bytes())
    }

    /// Entry of the keyed-array view.
    ///
    /// For a text body, `get(0_usize)` is the first character.
    ///
    /// # Errors
    ///
    /// [`Error::Decode`] if the body does not parse. A missing key is `Ok(None)`.
    pub fn get<'k>(&self, key: impl Into<Key<'k>>) -> Result<Option<&Value>> {
        Ok(key.into().lookup(self.as_array()?))
    }

    /// Named field of the object view.
    ///
    /// # Errors
    ///
    /// [`Error::Decode`] if the body does not parse. A missing field is `Ok(None)`.
    pub fn field(&self, name: &str) -> Result<Option<&Document>> {
        Ok(self.as_object()?.field(name))
    }

    /// `true` if the key exists in the keyed-array view.
    ///
    /// # Errors
    ///
    /// [`Error::Decode`] if the body does not parse.
    pub fn contains<'k>(&self, key: impl Into<Key<'k>>) -> Result<bool> {
        self.get(key).map(|entry| entry.is_some())
    }

    /// Always fails: the payload is a read-only view of server data.
    ///
    /// # Errors
    ///
    /// Always [`Error::ArrayAccess`].
    #[allow(clippy::unused_self, clippy::needless_pass_by_value)]
    pub fn insert<'k>(&mut self, key: impl Into<Key<'k>>, value: impl Into<Value>) -> Result<()> {
        let _ = (key, value);
        Err(Error::ArrayAccess)
    }

    /// Always fails: the payload is a read-only view of server data.
    ///
    /// # Errors
    ///
    /// Always [`Error::ArrayAccess`].
    #[allow(clippy::unused_self, clippy::needless_pass_by_value)]
    pub fn remove<'k>(&mut self, key: impl Into<Key<'k>>) -> Result<()> {
        let _ = key;
        Err(Error::ArrayAccess)
    }

    fn negotiated(&self) -> ContentType {
        ContentType::from_header(self.content_type())
    }

    fn text(&self) -> Decoded<&str> {
        self.cache
            .text
            .get_or_init(|| {
                String::from_utf8(self.as_bytes().to_vec())
                    .map_err(|e| DecodeError::new("", e.to_string()))
            })
            .as_deref()
            .map_err(Clone::clone)
    }
}

impl TryFrom<Response<Bytes>> for ElasticResponse {
    type Error = Error;

    fn try_from(response: Response<Bytes>) -> Result<Self> {
        Self::from_response(response, true)
    }
}

/// Writes the raw body, never a re-serialized form.
impl fmt::Display for ElasticResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.text() {
            Ok(text) => f.write_str(text),
            Err(_) => f.write_str(&String::from_utf8_lossy(self.as_bytes())),
        }
    }
}

fn cached<T>(slot: &OnceCell<Decoded<T>>, decode: impl FnOnce() -> Decoded<T>) -> Result<&T> {
    slot.get_or_init(decode)
        .as_ref()
        .map_err(|e| Error::Decode(e.clone()))
}

fn is_from_elasticsearch(response: &Response<Bytes>) -> bool {
    response
        .header_all(PRODUCT_HEADER)
        .any(|value| value.trim().eq_ignore_ascii_case(PRODUCT_NAME))
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use http::{HeaderMap, HeaderValue};
    use serde_json::json;

    use super::*;

    fn raw(status: u16, content_type: &'static str, body: &'static str) -> Response<Bytes> {
        let mut headers = HeaderMap::new();
        headers.insert(PRODUCT_HEADER, HeaderValue::from_static(PRODUCT_NAME));
        headers.insert("content-type", HeaderValue::from_static(content_type));
        Response::new(status, headers, Bytes::from_static(body.as_bytes()))
    }

    fn json_ok(body: &'static str) -> ElasticResponse {
        ElasticResponse::from_response(raw(200, "application/json", body), true)
            .expect("valid response")
    }

    #[test]
    fn as_array_decodes_json() {
        let response = json_ok(r#"{"foo":"bar"}"#);
        check!(response.as_array().expect("json") == &json!({"foo": "bar"}));
    }

    #[test]
    fn as_array_is_cached() {
        let response = json_ok(r#"{"foo":"bar"}"#);
        let first = response.as_array().expect("json");
        let second = response.as_array().expect("json");
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn as_object_exposes_fields() {
        let response = json_ok(r#"{"foo":"bar"}"#);
        let object = response.as_object().expect("json");
        check!(object.field("foo").and_then(Document::as_str) == Some("bar"));
        check!(response.field("foo").expect("json").and_then(Document::as_str) == Some("bar"));
        assert!(std::ptr::eq(object, response.as_object().expect("json")));
    }

    #[test]
    fn as_str_and_display_are_the_raw_body() {
        let body = r#"{ "foo" :  "bar" }"#;
        let response = json_ok(body);
        check!(response.as_str().expect("utf8") == body);
        check!(response.to_string() == body);
    }

    #[test]
    fn as_bool_true_on_success() {
        check!(json_ok("{}").as_bool());
        check!(!ElasticResponse::new().as_bool());
    }

    #[test]
    fn client_error_raises_by_default() {
        let mut response = ElasticResponse::new();
        let result = response.set_response(raw(400, "application/json", r#"{"error":"bad"}"#), true);

        let_assert!(Err(Error::ClientResponse { status, response: carried, .. }) = result);
        check!(status == 400);
        check!(carried.body().as_ref() == br#"{"error":"bad"}"#);
        check!(!response.as_bool());
        check!(response.status() == Some(400));
    }

    #[test]
    fn client_error_swallowed_when_not_throwing() {
        let mut response = ElasticResponse::new();
        response
            .set_response(raw(404, "application/json", r#"{"found":false}"#), false)
            .expect("swallowed");

        check!(!response.as_bool());
        check!(response.get("found").expect("json") == Some(&json!(false)));
    }

    #[test]
    fn server_error_raises_by_default() {
        let result = ElasticResponse::from_response(raw(500, "application/json", "{}"), true);
        let_assert!(Err(err) = result);
        check!(err.is_server_error());
        check!(err.status() == Some(500));
    }

    #[test]
    fn server_error_swallowed_when_not_throwing() {
        let response = ElasticResponse::from_response(raw(503, "application/json", "{}"), false)
            .expect("swallowed");
        check!(!response.as_bool());
    }

    #[test]
    fn product_check_is_unconditional() {
        for throw_on_error in [true, false] {
            let mut headers = HeaderMap::new();
            headers.insert("content-type", HeaderValue::from_static("application/json"));
            let missing = Response::new(200, headers.clone(), Bytes::from_static(b"{}"));

            let mut response = ElasticResponse::new();
            let_assert!(Err(Error::ProductCheck) = response.set_response(missing, throw_on_error));
            check!(response.as_bool(), "response stays inspectable");

            headers.insert(PRODUCT_HEADER, HeaderValue::from_static("OpenSearch"));
            let wrong = Response::new(200, headers, Bytes::from_static(b"{}"));
            let_assert!(Err(Error::ProductCheck) = response.set_response(wrong, throw_on_error));
        }
    }

    #[test]
    fn product_check_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert(PRODUCT_HEADER, HeaderValue::from_static("elasticsearch"));
        let response = Response::new(200, headers, Bytes::new());
        assert!(ElasticResponse::from_response(response, true).is_ok());
    }

    #[test]
    fn indexed_access() {
        let response = json_ok(r#"{"foo":"bar","list":[1,2]}"#);
        check!(response.get("foo").expect("json") == Some(&json!("bar")));
        check!(response.get("missing").expect("json").is_none());
        check!(response.contains("foo").expect("json"));
        check!(!response.contains("missing").expect("json"));
    }

    #[test]
    fn mutation_is_rejected() {
        let mut response = json_ok(r#"{"foo":"bar"}"#);
        let_assert!(Err(Error::ArrayAccess) = response.insert("foo", "x"));
        let_assert!(Err(Error::ArrayAccess) = response.remove("foo"));
        check!(response.get("foo").expect("json") == Some(&json!("bar")));
    }

    #[test]
    fn text_plain_falls_back_to_characters() {
        let response =
            ElasticResponse::from_response(raw(200, "text/plain", "hello"), true).expect("valid");
        check!(response.get(0_usize).expect("text") == Some(&json!("h")));
        check!(response.get(4_usize).expect("text") == Some(&json!("o")));
        check!(response.get(5_usize).expect("text").is_none());
        check!(response.as_str().expect("utf8") == "hello");
        check!(response.to_string() == "hello");
        check!(response.as_object().expect("text").at(1).and_then(Document::as_str) == Some("e"));
    }

    #[test]
    fn invalid_json_is_a_cached_decode_error() {
        let response = json_ok("{not json");
        let_assert!(Err(Error::Decode(first)) = response.as_array());
        let_assert!(Err(Error::Decode(second)) = response.as_array());
        check!(first == second);
        check!(response.as_str().expect("utf8") == "{not json");
    }

    #[test]
    fn ndjson_decodes_to_a_list() {
        let response = ElasticResponse::from_response(
            raw(200, "application/x-ndjson", "{\"a\":1}\n{\"b\":2}\n"),
            true,
        )
        .expect("valid");
        check!(response.as_array().expect("ndjson") == &json!([{"a": 1}, {"b": 2}]));
        check!(response.as_object().expect("ndjson").pointer("1.b").and_then(Document::as_i64) == Some(2));
    }

    #[test]
    fn vendor_json_content_type() {
        let response = ElasticResponse::from_response(
            raw(
                200,
                "application/vnd.elasticsearch+json; compatible-with=8",
                r#"{"acknowledged":true}"#,
            ),
            true,
        )
        .expect("valid");
        check!(response.get("acknowledged").expect("json") == Some(&json!(true)));
    }

    #[test]
    fn reassignment_clears_cache() {
        let mut response = json_ok(r#"{"foo":"bar"}"#);
        check!(response.get("foo").expect("json") == Some(&json!("bar")));

        response
            .set_response(raw(200, "application/json", r#"{"foo":"baz"}"#), true)
            .expect("valid");
        check!(response.get("foo").expect("json") == Some(&json!("baz")));
        check!(response.as_str().expect("utf8") == r#"{"foo":"baz"}"#);
    }

    #[test]
    fn empty_wrapper() {
        let response = ElasticResponse::new();
        check!(response.as_str().expect("utf8") == "");
        check!(response.as_array().expect("empty") == &json!([]));
        check!(response.status().is_none());
        check!(response.to_string() == "");
    }

    #[test]
    fn deserialize_typed() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct Count {
            count: u64,
        }

        let response = json_ok(r#"{"count":12,"_shards":{}}"#);
        check!(response.deserialize::<Count>().expect("typed") == Count { count: 12 });
    }

    #[test]
    fn try_from_throws_on_error() {
        let result = ElasticResponse::try_from(raw(404, "application/json", "{}"));
        let_assert!(Err(err) = result);
        check!(err.is_not_found());
    }
}
