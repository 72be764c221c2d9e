//! Declarative endpoint descriptors and the generic request builder.
//!
//! Every Elasticsearch API is described by an [`Endpoint`]: its name, verb,
//! path templates, body rule and accepted query parameters. A single
//! function, [`Endpoint::request`], turns a descriptor plus caller
//! [`Params`] into a [`Request`].
//!
//! # Example
//!
//! ```
//! use sift_core::{Method, Params, endpoints};
//!
//! let base = url::Url::parse("http://localhost:9200").unwrap();
//! let request = endpoints::COUNT
//!     .request(&base, Params::new().path("index", "logs-*").query("q", "level:error"))
//!     .unwrap();
//!
//! assert_eq!(request.method(), Method::Get);
//! assert_eq!(request.url().as_str(), "http://localhost:9200/logs-*/_count?q=level%3Aerror");
//! ```

use std::collections::BTreeMap;

use bytes::Bytes;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde_json::Value;
use url::Url;

use crate::{Error, Method, Request, Result};

/// Query parameters accepted by every endpoint.
pub const COMMON_PARAMS: &[&str] = &["pretty", "human", "error_trace", "source", "filter_path"];

/// Encodes everything but unreserved characters and sub-delimiters in a path segment.
const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'\\')
    .add(b'%');

/// Whether an endpoint takes a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyRule {
    /// No body.
    None,
    /// Body allowed, verb unchanged.
    Optional,
    /// Body allowed; when present the request uses this verb instead.
    OptionalSwitch(Method),
    /// Body required.
    Required,
}

/// Descriptor of one Elasticsearch API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    /// API name, e.g. `cluster.health`.
    pub name: &'static str,
    /// HTTP verb.
    pub method: Method,
    /// Path templates, most specific first, e.g. `["/{index}/_count", "/_count"]`.
    pub paths: &'static [&'static str],
    /// Endpoint-specific query parameters.
    pub params: &'static [&'static str],
    /// Body rule.
    pub body: BodyRule,
}

impl Endpoint {
    /// Descriptor without query parameters nor body.
    #[must_use]
    pub const fn new(name: &'static str, method: Method, paths: &'static [&'static str]) -> Self {
        Self {
            name,
            method,
            paths,
            params: &[],
            body: BodyRule::None,
        }
    }

    /// Set the accepted query parameters.
    #[must_use]
    pub const fn with_params(mut self, params: &'static [&'static str]) -> Self {
        self.params = params;
        self
    }

    /// Set the body rule.
    #[must_use]
    pub const fn with_body(mut self, body: BodyRule) -> Self {
        self.body = body;
        self
    }

    /// `true` if `name` is an accepted query parameter.
    #[must_use]
    pub fn accepts(&self, name: &str) -> bool {
        self.params.contains(&name) || COMMON_PARAMS.contains(&name)
    }

    /// Names of every path parameter used by a template.
    pub fn path_params(&self) -> impl Iterator<Item = &'static str> {
        let mut seen = Vec::new();
        self.paths
            .iter()
            .copied()
            .flat_map(placeholders)
            .filter(move |name| {
                if seen.contains(name) {
                    false
                } else {
                    seen.push(*name);
                    true
                }
            })
    }

    /// Verb for a request with or without a body.
    #[must_use]
    pub const fn method_for(&self, has_body: bool) -> Method {
        match self.body {
            BodyRule::OptionalSwitch(method) if has_body => method,
            _ => self.method,
        }
    }

    /// Pick the most specific template whose parameters are all provided and fill it.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingParameter`] naming the parameters of the least specific
    ///   template when none can be satisfied.
    /// - [`Error::InvalidRequest`] for an empty, `.` or `..` segment value.
    pub fn resolve_path(&self, params: &Params) -> Result<String> {
        let template = self
            .paths
            .iter()
            .copied()
            .find(|template| placeholders(template).all(|name| params.path.contains_key(name)))
            .ok_or_else(|| {
                let last = self.paths.last().copied().unwrap_or_default();
                Error::missing_parameter(
                    self.name,
                    placeholders(last).filter(|name| !params.path.contains_key(*name)),
                )
            })?;

        let mut path = template.to_string();
        for name in placeholders(template) {
            if let Some(value) = params.path.get(name) {
                // URL normalization would drop these segments and reroute the call
                if matches!(value.as_str(), "" | "." | "..") {
                    return Err(Error::invalid_request(format!(
                        "'{}' cannot use '{value}' as {name}",
                        self.name
                    )));
                }
                let encoded = utf8_percent_encode(value, PATH_SEGMENT_ENCODE_SET).to_string();
                path = path.replace(&format!("{{{name}}}"), &encoded);
            }
        }
        Ok(path)
    }

    /// Build the HTTP request for this endpoint.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingParameter`] for a missing path parameter or required body.
    /// - [`Error::UnexpectedParameter`] for a query or path parameter the endpoint
    ///   does not know.
    /// - [`Error::InvalidRequest`] for a body on an endpoint without one.
    pub fn request(&self, base_url: &Url, params: Params) -> Result<Request<Bytes>> {
        if let Some(name) = params.path.keys().find(|name| {
            !self.path_params().any(|known| known == name.as_str())
        }) {
            return Err(Error::unexpected_parameter(self.name, name.as_str()));
        }
        if let Some((name, _)) = params.query.iter().find(|(name, _)| !self.accepts(name)) {
            return Err(Error::unexpected_parameter(self.name, name.as_str()));
        }
        match (self.body, params.body.is_some()) {
            (BodyRule::None, true) => {
                return Err(Error::invalid_request(format!(
                    "'{}' does not accept a request body",
                    self.name
                )));
            }
            (BodyRule::Required, false) => {
                return Err(Error::missing_parameter(self.name, ["body"]));
            }
            _ => {}
        }

        let path = self.resolve_path(&params)?;
        let mut url = base_url.clone();
        url.set_path(&format!("{}{path}", base_url.path().trim_end_matches('/')));
        url.set_query(None);

        let method = self.method_for(params.body.is_some());
        let builder = Request::builder(method, url)
            .header("Accept", "application/json")
            .query_pairs(params.query);

        match params.body {
            Some(body) => Ok(builder.json(&body)?.build()),
            None => Ok(builder.build()),
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Names between braces in a path template.
fn placeholders(template: &str) -> impl Iterator<Item = &str> {
    template
        .split('{')
        .skip(1)
        .filter_map(|rest| rest.split_once('}').map(|(name, _)| name))
}

// ============================================================================
// Params
// ============================================================================

/// Caller-supplied parameters for an endpoint call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    path: BTreeMap<String, String>,
    query: Vec<(String, String)>,
    body: Option<Value>,
}

impl Params {
    /// Empty parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a path parameter (e.g. `index`, `id`).
    #[must_use]
    pub fn path(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.path.insert(name.into(), value.to_string());
        self
    }

    /// Append a query parameter.
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    /// Append every field of a serializable struct as query parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be serialized as a query string.
    pub fn query_from<T: serde::Serialize>(mut self, value: &T) -> Result<Self> {
        let encoded = crate::to_query_string(value)?;
        self.query.extend(url::form_urlencoded::parse(encoded.as_bytes()).into_owned());
        Ok(self)
    }

    /// Set the JSON body.
    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Set the JSON body from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn json<T: serde::Serialize>(self, body: &T) -> Result<Self> {
        Ok(self.body(serde_json::to_value(body)?))
    }

    /// Query parameters, in insertion order.
    #[must_use]
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }
}
