//! Core types for the sift Elasticsearch client.
//!
//! This crate is transport-agnostic:
//! - [`ElasticResponse`] - validated response with cached decode modes
//! - [`Endpoint`], [`Params`] and [`endpoints`] - API descriptors and request building
//! - [`Document`] and [`Key`] - object view and keyed lookup of payloads
//! - [`Request`] and [`Response`] - raw HTTP exchange
//! - [`HttpClient`] - transport trait
//! - [`Error`] and [`Result`] - error handling

mod body;
mod client;
mod document;
mod elastic_response;
mod endpoint;
pub mod endpoints;
mod error;
mod method;
pub mod prelude;
mod request;
mod response;

pub use body::{ContentType, from_json, to_json, to_query_string};
pub use client::HttpClient;
pub use document::{Document, Fields, Key};
pub use elastic_response::{ElasticResponse, PRODUCT_HEADER, PRODUCT_NAME};
pub use endpoint::{BodyRule, COMMON_PARAMS, Endpoint, Params};
pub use error::{DecodeError, Error, Result};
pub use method::Method;
pub use request::{Request, RequestBuilder};
pub use response::Response;

pub use http::{HeaderMap, StatusCode, header};
