//! Typed Elasticsearch client for Rust.
//!
//! Requests are built from declarative [`Endpoint`] descriptors, sent over a
//! pooled hyper/rustls transport with Tower middleware, and answered with an
//! [`ElasticResponse`]: a validated response whose payload is decoded lazily
//! and cached per mode.
//!
//! # Example
//!
//! ```no_run
//! use sift::prelude::*;
//!
//! # async fn run() -> sift::Result<()> {
//! let client = ElasticClient::builder()
//!     .host("localhost:9200")
//!     .basic_auth("elastic", "changeme")
//!     .retries(2)
//!     .build()?;
//!
//! let count = client
//!     .send(
//!         &endpoints::COUNT,
//!         Params::new()
//!             .path("index", "logs-*")
//!             .body(serde_json::json!({"query": {"term": {"level": "error"}}})),
//!     )
//!     .await?;
//! println!("{:?}", count.get("count")?);
//!
//! match client.send(&endpoints::GET, Params::new().path("index", "logs").path("id", "missing")).await {
//!     Err(e) if e.is_not_found() => println!("not found"),
//!     other => println!("{}", other?),
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod connector;
mod elastic_client;
pub mod middleware;
pub mod prelude;

pub use client::{BoxedService, HyperClient, HyperClientBuilder, ServiceFuture};
pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_USER_AGENT};
pub use elastic_client::{DEFAULT_HOST, ElasticClient, ElasticClientBuilder};

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use sift_core::{
    BodyRule, ContentType, DecodeError, Document, ElasticResponse, Endpoint, Error, Fields,
    HttpClient, Key, Method, Params, Request, RequestBuilder, Response, Result, endpoints,
    from_json, to_json, to_query_string,
};

// Re-export http types for status codes and headers
pub use sift_core::{HeaderMap, StatusCode, header};

pub use url;
