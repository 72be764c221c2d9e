//! Tower middleware layers for the Elasticsearch transport.
//!
//! Layers wrap [`crate::HyperClient`]'s inner service. The last layer added
//! is the first to process requests.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `middleware-retry` | `.with_retry()` helper (default) |
//! | `middleware-basic-auth` | `.with_basic_auth()` helper (default) |
//!
//! # Available Layers
//!
//! - [`ApiKeyLayer`] - Adds `Authorization: ApiKey <key>` header
//! - [`BasicAuthLayer`] - Adds `Authorization: Basic <base64>` header
//! - [`LoggingLayer`] - Logs requests/responses using `tracing`
//! - [`RetryPolicy`] - Transient-failure policy for [`RetryLayer`]
//! - [`ConcurrencyLimitLayer`] - Limits concurrent requests
//!
//! # Example
//!
//! ```
//! use sift::HyperClient;
//! use sift::middleware::{ApiKeyLayer, LoggingLayer};
//!
//! let client = HyperClient::builder()
//!     .layer(ApiKeyLayer::new("my-api-key"))
//!     .layer(LoggingLayer::new())
//!     .build();
//! ```

mod api_key;
#[cfg(feature = "middleware-basic-auth")]
mod basic_auth;
mod logging;
mod retry;

pub use api_key::{ApiKey, ApiKeyLayer};
#[cfg(feature = "middleware-basic-auth")]
pub use basic_auth::{BasicAuth, BasicAuthLayer};
pub use logging::{LogLevel, Logging, LoggingLayer};
pub use retry::{RETRY_STATUSES, RetryPolicy};

pub use tower::limit::ConcurrencyLimitLayer;
pub use tower::retry::RetryLayer;
pub use tower::{Layer, ServiceBuilder};
