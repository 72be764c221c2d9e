//! Prelude module for convenient imports.
//!
//! ```
//! use sift::prelude::*;
//! ```

pub use crate::{
    ClientConfig, Document, ElasticClient, ElasticResponse, Endpoint, Error, HttpClient,
    HyperClient, Key, Method, Params, Request, Response, Result, StatusCode, endpoints,
};
pub use serde::{Deserialize, Serialize};
