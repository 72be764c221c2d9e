//! Prelude module for convenient imports.
//!
//! ```
//! use sift_core::prelude::*;
//! ```

pub use crate::{
    BodyRule, ContentType, Document, ElasticResponse, Endpoint, Error, HttpClient, Key, Method,
    Params, Request, RequestBuilder, Response, Result, from_json, to_json,
};
