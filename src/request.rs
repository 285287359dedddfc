//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use http::Extensions;
use serde::de::DeserializeOwned;

/// An incoming HTTP request with its body fully buffered.
///
/// Handlers read it through typed views: path parameters, the query string
/// deserialized into a struct, the body as JSON, and shared router state.
pub struct Request {
    query: Option<String>,
    body: Bytes,
    params: HashMap<String, String>,
    extensions: Extensions,
}

impl Request {
    pub(crate) fn new(
        parts: http::request::Parts,
        body: Bytes,
        params: HashMap<String, String>,
    ) -> Self {
        Self {
            query: parts.uri.query().map(str::to_owned),
            body,
            params,
            extensions: parts.extensions,
        }
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/posts/{post_id}`, `req.param("post_id")` on `/posts/42`
    /// returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Deserializes the query string (`application/x-www-form-urlencoded`)
    /// into `T`. A missing query string reads as an empty one.
    pub fn query<T: DeserializeOwned>(&self) -> Result<T, serde_urlencoded::de::Error> {
        serde_urlencoded::from_str(self.query.as_deref().unwrap_or_default())
    }

    /// Deserializes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Shared state attached with [`Router::with_state`](crate::Router::with_state).
    pub fn state<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions.get::<T>()
    }
}
