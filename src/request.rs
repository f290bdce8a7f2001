//! Incoming HTTP request type.
//!
//! The body arrives as a single-pass stream. [`Request::bytes`] drains it
//! once into a [`Bytes`] buffer; from then on every call hands out another
//! clone of that buffer, each an independent cursor over the same bytes.

use std::collections::HashMap;

use bytes::Bytes;
use http::{HeaderMap, Method};
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::BodyExt;

use crate::api_error::BoxError;
use crate::error::Error;

enum Body {
    Buffered(Bytes),
    Streaming(UnsyncBoxBody<Bytes, BoxError>),
}

/// An incoming HTTP request.
pub struct Request {
    method: Method,
    path: String,
    headers: HeaderMap,
    body: Body,
    pub(crate) params: HashMap<String, String>,
    pub(crate) correlation_id: Option<String>,
}

impl Request {
    /// Builds a request whose body is already in memory.
    pub fn new(method: Method, path: impl Into<String>, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            method,
            path: path.into(),
            headers,
            body: Body::Buffered(body.into()),
            params: HashMap::new(),
            correlation_id: None,
        }
    }

    /// Wraps a hyper request; the body is not read until asked for.
    pub fn from_http<B>(req: http::Request<B>) -> Self
    where
        B: hyper::body::Body<Data = Bytes> + Send + 'static,
        B::Error: Into<BoxError>,
    {
        let (parts, body) = req.into_parts();
        // Request-target as sent, query string included.
        let path = parts
            .uri
            .path_and_query()
            .map_or_else(|| parts.uri.path().to_owned(), |pq| pq.as_str().to_owned());
        Self {
            method: parts.method,
            path,
            headers: parts.headers,
            body: Body::Streaming(body.map_err(|e| -> BoxError { e.into() }).boxed_unsync()),
            params: HashMap::new(),
            correlation_id: None,
        }
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn headers(&self) -> &HeaderMap { &self.headers }

    /// The request target, query string included.
    pub fn path(&self) -> &str { &self.path }

    /// The path without its query string.
    pub fn route_path(&self) -> &str {
        self.path.split_once('?').map_or(self.path.as_str(), |(path, _)| path)
    }

    /// The raw query string, if any.
    pub fn query(&self) -> Option<&str> {
        self.path.split_once('?').map(|(_, query)| query)
    }

    /// Case-insensitive header lookup. Non-UTF-8 values read as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// The id [`LogRequests`](crate::middleware::LogRequests) assigned to
    /// this request, if it passed through that middleware.
    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    /// Reads the whole body, buffering it on first use.
    ///
    /// On a read error the stream is gone; the body is left empty so later
    /// reads agree with each other.
    pub async fn bytes(&mut self) -> Result<Bytes, Error> {
        let stream = match std::mem::replace(&mut self.body, Body::Buffered(Bytes::new())) {
            Body::Buffered(bytes) => {
                self.body = Body::Buffered(bytes.clone());
                return Ok(bytes);
            }
            Body::Streaming(stream) => stream,
        };
        let bytes = stream.collect().await.map_err(Error::Body)?.to_bytes();
        self.body = Body::Buffered(bytes.clone());
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::Full;

    use super::*;
    use crate::test_support::Reset;

    #[tokio::test]
    async fn buffered_body_reads_repeatedly() {
        let mut req = Request::new(Method::POST, "/x", HeaderMap::new(), "payload");
        assert_eq!(req.bytes().await.unwrap(), "payload");
        assert_eq!(req.bytes().await.unwrap(), "payload");
    }

    #[tokio::test]
    async fn streaming_body_is_drained_once_and_kept() {
        let http = http::Request::post("/items?sort=name:asc")
            .header("X-Key", "secret")
            .body(Full::new(Bytes::from_static(b"{\"a\":1}")))
            .unwrap();
        let mut req = Request::from_http(http);
        assert_eq!(req.path(), "/items?sort=name:asc");
        assert_eq!(req.route_path(), "/items");
        assert_eq!(req.query(), Some("sort=name:asc"));
        assert_eq!(req.header("x-key"), Some("secret"));
        assert_eq!(req.bytes().await.unwrap(), "{\"a\":1}");
        assert_eq!(req.bytes().await.unwrap(), "{\"a\":1}");
    }

    #[tokio::test]
    async fn read_error_leaves_empty_body() {
        let mut req = Request::from_http(http::Request::post("/").body(Reset).unwrap());
        assert!(req.bytes().await.is_err());
        assert!(req.bytes().await.unwrap().is_empty());
    }
}
