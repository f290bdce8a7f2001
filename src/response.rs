//! The concrete [`ResponseSink`] every request is served through.
//!
//! A [`Response`] buffers what handlers write and is turned into a hyper
//! response once the handler chain returns. Handlers only ever see it as
//! `&mut dyn ResponseSink`.

use bytes::{Bytes, BytesMut};
use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::StatusCode;
use http_body_util::Full;
use tracing::warn;

use crate::sink::{warn_committed, ResponseSink};

// ── ContentType ───────────────────────────────────────────────────────────────

/// Content-type values used by the built-in handlers.
pub enum ContentType {
    Json,  // application/json
    Text,  // text/plain; charset=utf-8
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Text => "text/plain; charset=utf-8",
        }
    }
}

// ── Response ─────────────────────────────────────────────────────────────────

/// A buffered outgoing response.
#[derive(Debug, Default)]
pub struct Response {
    status: Option<u16>,
    headers: HeaderMap,
    body: BytesMut,
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    /// The status that will be sent: the written one, else `200`.
    pub fn status_code(&self) -> u16 {
        self.status.unwrap_or(200)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    fn is_committed(&self) -> bool {
        self.status.is_some()
    }

    pub(crate) fn into_http(self) -> http::Response<Full<Bytes>> {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or_else(|_| {
            warn!(status = self.status_code(), "invalid status code, sending 500");
            StatusCode::INTERNAL_SERVER_ERROR
        });
        let mut res = http::Response::new(Full::new(self.body.freeze()));
        *res.status_mut() = status;
        *res.headers_mut() = self.headers;
        res
    }
}

impl ResponseSink for Response {
    fn set_header(&mut self, name: &str, value: &str) {
        if self.is_committed() {
            return warn_committed("header");
        }
        match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => warn!(name, "invalid header, dropping"),
        }
    }

    fn write_status(&mut self, status: u16) {
        if self.is_committed() {
            return warn_committed("status");
        }
        self.status = Some(status);
    }

    fn write(&mut self, chunk: &[u8]) {
        if !self.is_committed() {
            self.status = Some(200);
        }
        self.body.extend_from_slice(chunk);
    }
}
