//! The outbound response channel and its capturing decorator.
//!
//! Handlers never build a response value and hand it back. They write to a
//! [`ResponseSink`]: set headers, set the status once, then stream body bytes.
//! The first status or body write commits the response; after that the
//! status line and headers are frozen.

use bytes::{Bytes, BytesMut};
use tracing::warn;

/// Anything a handler can write a response to.
pub trait ResponseSink: Send {
    /// Sets a header, replacing any earlier value. Ignored once committed.
    fn set_header(&mut self, name: &str, value: &str);

    /// Sets the status code and commits the response. Only the first call
    /// has an effect.
    fn write_status(&mut self, status: u16);

    /// Appends body bytes. Commits with `200` if no status was written.
    fn write(&mut self, chunk: &[u8]);
}

/// Decorates a sink to record what the client receives.
///
/// Every call is forwarded to the inner sink in the same call. The recorded
/// status starts at `200` and follows the same first-write-wins rule as the
/// sink it wraps, so [`status`](Self::status) always matches the status line
/// the client sees and [`body`](Self::body) mirrors the body bytes verbatim.
pub struct CaptureSink<'a> {
    inner: &'a mut dyn ResponseSink,
    status: u16,
    body: BytesMut,
    committed: bool,
}

impl<'a> CaptureSink<'a> {
    pub fn new(inner: &'a mut dyn ResponseSink) -> Self {
        Self { inner, status: 200, body: BytesMut::new(), committed: false }
    }

    pub fn status(&self) -> u16 { self.status }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Ends the capture, returning the recorded status and body.
    pub fn finish(self) -> (u16, Bytes) {
        (self.status, self.body.freeze())
    }
}

impl ResponseSink for CaptureSink<'_> {
    fn set_header(&mut self, name: &str, value: &str) {
        self.inner.set_header(name, value);
    }

    fn write_status(&mut self, status: u16) {
        if !self.committed {
            self.status = status;
            self.committed = true;
        }
        self.inner.write_status(status);
    }

    fn write(&mut self, chunk: &[u8]) {
        self.committed = true;
        self.body.extend_from_slice(chunk);
        self.inner.write(chunk);
    }
}

pub(crate) fn warn_committed(what: &str) {
    warn!(what, "response already committed, ignoring");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::Response;

    #[test]
    fn body_without_status_records_200() {
        let mut res = Response::new();
        let mut cap = CaptureSink::new(&mut res);
        cap.write(b"Hello");
        cap.write(b" World");
        assert_eq!(cap.status(), 200);
        assert_eq!(cap.body(), b"Hello World");
        drop(cap);
        assert_eq!(res.status_code(), 200);
        assert_eq!(res.body(), b"Hello World");
    }

    #[test]
    fn explicit_status_is_recorded_and_forwarded() {
        let mut res = Response::new();
        let mut cap = CaptureSink::new(&mut res);
        cap.write_status(418);
        cap.write(b"teapot");
        let (status, body) = cap.finish();
        assert_eq!(status, 418);
        assert_eq!(&body[..], b"teapot");
        assert_eq!(res.status_code(), 418);
    }

    #[test]
    fn status_after_body_is_not_recorded() {
        let mut res = Response::new();
        let mut cap = CaptureSink::new(&mut res);
        cap.write(b"partial");
        cap.write_status(500);
        assert_eq!(cap.status(), 200);
        drop(cap);
        assert_eq!(res.status_code(), 200);
    }

    #[test]
    fn no_writes_reports_default_status() {
        let mut res = Response::new();
        let cap = CaptureSink::new(&mut res);
        assert_eq!(cap.status(), 200);
        assert!(cap.body().is_empty());
    }
}
