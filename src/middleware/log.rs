//! Request/response logging with a per-request correlation id.

use std::sync::Arc;

use bytes::Bytes;
use http::Method;
use tracing::{info, warn};
use uuid::Uuid;

use crate::handler::{BoxFuture, BoxedHandler, ErasedHandler};
use crate::middleware::Middleware;
use crate::request::Request;
use crate::sink::{CaptureSink, ResponseSink};

/// Logs every request before dispatch and every response after it.
///
/// Each request gets a fresh UUID v4 as its correlation id. The body is
/// buffered in full before the request line is logged, and downstream
/// handlers read the same bytes again through [`Request::bytes`]. A body
/// that fails to read is logged, and passed on, as empty. The response is
/// observed through a [`CaptureSink`], so the response line shows exactly
/// the status and body the client received, error envelopes included.
pub struct LogRequests;

impl Middleware for LogRequests {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        Arc::new(LogRequestsHandler { next })
    }
}

struct LogRequestsHandler {
    next: BoxedHandler,
}

/// What one request is logged as. Lives for that request only.
struct Correlation {
    uid: String,
    method: Method,
    path: String,
    body: Bytes,
}

impl Correlation {
    async fn capture(req: &mut Request) -> Self {
        let uid = Uuid::new_v4().to_string();
        let body = req.bytes().await.unwrap_or_else(|err| {
            warn!(uid = %uid, %err, "request body unreadable, treating as empty");
            Bytes::new()
        });
        Self { uid, method: req.method().clone(), path: req.path().to_owned(), body }
    }

    fn log_request(&self) {
        info!(
            uid = %self.uid,
            method = %self.method,
            path = %self.path,
            body = %String::from_utf8_lossy(&self.body),
            "HTTP request"
        );
    }

    fn log_response(&self, status: u16, body: &[u8]) {
        info!(
            uid = %self.uid,
            status,
            body = %String::from_utf8_lossy(body),
            "HTTP response"
        );
    }
}

impl ErasedHandler for LogRequestsHandler {
    fn call<'a>(&'a self, mut req: Request, res: &'a mut dyn ResponseSink) -> BoxFuture<'a> {
        Box::pin(async move {
            let correlation = Correlation::capture(&mut req).await;
            correlation.log_request();
            req.correlation_id = Some(correlation.uid.clone());

            let mut capture = CaptureSink::new(res);
            self.next.call(req, &mut capture).await;
            correlation.log_response(capture.status(), capture.body());
        })
    }
}
