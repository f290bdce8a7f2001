//! Shared-key authorization.

use std::sync::Arc;

use tracing::warn;

use crate::api_error::DomainError;
use crate::dispatch::handle_error;
use crate::handler::{BoxFuture, BoxedHandler, ErasedHandler};
use crate::middleware::Middleware;
use crate::request::Request;
use crate::settings::AuthorizationSettings;
use crate::sink::ResponseSink;

/// Gates every request behind a header/key comparison.
///
/// When disabled, requests pass straight through. When enabled, the value of
/// the configured header must equal the configured key byte for byte; a
/// missing header compares as the empty string. A mismatch is answered with
/// `401 auth.unauthorized` and the wrapped handler never runs.
///
/// The comparison is a plain equality check against a single key.
pub struct Authorize {
    settings: Arc<AuthorizationSettings>,
}

impl Authorize {
    pub fn new(settings: AuthorizationSettings) -> Self {
        Self { settings: Arc::new(settings) }
    }
}

impl Middleware for Authorize {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        Arc::new(AuthorizeHandler { settings: Arc::clone(&self.settings), next })
    }
}

struct AuthorizeHandler {
    settings: Arc<AuthorizationSettings>,
    next: BoxedHandler,
}

impl AuthorizeHandler {
    fn admits(&self, req: &Request) -> bool {
        if !self.settings.enabled {
            return true;
        }
        let presented = req
            .headers()
            .get(self.settings.header.as_str())
            .map_or(&b""[..], |v| v.as_bytes());
        presented == self.settings.key.as_bytes()
    }
}

impl ErasedHandler for AuthorizeHandler {
    fn call<'a>(&'a self, req: Request, res: &'a mut dyn ResponseSink) -> BoxFuture<'a> {
        if self.admits(&req) {
            return self.next.call(req, res);
        }
        warn!(header = %self.settings.header, path = req.path(), "rejecting request with missing or wrong key");
        handle_error(DomainError::unauthorized().into(), res);
        Box::pin(async {})
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use http::{HeaderMap, HeaderValue, Method};
    use rstest::rstest;

    use super::*;
    use crate::response::Response;

    struct Counting(Arc<AtomicUsize>);

    impl ErasedHandler for Counting {
        fn call<'a>(&'a self, _req: Request, res: &'a mut dyn ResponseSink) -> BoxFuture<'a> {
            self.0.fetch_add(1, Ordering::SeqCst);
            res.write(b"inner");
            Box::pin(async {})
        }
    }

    fn settings(enabled: bool) -> AuthorizationSettings {
        AuthorizationSettings { enabled, header: "X-Key".to_owned(), key: "secret".to_owned() }
    }

    fn request(key: Option<&str>) -> Request {
        let mut headers = HeaderMap::new();
        if let Some(key) = key {
            headers.insert("x-key", HeaderValue::from_str(key).unwrap());
        }
        Request::new(Method::GET, "/hello", headers, "")
    }

    async fn run(enabled: bool, key: Option<&str>) -> (Response, usize) {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = Authorize::new(settings(enabled)).wrap(Arc::new(Counting(Arc::clone(&hits))));
        let mut res = Response::new();
        app.call(request(key), &mut res).await;
        (res, hits.load(Ordering::SeqCst))
    }

    #[rstest]
    #[case(Some("wrong"))]
    #[case(Some("SECRET"))]
    #[case(Some(""))]
    #[case(None)]
    #[tokio::test]
    async fn enabled_rejects_mismatch(#[case] key: Option<&str>) {
        let (res, hits) = run(true, key).await;
        assert_eq!(hits, 0);
        assert_eq!(res.status_code(), 401);
        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body["code"], "auth.unauthorized");
        assert_eq!(body["message"], "Unauthorized");
    }

    #[tokio::test]
    async fn enabled_admits_matching_key() {
        let (res, hits) = run(true, Some("secret")).await;
        assert_eq!(hits, 1);
        assert_eq!(res.status_code(), 200);
        assert_eq!(res.body(), b"inner");
    }

    #[rstest]
    #[case(None)]
    #[case(Some("wrong"))]
    #[case(Some("secret"))]
    #[tokio::test]
    async fn disabled_passes_everything(#[case] key: Option<&str>) {
        let (_, hits) = run(false, key).await;
        assert_eq!(hits, 1);
    }
}
