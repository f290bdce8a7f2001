//! Request router.
//!
//! One tree per HTTP method, looked up by path with the query string
//! stripped. Static paths match exactly; `{name}` segments bind path
//! parameters. The router is itself a handler, so middleware wraps it like
//! any other.

use std::collections::HashMap;
use std::sync::Arc;

use http::Method;
use matchit::Router as MatchitRouter;

use crate::handler::{BoxFuture, BoxedHandler, ErasedHandler, Handler};
use crate::request::Request;
use crate::response::ContentType;
use crate::sink::ResponseSink;

/// The application router.
///
/// Build it once at startup and pass it to [`Server::serve`](crate::Server::serve).
/// Each registration returns `self` so calls chain naturally.
#[derive(Default)]
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a method + path pair.
    ///
    /// # Panics
    ///
    /// Panics if the path is malformed or already registered for `method`.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::GET, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::POST, path, handler)
    }

    pub fn put(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::PUT, path, handler)
    }

    pub fn delete(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::DELETE, path, handler)
    }

    fn lookup(&self, method: &Method, path: &str) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let matched = self.routes.get(method)?.at(path).ok()?;
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((Arc::clone(matched.value), params))
    }

    /// Methods registered for `path`, sorted for a stable `Allow` header.
    fn allowed(&self, path: &str) -> Vec<&str> {
        let mut methods: Vec<&str> = self.routes.iter()
            .filter(|(_, tree)| tree.at(path).is_ok())
            .map(|(method, _)| method.as_str())
            .collect();
        methods.sort_unstable();
        methods
    }
}

impl ErasedHandler for Router {
    fn call<'a>(&'a self, mut req: Request, res: &'a mut dyn ResponseSink) -> BoxFuture<'a> {
        let path = req.route_path().to_owned();
        if let Some((handler, params)) = self.lookup(req.method(), &path) {
            req.params = params;
            return Box::pin(async move { handler.call(req, res).await });
        }

        let allowed = self.allowed(&path);
        res.set_header("content-type", ContentType::Text.as_str());
        if allowed.is_empty() {
            res.write_status(404);
            res.write(b"404 page not found\n");
        } else {
            res.set_header("allow", &allowed.join(", "));
            res.write_status(405);
            res.write(b"Method Not Allowed\n");
        }
        Box::pin(async {})
    }
}
