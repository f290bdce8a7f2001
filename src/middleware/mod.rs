//! Middleware layer.
//!
//! A [`Middleware`] takes the next handler and returns a new handler that
//! may act before and after delegating to it. A [`Chain`] assembles an
//! ordered list of middleware around a final handler using onion ordering:
//! the first middleware declared is the outermost one, so it sees the
//! request first and the response last.
//!
//! ```text
//! compose([log, auth]).around(router)  ==  log.wrap(auth.wrap(router))
//!
//!   request  → log → auth → router
//!   response ← log ← auth ← router
//! ```
//!
//! Assembly happens once at startup. The resulting handler is shared by
//! every request.
//!
//! Built-in middleware:
//! - [`LogRequests`]: correlation id plus one log line per request and per response
//! - [`Authorize`]: rejects requests whose key header does not match the configured key

mod authorize;
mod log;

pub use authorize::Authorize;
pub use log::LogRequests;

use crate::handler::BoxedHandler;

/// A request-handling decorator.
///
/// Implemented for plain functions and closures of type
/// `Fn(BoxedHandler) -> BoxedHandler` as well.
pub trait Middleware: Send + Sync + 'static {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler;
}

impl<F> Middleware for F
where
    F: Fn(BoxedHandler) -> BoxedHandler + Send + Sync + 'static,
{
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        self(next)
    }
}

/// An ordered list of middleware, outermost first.
#[derive(Default)]
pub struct Chain {
    layers: Vec<Box<dyn Middleware>>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `middleware` as the innermost layer so far.
    pub fn with(mut self, middleware: impl Middleware) -> Self {
        self.layers.push(Box::new(middleware));
        self
    }

    pub fn len(&self) -> usize { self.layers.len() }
    pub fn is_empty(&self) -> bool { self.layers.is_empty() }

    /// Wraps `handler` in every layer, last declared first, so the first
    /// declared layer ends up outermost. An empty chain returns `handler`
    /// unchanged.
    pub fn around(&self, handler: BoxedHandler) -> BoxedHandler {
        self.layers.iter().rev().fold(handler, |next, layer| layer.wrap(next))
    }
}

/// Builds a [`Chain`] from middleware in declaration order.
pub fn compose<I>(middlewares: I) -> Chain
where
    I: IntoIterator<Item = Box<dyn Middleware>>,
{
    Chain { layers: middlewares.into_iter().collect() }
}
