//! Handler trait and type erasure.
//!
//! # How handlers are stored
//!
//! Middleware and the router hold handlers of *different* concrete types
//! behind one interface, so everything is stored as `Arc<dyn ErasedHandler>`.
//!
//! A handler receives the request by value and the response channel by
//! mutable borrow. The future it returns borrows that channel, which is why
//! [`BoxFuture`] carries a lifetime:
//!
//! ```text
//! fn hello(req, res: &mut dyn ResponseSink) -> BoxFuture<'_, HandlerResult>
//!        ↓ router.get("/hello", hello)
//! Route(hello)                          ← adapter: Err → dispatch::handle_error
//!        ↓  stored as BoxedHandler = Arc<dyn ErasedHandler>
//! handler.call(req, res)                ← one vtable dispatch per layer
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::api_error::HandlerError;
use crate::dispatch::handle_error;
use crate::request::Request;
use crate::sink::ResponseSink;

/// A heap-allocated, type-erased future borrowing the response channel.
pub type BoxFuture<'a, T = ()> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// What a route function resolves to.
pub type HandlerResult = Result<(), HandlerError>;

/// The dispatch interface every layer of the chain implements.
///
/// Infallible by signature: whatever goes wrong inside has already been
/// written to `res` by the time the future completes.
pub trait ErasedHandler: Send + Sync + 'static {
    fn call<'a>(&'a self, req: Request, res: &'a mut dyn ResponseSink) -> BoxFuture<'a>;
}

/// A type-erased handler shared across concurrent requests.
pub type BoxedHandler = Arc<dyn ErasedHandler>;

/// Implemented for every valid route function.
///
/// Satisfied automatically by any function with the signature:
///
/// ```text
/// fn name(req: Request, res: &mut dyn ResponseSink) -> BoxFuture<'_, HandlerResult>
/// ```
///
/// The trait is **sealed**; only the blanket impl below satisfies it.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

impl<F> private::Sealed for F
where
    F: for<'a> Fn(Request, &'a mut dyn ResponseSink) -> BoxFuture<'a, HandlerResult> + Send + Sync + 'static,
{
}

impl<F> Handler for F
where
    F: for<'a> Fn(Request, &'a mut dyn ResponseSink) -> BoxFuture<'a, HandlerResult> + Send + Sync + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(Route(self))
    }
}

/// Bridges a fallible route function to the infallible chain: an `Err` is
/// handed to error dispatch, once, through the same sink.
struct Route<F>(F);

impl<F> ErasedHandler for Route<F>
where
    F: for<'a> Fn(Request, &'a mut dyn ResponseSink) -> BoxFuture<'a, HandlerResult> + Send + Sync + 'static,
{
    fn call<'a>(&'a self, req: Request, res: &'a mut dyn ResponseSink) -> BoxFuture<'a> {
        Box::pin(async move {
            if let Err(err) = (self.0)(req, &mut *res).await {
                handle_error(err, res);
            }
        })
    }
}
