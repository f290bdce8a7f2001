//! # rampart
//!
//! A minimal HTTP service scaffold: a small, ordered chain of cross-cutting
//! behaviour around a router, and one uniform JSON shape for every failure.
//!
//! ## The pipeline
//!
//! ```text
//! request → LogRequests → Authorize → Router → handler
//!                                                │ Err(HandlerError)
//!                                                ↓
//!                                   dispatch::handle_error → JSON envelope
//! ```
//!
//! - [`middleware::LogRequests`] assigns a correlation id and logs the request
//!   before dispatch and the captured response after it.
//! - [`middleware::Authorize`] rejects requests whose key header does not match
//!   the configured key, when enabled.
//! - Route handlers write to a [`ResponseSink`] and return
//!   `Result<(), HandlerError>`; errors become envelopes such as
//!
//! ```json
//! {"timestamp":"2024-05-01T12:00:00Z","code":"err.validation","message":"Validation Failed",
//!  "details":[{"field":"name","code":"required","message":"name is required","value":"","expected":""}]}
//! ```
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use rampart::{BoxFuture, DomainError, FieldError, HandlerResult, Request, ResponseSink, Router, Server, Settings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), rampart::Error> {
//!     let settings = Arc::new(Settings::load()?.settings);
//!     let app = Router::new().post("/users", create_user);
//!     Server::new(settings).serve(app).await
//! }
//!
//! fn create_user(req: Request, res: &mut dyn ResponseSink) -> BoxFuture<'_, HandlerResult> {
//!     Box::pin(create(req, res))
//! }
//!
//! async fn create(mut req: Request, res: &mut dyn ResponseSink) -> HandlerResult {
//!     if req.bytes().await?.is_empty() {
//!         let missing = FieldError::new("body", "required", "body is required");
//!         return Err(DomainError::validation(vec![missing]).into());
//!     }
//!     res.write_status(201);
//!     Ok(())
//! }
//! ```

mod api_error;
mod error;
mod handler;
mod request;
mod response;
mod router;
mod server;
mod sink;

pub mod dispatch;
pub mod filter;
pub mod hello;
pub mod logging;
pub mod middleware;
pub mod paging;
pub mod settings;

#[cfg(test)]
mod test_support;

pub use api_error::{ApiErrorEnvelope, BoxError, DomainError, FieldError, HandlerError};
pub use error::Error;
pub use handler::{BoxFuture, BoxedHandler, ErasedHandler, Handler, HandlerResult};
pub use request::Request;
pub use response::{ContentType, Response};
pub use router::Router;
pub use server::Server;
pub use settings::Settings;
pub use sink::{CaptureSink, ResponseSink};
