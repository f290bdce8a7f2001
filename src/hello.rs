//! The demonstration route.

use crate::api_error::HandlerError;
use crate::handler::{BoxFuture, HandlerResult};
use crate::request::Request;
use crate::response::ContentType;
use crate::sink::ResponseSink;

/// `GET /hello`: `200` with the body `Hello World`.
pub fn hello(_req: Request, res: &mut dyn ResponseSink) -> BoxFuture<'_, HandlerResult> {
    res.set_header("content-type", ContentType::Json.as_str());
    res.write_status(200);
    res.write(b"Hello World");
    Box::pin(async { Ok::<(), HandlerError>(()) })
}
