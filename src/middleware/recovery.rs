//! Panic recovery at the chain boundary.

use std::sync::Arc;

use http::StatusCode;
use tracing::error;

use crate::context::Context;
use crate::handler::{BoxFuture, BoxedHandler, ErasedHandler, Outcome};
use crate::middleware::Middleware;
use crate::request::Request;
use crate::response::Response;

/// Catches panics from inner middleware and the terminal handler,
/// translating them into a `500 Internal Server Error` response.
///
/// Must be the outermost link of any production chain — add it first.
/// The inner handler runs as its own tokio task; a panicked task surfaces
/// as a [`JoinError`](tokio::task::JoinError) here instead of unwinding
/// through the connection, so exactly one response is written and the
/// process keeps serving.
pub struct Recovery;

impl Middleware for Recovery {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        Arc::new(RecoverHandler { inner: next })
    }
}

struct RecoverHandler {
    inner: BoxedHandler,
}

impl ErasedHandler for RecoverHandler {
    fn call(&self, ctx: Context, req: Request) -> BoxFuture {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            let method = req.method().clone();
            let uri = req.uri().to_string();
            match tokio::spawn(inner.call(ctx, req)).await {
                Ok(outcome) => outcome,
                Err(join_err) => {
                    let reason = if join_err.is_panic() {
                        panic_message(join_err.into_panic())
                    } else {
                        "request task cancelled".to_owned()
                    };
                    error!(method = %method, url = %uri, "recovered from panic: {reason}");
                    Outcome::new(Response::status(StatusCode::INTERNAL_SERVER_ERROR))
                }
            }
        })
    }
}

/// Panic payloads are `&str` for `panic!("literal")` and `String` for
/// formatted panics; anything else is opaque.
fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}
