//! Per-request logger binding.

use std::sync::Arc;

use uuid::Uuid;

use crate::context::Context;
use crate::handler::{BoxFuture, BoxedHandler, ErasedHandler};
use crate::logging::Logger;
use crate::middleware::Middleware;
use crate::request::Request;

/// Header carrying the request ID, both inbound (client-supplied) and
/// outbound (echoed on every response that passed through the binding).
pub const REQUEST_ID_HEADER: &str = "request-id";

/// The request ID assigned to the current request, retrievable from the
/// [`Context`].
pub struct RequestId(pub String);

/// Binds a request-scoped [`Logger`] into the context.
///
/// Per request this middleware resolves the request ID (incoming
/// [`REQUEST_ID_HEADER`] if present, a fresh UUIDv4 otherwise), derives a
/// child logger from the base with the request fields attached (`method`,
/// `url`, `ip`, `user_agent`, `referer`, `req_id`), stores logger and
/// [`RequestId`] in the context, and echoes the ID in the response header.
///
/// Handlers retrieve the logger with `ctx.get::<Logger>()`.
pub struct LoggerBinding {
    base: Logger,
}

impl LoggerBinding {
    /// `base` is the process-wide logger built once at startup; the
    /// binding only ever derives from it, never changes it.
    pub fn new(base: Logger) -> Self {
        Self { base }
    }
}

impl Middleware for LoggerBinding {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        Arc::new(BoundHandler { base: self.base.clone(), inner: next })
    }
}

struct BoundHandler {
    base: Logger,
    inner: BoxedHandler,
}

impl ErasedHandler for BoundHandler {
    fn call(&self, ctx: Context, req: Request) -> BoxFuture {
        let base = self.base.clone();
        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            let req_id = req
                .header(REQUEST_ID_HEADER)
                .map(str::to_owned)
                .unwrap_or_else(|| Uuid::new_v4().to_string());

            let logger = base.request(&req, &req_id);
            let ctx = ctx.with(logger).with(RequestId(req_id.clone()));

            let mut outcome = inner.call(ctx, req).await;
            outcome.response.set_header(REQUEST_ID_HEADER, &req_id);
            outcome
        })
    }
}
