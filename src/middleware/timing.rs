//! Request timing.

use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use crate::context::Context;
use crate::handler::{BoxFuture, BoxedHandler, ErasedHandler};
use crate::middleware::Middleware;
use crate::request::Request;

/// Logs method, full request URI, and elapsed duration once the inner
/// handler returns. Touches neither the request nor the response.
pub struct Timing;

impl Middleware for Timing {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        Arc::new(TimedHandler { inner: next })
    }
}

struct TimedHandler {
    inner: BoxedHandler,
}

impl ErasedHandler for TimedHandler {
    fn call(&self, ctx: Context, req: Request) -> BoxFuture {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            let method = req.method().clone();
            let uri = req.uri().to_string();
            let start = Instant::now();
            let outcome = inner.call(ctx, req).await;
            info!(method = %method, url = %uri, elapsed = ?start.elapsed(), "request served");
            outcome
        })
    }
}
