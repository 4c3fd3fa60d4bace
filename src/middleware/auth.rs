//! Authentication stub.

use std::sync::Arc;

use crate::context::Context;
use crate::handler::{BoxFuture, BoxedHandler, ErasedHandler};
use crate::logging::Logger;
use crate::middleware::Middleware;
use crate::request::Request;

/// Placeholder auth middleware: logs entry and exit markers around the
/// inner call and nothing else.
///
/// A real implementation replacing this must keep its position — inside
/// the base chain (recovery and logger binding already established),
/// outside the terminal handler. Attach per group via
/// [`Chain::with`](crate::Chain::with).
pub struct Auth;

impl Middleware for Auth {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        Arc::new(AuthHandler { inner: next })
    }
}

struct AuthHandler {
    inner: BoxedHandler,
}

impl ErasedHandler for AuthHandler {
    fn call(&self, ctx: Context, req: Request) -> BoxFuture {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            let outer = ctx.clone();
            if let Some(logger) = outer.get::<Logger>() {
                logger.info("auth middleware start");
            }
            let outcome = inner.call(ctx, req).await;
            if let Some(logger) = outer.get::<Logger>() {
                logger.info("auth middleware end");
            }
            outcome
        })
    }
}
