//! Middleware and the chain that composes it.
//!
//! A middleware wraps a handler to add cross-cutting behavior before and
//! after the inner call — recovery, timing, logger binding, auth. A
//! [`Chain`] is an ordered list of middlewares; building it against a
//! terminal handler folds right-to-left, so the *first* middleware added
//! is outermost: it sees the request first and the response last.
//!
//! ```text
//! Chain [Recovery, Timing, LoggerBinding] + handler h
//!   ⇒ Recovery(Timing(LoggerBinding(h)))
//! ```
//!
//! Chains are immutable values. [`Chain::with`] derives a longer chain for
//! one route group without touching the base, so every group gets its own
//! composition and nothing is shared mutably after startup.

mod auth;
mod logger;
mod recovery;
mod timing;

pub use auth::Auth;
pub use logger::{LoggerBinding, RequestId, REQUEST_ID_HEADER};
pub use recovery::Recovery;
pub use timing::Timing;

use std::sync::Arc;

use crate::handler::{BoxedHandler, Handler};

/// The capability "wrap a handler, producing a new handler of the same
/// shape". Implementations hold no per-request state; anything a request
/// needs must travel through the [`Context`](crate::Context).
pub trait Middleware: Send + Sync + 'static {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler;
}

/// An ordered, immutable sequence of middlewares.
#[derive(Clone, Default)]
pub struct Chain {
    links: Vec<Arc<dyn Middleware>>,
}

impl Chain {
    pub fn new() -> Self {
        Self { links: Vec::new() }
    }

    /// Appends a middleware, builder style. In any production chain
    /// [`Recovery`] should be added first so it runs outermost.
    pub fn add(mut self, mw: impl Middleware) -> Self {
        self.links.push(Arc::new(mw));
        self
    }

    /// Derives a new chain = this chain's links + `mw`. The receiver is
    /// left untouched, so a base chain can be specialized per route group.
    pub fn with(&self, mw: impl Middleware) -> Chain {
        let mut links = self.links.clone();
        links.push(Arc::new(mw));
        Chain { links }
    }

    /// Composes the chain around a terminal handler. Folding from the
    /// right keeps the first-added link outermost. Side-effect-free:
    /// building twice yields equivalent handlers.
    pub fn build(&self, handler: impl Handler) -> BoxedHandler {
        self.links
            .iter()
            .rev()
            .fold(handler.into_boxed_handler(), |inner, link| link.wrap(inner))
    }
}
