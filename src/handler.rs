//! Handler trait, handler outcomes, and type erasure.
//!
//! # How async handlers are stored
//!
//! The router and the middleware chain need to hold handlers of *different*
//! concrete types behind a single interface, so handlers are erased to
//! trait objects (`dyn ErasedHandler`) and shared via `Arc`.
//!
//! The chain from user code to vtable call is:
//!
//! ```text
//! async fn hello(ctx: Context, req: Request) -> Outcome { … }
//!        ↓ group.on(Method::GET, "/hello", hello)
//! hello.into_boxed_handler()                  ← Handler blanket impl
//!        ↓
//! Arc::new(FnHandler(hello))                  ← heap-allocated wrapper
//!        ↓  stored as BoxedHandler = Arc<dyn ErasedHandler>
//! handler.call(ctx, req)  at request time     ← one vtable dispatch
//! ```
//!
//! Middleware works on the same shape: each middleware takes a
//! `BoxedHandler` and hands back another `BoxedHandler`, so a fully built
//! chain is indistinguishable from a bare handler.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use http::StatusCode;

use crate::context::Context;
use crate::request::Request;
use crate::response::Response;

// ── Internal types ────────────────────────────────────────────────────────────

/// A heap-allocated, type-erased future that resolves to an [`Outcome`].
///
/// `Pin<Box<…>>` because the runtime polls the future in place; `Send +
/// 'static` so tokio may move it across threads.
pub type BoxFuture = Pin<Box<dyn Future<Output = Outcome> + Send + 'static>>;

/// Internal dispatch interface. Middleware wrapper types implement this
/// directly; user handlers reach it through the [`Handler`] blanket impl.
#[doc(hidden)]
pub trait ErasedHandler: Send + Sync + 'static {
    fn call(&self, ctx: Context, req: Request) -> BoxFuture;
}

/// A heap-allocated, type-erased handler shared across concurrent requests.
/// One atomic reference-count increment per request, no copying.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler>;

// ── Outcome ───────────────────────────────────────────────────────────────────

/// What a handler produced: the response, plus optional side information
/// for the instrumentation wrapper to log.
///
/// The response is always returned to the client as the handler built it —
/// a reported error never overrides the chosen status.
pub struct Outcome {
    pub(crate) response: Response,
    pub(crate) detail: Option<String>,
    pub(crate) error: Option<Box<dyn StdError + Send + Sync>>,
}

impl Outcome {
    pub fn new(response: Response) -> Self {
        Self { response, detail: None, error: None }
    }

    /// Attaches a result detail, logged at debug level by
    /// [`instrument`](crate::instrument) when the status is not 200.
    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Reports a handler-level error. Logged at error level by
    /// [`instrument`](crate::instrument); the response is still sent as-is.
    pub fn error(mut self, err: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        self.error = Some(err.into());
        self
    }

    pub fn response(&self) -> &Response {
        &self.response
    }

    pub fn into_response(self) -> Response {
        self.response
    }
}

/// Conversion into an [`Outcome`]. Lets handlers return plain responses,
/// string bodies, or bare status codes without ceremony.
pub trait IntoOutcome {
    fn into_outcome(self) -> Outcome;
}

impl IntoOutcome for Outcome {
    fn into_outcome(self) -> Outcome {
        self
    }
}

impl IntoOutcome for Response {
    fn into_outcome(self) -> Outcome {
        Outcome::new(self)
    }
}

impl IntoOutcome for &'static str {
    fn into_outcome(self) -> Outcome {
        Outcome::new(Response::text(self))
    }
}

impl IntoOutcome for String {
    fn into_outcome(self) -> Outcome {
        Outcome::new(Response::text(self))
    }
}

impl IntoOutcome for StatusCode {
    fn into_outcome(self) -> Outcome {
        Outcome::new(Response::status(self))
    }
}

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for every valid route handler.
///
/// You never implement this yourself. It is automatically satisfied for any
/// `async fn` with the signature:
///
/// ```text
/// async fn name(ctx: Context, req: Request) -> impl IntoOutcome
/// ```
///
/// The trait is **sealed** (via the private `Sealed` supertrait): only the
/// blanket impl below can satisfy it.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

// ── Blanket implementations ───────────────────────────────────────────────────

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Context, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoOutcome + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Context, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoOutcome + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

// ── Concrete wrapper ──────────────────────────────────────────────────────────

/// Newtype that holds a concrete handler `F` and implements
/// [`ErasedHandler`], bridging the typed world to the trait-object world.
struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Context, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoOutcome + Send + 'static,
{
    fn call(&self, ctx: Context, req: Request) -> BoxFuture {
        let fut = (self.0)(ctx, req);
        Box::pin(async move { fut.await.into_outcome() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[tokio::test]
    async fn str_body_becomes_200_outcome() {
        async fn h(_ctx: Context, _req: Request) -> &'static str {
            "hi"
        }
        let boxed = h.into_boxed_handler();
        let out = boxed.call(Context::new(), Request::new(Method::GET, "/")).await;
        assert_eq!(out.response().status_code(), StatusCode::OK);
        assert_eq!(out.response().body(), b"hi");
    }

    #[tokio::test]
    async fn status_code_becomes_empty_outcome() {
        async fn h(_ctx: Context, _req: Request) -> StatusCode {
            StatusCode::NO_CONTENT
        }
        let boxed = h.into_boxed_handler();
        let out = boxed.call(Context::new(), Request::new(Method::GET, "/")).await;
        assert_eq!(out.response().status_code(), StatusCode::NO_CONTENT);
        assert!(out.response().body().is_empty());
    }

    #[tokio::test]
    async fn reported_error_does_not_override_response() {
        async fn h(_ctx: Context, _req: Request) -> Outcome {
            Outcome::new(Response::text("fine")).error("backend hiccup")
        }
        let boxed = h.into_boxed_handler();
        let out = boxed.call(Context::new(), Request::new(Method::GET, "/")).await;
        assert_eq!(out.response().status_code(), StatusCode::OK);
        assert_eq!(out.response().body(), b"fine");
        assert!(out.error.is_some());
    }
}
