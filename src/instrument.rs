//! Endpoint instrumentation wrapper.

use std::future::Future;

use http::StatusCode;

use crate::context::Context;
use crate::handler::{Handler, IntoOutcome, Outcome};
use crate::logging::Logger;
use crate::request::Request;

/// Identity of the application an endpoint belongs to, logged by
/// [`instrument`] on every invocation.
#[derive(Clone, Debug)]
pub struct App {
    pub role: String,
}

impl App {
    pub fn new(role: impl Into<String>) -> Self {
        Self { role: role.into() }
    }
}

/// Wraps an endpoint handler with outcome logging.
///
/// After the inner handler returns, the wrapper uses the context-bound
/// [`Logger`] to record:
/// - the application identity, at info level;
/// - the handler-reported error, at error level, if one was set;
/// - the result detail, at debug level, when the status is not 200.
///
/// The response itself passes through untouched — reported errors never
/// change what the client receives.
pub fn instrument<F, Fut, R>(app: App, handler: F) -> impl Handler
where
    F: Fn(Context, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoOutcome + Send + 'static,
{
    move |ctx: Context, req: Request| {
        let app = app.clone();
        let outer = ctx.clone();
        let fut = handler(ctx, req);
        async move {
            let outcome: Outcome = fut.await.into_outcome();
            if let Some(logger) = outer.get::<Logger>() {
                logger.info(format!("app {app:?}"));
                if let Some(err) = &outcome.error {
                    logger.error(err);
                }
                if outcome.response.status_code() != StatusCode::OK {
                    if let Some(detail) = &outcome.detail {
                        logger.debug(detail);
                    }
                }
            }
            outcome
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::Response;
    use http::Method;

    #[tokio::test]
    async fn wrapped_handler_response_is_untouched() {
        async fn h(_ctx: Context, _req: Request) -> Outcome {
            Outcome::new(Response::text("body")).detail("ok").error("reported")
        }
        let wrapped = instrument(App::new("test-server"), h).into_boxed_handler();
        let out = wrapped.call(Context::new(), Request::new(Method::GET, "/")).await;
        assert_eq!(out.response().status_code(), StatusCode::OK);
        assert_eq!(out.response().body(), b"body");
    }

    #[tokio::test]
    async fn works_without_a_bound_logger() {
        async fn h(_ctx: Context, _req: Request) -> Outcome {
            Outcome::new(Response::status(StatusCode::IM_A_TEAPOT)).detail("brewing")
        }
        // Context has no Logger; the wrapper must still pass the outcome on.
        let wrapped = instrument(App::new("test-server"), h).into_boxed_handler();
        let out = wrapped.call(Context::new(), Request::new(Method::GET, "/")).await;
        assert_eq!(out.response().status_code(), StatusCode::IM_A_TEAPOT);
    }
}
