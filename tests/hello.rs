//! End-to-end tests over the public API: the hello-server wiring driven
//! through `Router::handle` without a TCP listener.

use std::sync::{Arc, Mutex};

use cinch::middleware::{Auth, LoggerBinding, Recovery, Timing, REQUEST_ID_HEADER};
use cinch::{
    instrument, App, BoxFuture, BoxedHandler, Chain, Context, ErasedHandler, LogConfig, Logger,
    Method, Middleware, Outcome, Request, Response, Router, StatusCode,
};

fn base_chain() -> Chain {
    let config = LogConfig::new("my-service", "localhost");
    Chain::new()
        .add(Recovery)
        .add(Timing)
        .add(LoggerBinding::new(Logger::new(&config)))
}

/// The demo application's router, plus a route that always panics so the
/// recovery path can be exercised.
fn hello_router() -> Router {
    let base = base_chain();
    let api = base.with(Auth);
    let app = App::new("test-server");

    let mut mux = Router::new();
    mux.group("/v1")
        .chain(api)
        .on(Method::GET, "/hello", instrument(app.clone(), hello))
        .on(Method::GET, "/panic", instrument(app.clone(), blow_up));
    mux.group("/static")
        .chain(base)
        .on(Method::GET, "/hello", instrument(app, static_hello));
    mux
}

async fn hello(ctx: Context, _req: Request) -> Outcome {
    if let Some(logger) = ctx.get::<Logger>() {
        logger.debug("handling api hello");
    }
    Outcome::new(Response::text("api hello!")).detail("ok")
}

async fn static_hello(_ctx: Context, _req: Request) -> Outcome {
    Outcome::new(Response::text("static hello!")).detail("ok")
}

async fn blow_up(_ctx: Context, _req: Request) -> Outcome {
    panic!("handler exploded");
}

#[tokio::test]
async fn api_hello_returns_fixed_body() {
    let mux = hello_router();
    let res = mux.handle(Context::new(), Request::new(Method::GET, "/v1/hello")).await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.body(), b"api hello!");
}

#[tokio::test]
async fn static_hello_returns_fixed_body() {
    let mux = hello_router();
    let res = mux.handle(Context::new(), Request::new(Method::GET, "/static/hello")).await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.body(), b"static hello!");
}

#[tokio::test]
async fn unknown_routes_are_404() {
    let mux = hello_router();
    for (method, path) in [
        (Method::GET, "/v1/goodbye"),
        (Method::POST, "/v1/hello"),
        (Method::GET, "/static"),
        (Method::GET, "/"),
    ] {
        let res = mux.handle(Context::new(), Request::new(method.clone(), path)).await;
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND, "{method} {path}");
    }
}

#[tokio::test]
async fn panicking_handler_yields_a_single_500() {
    let mux = hello_router();
    let res = mux.handle(Context::new(), Request::new(Method::GET, "/v1/panic")).await;
    assert_eq!(res.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

    // The process (and the router) keeps serving afterwards.
    let res = mux.handle(Context::new(), Request::new(Method::GET, "/v1/hello")).await;
    assert_eq!(res.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn every_response_carries_a_request_id() {
    let mux = hello_router();
    let res = mux.handle(Context::new(), Request::new(Method::GET, "/v1/hello")).await;
    assert!(res.header(REQUEST_ID_HEADER).is_some());
}

#[tokio::test]
async fn client_supplied_request_id_is_echoed() {
    let mux = hello_router();
    let req = Request::new(Method::GET, "/static/hello").with_header(REQUEST_ID_HEADER, "trace-me");
    let res = mux.handle(Context::new(), req).await;
    assert_eq!(res.header(REQUEST_ID_HEADER), Some("trace-me"));
}

#[tokio::test]
async fn concurrent_requests_do_not_share_request_ids() {
    let mux = Arc::new(hello_router());
    let mut handles = Vec::new();
    for _ in 0..8 {
        let mux = Arc::clone(&mux);
        handles.push(tokio::spawn(async move {
            let res = mux.handle(Context::new(), Request::new(Method::GET, "/v1/hello")).await;
            res.header(REQUEST_ID_HEADER).unwrap().to_owned()
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap());
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 8, "request ids leaked between requests");
}

// ── Chain-order observation through a full router dispatch ────────────────────

type Trace = Arc<Mutex<Vec<&'static str>>>;

struct Probe {
    label: &'static str,
    trace: Trace,
}

struct ProbeHandler {
    label: &'static str,
    trace: Trace,
    inner: BoxedHandler,
}

impl Middleware for Probe {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        Arc::new(ProbeHandler {
            label: self.label,
            trace: Arc::clone(&self.trace),
            inner: next,
        })
    }
}

impl ErasedHandler for ProbeHandler {
    fn call(&self, ctx: Context, req: Request) -> BoxFuture {
        let label = self.label;
        let trace = Arc::clone(&self.trace);
        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            trace.lock().unwrap().push(label);
            let outcome = inner.call(ctx, req).await;
            trace.lock().unwrap().push(label);
            outcome
        })
    }
}

#[tokio::test]
async fn registered_chain_runs_first_added_outermost() {
    let trace: Trace = Arc::default();
    let chain = Chain::new()
        .add(Probe { label: "a", trace: Arc::clone(&trace) })
        .add(Probe { label: "b", trace: Arc::clone(&trace) });

    let t = Arc::clone(&trace);
    let terminal = move |_ctx: Context, _req: Request| {
        let t = Arc::clone(&t);
        async move {
            t.lock().unwrap().push("h");
            Outcome::new(Response::text("done"))
        }
    };

    let mut mux = Router::new();
    mux.group("/probe").chain(chain).on(Method::GET, "/run", terminal);

    mux.handle(Context::new(), Request::new(Method::GET, "/probe/run")).await;
    assert_eq!(*trace.lock().unwrap(), ["a", "b", "h", "b", "a"]);
}

#[tokio::test]
async fn group_chains_do_not_bleed_into_each_other() {
    let trace: Trace = Arc::default();
    let base = Chain::new();
    let extended = base.with(Probe { label: "extra", trace: Arc::clone(&trace) });

    async fn plain(_ctx: Context, _req: Request) -> Outcome {
        Outcome::new(Response::text("plain"))
    }

    let mut mux = Router::new();
    mux.group("/bare").chain(base).on(Method::GET, "/x", plain);
    mux.group("/wrapped").chain(extended).on(Method::GET, "/x", plain);

    mux.handle(Context::new(), Request::new(Method::GET, "/bare/x")).await;
    assert!(trace.lock().unwrap().is_empty(), "base group ran the extra link");

    mux.handle(Context::new(), Request::new(Method::GET, "/wrapped/x")).await;
    assert_eq!(*trace.lock().unwrap(), ["extra", "extra"]);
}
