//! The hello server: two route groups, a shared base chain, port 8081.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example hello
//!
//! Try:
//!   curl -i http://localhost:8081/v1/hello
//!   curl -i http://localhost:8081/static/hello
//!   curl -i -H 'request-id: trace-me' http://localhost:8081/v1/hello

use cinch::middleware::{Auth, LoggerBinding, Recovery, Timing};
use cinch::{
    instrument, logging, App, Chain, Context, LogConfig, Logger, Method, Outcome, Request,
    Response, Router, Server,
};

#[tokio::main]
async fn main() {
    let host = std::env::var("HOSTNAME").unwrap_or_else(|_| "localhost".to_owned());
    let config = LogConfig::new("my-service", host);
    logging::init(&config);

    // Recovery first so it is outermost; the logger binding last so every
    // link after it (and the handlers) can read the bound logger.
    let base_chain = Chain::new()
        .add(Recovery)
        .add(Timing)
        .add(LoggerBinding::new(Logger::new(&config)));
    let api_chain = base_chain.with(Auth);

    let app = App::new("test-server");

    let mut mux = Router::new();
    mux.group("/v1")
        .chain(api_chain)
        .on(Method::GET, "/hello", instrument(app.clone(), hello));
    mux.group("/static")
        .chain(base_chain)
        .on(Method::GET, "/hello", instrument(app, static_hello));

    if let Err(e) = Server::bind("0.0.0.0:8081").serve(mux).await {
        tracing::error!("server error: {e}");
        std::process::exit(1);
    }
}

// GET /v1/hello
async fn hello(ctx: Context, _req: Request) -> Outcome {
    if let Some(logger) = ctx.get::<Logger>() {
        logger.debug("handling api hello");
    }
    Outcome::new(Response::text("api hello!")).detail("ok")
}

// GET /static/hello
async fn static_hello(_ctx: Context, _req: Request) -> Outcome {
    Outcome::new(Response::text("static hello!")).detail("ok")
}
