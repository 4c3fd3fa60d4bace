//! # cinch
//!
//! A minimal HTTP framework built around three ideas:
//!
//! - **Middleware chains** — an ordered, immutable list of wrappers
//!   composed around a terminal handler. First added runs outermost:
//!   chain `[m1, m2, m3]` around `h` executes `m1(m2(m3(h)))`.
//! - **Request-scoped context** — an immutable, typed key/value bag
//!   threaded through every middleware and handler. No globals, no
//!   thread-locals; middleware *derives* an extended context and passes it
//!   down.
//! - **Route groups** — namespaces sharing a path prefix and a chain.
//!   `Chain::with` specializes a base chain for one group without touching
//!   the others.
//!
//! Built-in middleware covers the usual cross-cutting set: panic
//! [`Recovery`](middleware::Recovery), request
//! [`Timing`](middleware::Timing), structured
//! [`LoggerBinding`](middleware::LoggerBinding) (per-request logger with
//! method/url/ip/user-agent/referer/request-id fields, stored in the
//! context), and an [`Auth`](middleware::Auth) stub marking where real
//! authorization belongs.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use cinch::middleware::{LoggerBinding, Recovery, Timing};
//! use cinch::{logging, Chain, Context, LogConfig, Logger, Method, Outcome,
//!             Request, Response, Router, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = LogConfig::new("my-service", "localhost");
//!     logging::init(&config);
//!
//!     let chain = Chain::new()
//!         .add(Recovery)
//!         .add(Timing)
//!         .add(LoggerBinding::new(Logger::new(&config)));
//!
//!     let mut mux = Router::new();
//!     mux.group("/v1").chain(chain).on(Method::GET, "/hello", hello);
//!
//!     Server::bind("0.0.0.0:8081").serve(mux).await.unwrap();
//! }
//!
//! async fn hello(ctx: Context, _req: Request) -> Outcome {
//!     if let Some(logger) = ctx.get::<Logger>() {
//!         logger.debug("saying hello");
//!     }
//!     Outcome::new(Response::text("api hello!"))
//! }
//! ```
//!
//! ## Concurrency model
//!
//! One task per connection, one context per request. The route table and
//! the base logger are immutable once `serve` starts, so request handling
//! needs no locks and contexts from different requests share nothing.

mod context;
mod error;
mod handler;
mod instrument;
mod request;
mod response;
mod router;
mod server;

pub mod logging;
pub mod middleware;

pub use context::Context;
pub use error::Error;
pub use handler::{Handler, IntoOutcome, Outcome};
pub use instrument::{instrument, App};
pub use logging::{LogConfig, Logger};
pub use middleware::{Chain, Middleware};
pub use request::Request;
pub use response::{Response, ResponseBuilder};
pub use router::{Group, Router};
pub use server::Server;

// Re-exported so applications do not need a direct `http` dependency.
pub use http::{Method, StatusCode};

#[doc(hidden)]
pub use handler::{BoxFuture, BoxedHandler, ErasedHandler};
