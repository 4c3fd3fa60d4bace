//! Radix-tree request router with route groups.
//!
//! One [`matchit`] tree per HTTP method — O(path-length) lookup, no
//! allocations on the hot path. Routes are registered through
//! [`Group`]s: a group owns a path prefix and a middleware [`Chain`], and
//! every handler registered on it is wrapped by that chain at setup time.
//! After startup the route table is read-only; dispatch takes `&self`.

use std::collections::HashMap;
use std::sync::Arc;

use http::{Method, StatusCode};
use matchit::Router as MatchitRouter;

use crate::context::Context;
use crate::handler::{BoxedHandler, Handler};
use crate::middleware::Chain;
use crate::request::Request;
use crate::response::Response;

/// The application router. Build it once at startup; pass it to
/// [`Server::serve`](crate::Server::serve).
///
/// ```rust
/// use cinch::{Context, Method, Request, Response, Router};
///
/// async fn hello(_ctx: Context, _req: Request) -> Response {
///     Response::text("api hello!")
/// }
///
/// let mut mux = Router::new();
/// mux.group("/v1").on(Method::GET, "/hello", hello);
/// ```
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new() }
    }

    /// Opens a route group: a namespace of routes sharing `prefix` and,
    /// via [`Group::chain`], a common middleware chain.
    pub fn group(&mut self, prefix: &str) -> Group<'_> {
        Group { router: self, prefix: prefix.to_owned(), chain: Chain::new() }
    }

    /// Dispatches one request: look up method + path, run the wrapped
    /// handler with `ctx`, return its response. No match returns `404`
    /// without touching any handler.
    pub async fn handle(&self, ctx: Context, mut req: Request) -> Response {
        let method = req.method().clone();
        match self.lookup(&method, req.path()) {
            Some((handler, params)) => {
                req.set_params(params);
                handler.call(ctx, req).await.into_response()
            }
            None => Response::status(StatusCode::NOT_FOUND),
        }
    }

    /// Registering the same method + full path twice is a configuration
    /// error; matchit reports the conflict and setup panics. Fail at
    /// startup, not at request time.
    fn insert(&mut self, method: Method, path: &str, handler: BoxedHandler) {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler)
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
    }

    fn lookup(
        &self,
        method: &Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched
            .params
            .iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

// ── Group ─────────────────────────────────────────────────────────────────────

/// A path-prefix namespace within a [`Router`].
///
/// Each group carries its own chain; [`Chain::with`] on a shared base gives
/// a group extra middleware without affecting its siblings.
pub struct Group<'r> {
    router: &'r mut Router,
    prefix: String,
    chain: Chain,
}

impl Group<'_> {
    /// Sets the chain wrapped around every handler registered on this
    /// group. The chain is captured by value; later changes to the source
    /// chain do not reach routes already registered.
    pub fn chain(mut self, chain: Chain) -> Self {
        self.chain = chain;
        self
    }

    /// Binds `method` + `prefix + path` to `handler`, wrapped by the
    /// group's chain. Returns `&mut Self` so registrations stack.
    ///
    /// # Panics
    ///
    /// Panics if the full path conflicts with an existing registration.
    pub fn on(&mut self, method: Method, path: &str, handler: impl Handler) -> &mut Self {
        let full = format!("{}{}", self.prefix, path);
        let wrapped = self.chain.build(handler);
        self.router.insert(method, &full, wrapped);
        self
    }
}
