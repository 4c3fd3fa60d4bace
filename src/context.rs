//! Request-scoped, immutable context.
//!
//! A [`Context`] is a persistent (in the functional sense) map from Rust
//! types to values. [`Context::with`] never mutates — it returns a *child*
//! context that resolves the new value and falls back to its parent for
//! everything else. Middleware extends the context on the way in; handlers
//! read from it. The server creates one fresh context per request, so two
//! requests can never observe each other's values.
//!
//! ```rust
//! use cinch::Context;
//!
//! struct Tenant(&'static str);
//!
//! let root = Context::new();
//! let ctx = root.with(Tenant("acme"));
//!
//! assert_eq!(ctx.get::<Tenant>().unwrap().0, "acme");
//! assert!(root.get::<Tenant>().is_none()); // parent untouched
//! ```

use std::any::{Any, TypeId};
use std::sync::Arc;

/// One link in the derivation chain. Links are `Arc`-shared so a child
/// context is a single allocation, not a copy of its parent.
struct Node {
    key: TypeId,
    value: Box<dyn Any + Send + Sync>,
    parent: Option<Arc<Node>>,
}

/// An immutable, request-scoped bag of typed values.
///
/// Cloning a `Context` is one atomic increment. Values must be
/// `Send + Sync + 'static` because request processing may hop threads.
#[derive(Clone, Default)]
pub struct Context {
    head: Option<Arc<Node>>,
}

impl Context {
    /// An empty context. The server creates one of these per request.
    pub fn new() -> Self {
        Self { head: None }
    }

    /// Derives a child context in which `T` resolves to `value`.
    ///
    /// The receiver is untouched; lookups on the child fall back to the
    /// parent chain for every other type. Deriving with the same type again
    /// shadows the earlier value without erasing it from the parent.
    pub fn with<T: Send + Sync + 'static>(&self, value: T) -> Context {
        Context {
            head: Some(Arc::new(Node {
                key: TypeId::of::<T>(),
                value: Box::new(value),
                parent: self.head.clone(),
            })),
        }
    }

    /// Looks up the nearest value of type `T`, walking toward the root.
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        let mut node = self.head.as_deref();
        while let Some(n) = node {
            if n.key == TypeId::of::<T>() {
                return n.value.downcast_ref::<T>();
            }
            node = n.parent.as_deref();
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ReqId(u64);
    struct User(&'static str);

    #[test]
    fn lookup_falls_back_to_parent() {
        let ctx = Context::new().with(ReqId(7)).with(User("alice"));
        assert_eq!(ctx.get::<ReqId>().unwrap().0, 7);
        assert_eq!(ctx.get::<User>().unwrap().0, "alice");
    }

    #[test]
    fn missing_type_is_absent() {
        let ctx = Context::new().with(ReqId(1));
        assert!(ctx.get::<User>().is_none());
    }

    #[test]
    fn derivation_shadows_without_mutating_parent() {
        let parent = Context::new().with(ReqId(1));
        let child = parent.with(ReqId(2));
        assert_eq!(child.get::<ReqId>().unwrap().0, 2);
        assert_eq!(parent.get::<ReqId>().unwrap().0, 1);
    }

    #[test]
    fn sibling_derivations_are_isolated() {
        let root = Context::new();
        let a = root.with(User("a"));
        let b = root.with(User("b"));
        assert_eq!(a.get::<User>().unwrap().0, "a");
        assert_eq!(b.get::<User>().unwrap().0, "b");
        assert!(root.get::<User>().is_none());
    }
}
