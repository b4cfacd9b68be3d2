//! Handler trait and type erasure.
//!
//! # How handlers are stored
//!
//! A [`RouteTable`](crate::RouteTable) holds rules whose handlers all have
//! *different* concrete types: named `async fn`s, closures capturing a shared
//! store, and so on. A `Vec` can only hold one type, so each handler is hidden
//! behind `dyn ErasedHandler` and the table stores a uniform [`BoxedHandler`].
//!
//! ```text
//! async fn open(req: Request) -> Response { … }     ← user writes this
//!        ↓ table.register("/open", "GET", open)
//! open.into_boxed_handler()                         ← Handler blanket impl
//!        ↓
//! Arc::new(FnHandler(open))                         ← stored in the Rule
//!        ↓
//! handler.call(req)  after resolve()                ← one vtable dispatch
//!        ↓
//! Box::pin(async { open(req).await.into_response() })
//! ```
//!
//! The router never calls a handler itself. `resolve` hands back a reference
//! and the server invokes it.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

// ── Internal types ────────────────────────────────────────────────────────────

/// A heap-allocated, type-erased future that resolves to a [`Response`].
pub type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// The single invoke operation every stored handler exposes.
///
/// `#[doc(hidden)] pub` because it appears in the return type of
/// [`Handler::into_boxed_handler`]. External crates only ever call it through
/// a [`BoxedHandler`] obtained from [`RouteTable::resolve`](crate::RouteTable::resolve).
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: Request) -> BoxFuture;
}

/// A type-erased handler shared by every request that resolves to its rule.
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for every valid route handler.
///
/// Satisfied automatically by any `Send + Sync + 'static` function or closure
/// with the shape:
///
/// ```text
/// Fn(Request) -> impl Future<Output = impl IntoResponse>
/// ```
///
/// Closures may capture shared state, which is how the backlog handlers reach
/// their store:
///
/// ```rust
/// # use std::sync::Arc;
/// # use backlog::{Request, Response, RouteTable};
/// let greeting = Arc::new(String::from("hello"));
/// let table = RouteTable::new().register("/greet", "GET", move |_req: Request| {
///     let greeting = Arc::clone(&greeting);
///     async move { Response::text(greeting.as_str()) }
/// });
/// assert_eq!(table.len(), 1);
/// ```
///
/// The trait is sealed: only the blanket impl below can satisfy it.
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
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

// ── Concrete wrapper ──────────────────────────────────────────────────────────

/// Bridges a concrete handler `F` to the [`ErasedHandler`] trait object.
struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}
