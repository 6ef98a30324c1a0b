//! Boxed-future alias for object-safe async traits.

use std::future::Future;
use std::pin::Pin;

/// A boxed future for async trait methods.
///
/// Async functions in traits do not yet combine with dynamic dispatch, and
/// both seams in this layer (the token source and the calendar adapters) are
/// trait objects, so their methods return boxed futures.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
