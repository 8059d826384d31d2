//! The Operation capability -- the unit of work the governors wrap.
//!
//! Governors are oblivious to what an operation does; they only observe
//! success vs. failure and need to be able to invoke it again. Any
//! `FnMut() -> Future` closure is an operation via the blanket impl, so
//! call sites can pass `|| client.complete(&request)` directly.

use std::future::Future;

/// A repeatable unit of work with an observable outcome.
///
/// `call` takes `&mut self` so an operation may be invoked several times
/// (once per retry attempt); each returned future is driven to completion
/// before the next invocation.
pub trait Operation {
    type Output;
    type Error;

    /// Invoke the operation once.
    fn call(&mut self) -> impl Future<Output = Result<Self::Output, Self::Error>> + Send;
}

/// Blanket implementation: any zero-argument closure producing a fallible
/// future is an operation.
impl<F, Fut, T, E> Operation for F
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>> + Send,
{
    type Output = T;
    type Error = E;

    fn call(&mut self) -> impl Future<Output = Result<T, E>> + Send {
        (self)()
    }
}
