//! Handles around caller-supplied async operations.
//!
//! Both handles are cheap to clone. Clones share identity, which is what
//! [`Resource::refresh_if_changed`](crate::resource::Resource::refresh_if_changed)
//! compares to decide whether the producer changed.

use std::fmt;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::error::ResourceError;

type ProducerFn<T> = dyn Fn() -> BoxFuture<'static, Result<T, ResourceError>> + Send + Sync;
type MutatorFn<P, T> = dyn Fn(P) -> BoxFuture<'static, Result<T, ResourceError>> + Send + Sync;

/// A zero-argument async operation whose result populates a resource.
///
/// # Example
///
/// ```rust
/// use loadstate::producer::Producer;
///
/// let producer = Producer::new(|| async { Ok::<_, std::io::Error>(42) });
/// let same = producer.clone();
/// assert!(producer.ptr_eq(&same));
/// ```
pub struct Producer<T> {
    inner: Arc<ProducerFn<T>>,
}

impl<T: Send + 'static> Producer<T> {
    /// Wraps an async function.
    ///
    /// Any error type convertible into [`ResourceError`] is accepted.
    pub fn new<F, Fut, E>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Into<ResourceError> + 'static,
    {
        Self {
            inner: Arc::new(move || {
                f().map(|result| result.map_err(Into::<ResourceError>::into))
                    .boxed()
            }),
        }
    }

    pub(crate) fn call(&self) -> BoxFuture<'static, Result<T, ResourceError>> {
        (self.inner)()
    }
}

impl<T> Producer<T> {
    /// Returns `true` if both handles wrap the same function instance.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> Clone for Producer<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> PartialEq for Producer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T> Eq for Producer<T> {}

impl<T> fmt::Debug for Producer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer")
            .field("ptr", &Arc::as_ptr(&self.inner).cast::<()>())
            .finish()
    }
}

/// A one-argument async operation run on demand by a mutation.
pub struct Mutator<P, T> {
    inner: Arc<MutatorFn<P, T>>,
}

impl<P: 'static, T: Send + 'static> Mutator<P, T> {
    /// Wraps an async function taking the mutation parameters.
    pub fn new<F, Fut, E>(f: F) -> Self
    where
        F: Fn(P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Into<ResourceError> + 'static,
    {
        Self {
            inner: Arc::new(move |params| {
                f(params)
                    .map(|result| result.map_err(Into::<ResourceError>::into))
                    .boxed()
            }),
        }
    }

    pub(crate) fn call(&self, params: P) -> BoxFuture<'static, Result<T, ResourceError>> {
        (self.inner)(params)
    }
}

impl<P, T> Clone for Mutator<P, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P, T> fmt::Debug for Mutator<P, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mutator")
            .field("ptr", &Arc::as_ptr(&self.inner).cast::<()>())
            .finish()
    }
}
