//! Read-mode resources.
//!
//! A [`Resource`] wraps a zero-argument [`Producer`] and keeps the latest
//! `{data, loading, error}` state of its invocations. It runs the producer once
//! at creation (unless skipped), on every [`Resource::refetch`], and whenever
//! [`Resource::refresh_if_changed`] sees a new producer or a lifted skip flag.
//!
//! # Example
//!
//! ```rust
//! use loadstate::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let spend = Resource::new(
//!     Producer::new(|| async { Ok::<_, ResourceError>(1_250.40_f64) }),
//!     ResourceOptions::default(),
//! );
//!
//! // The first invocation is already in flight.
//! assert!(spend.is_loading());
//!
//! let state = spend.settled().await;
//! assert_eq!(state.data, Some(1_250.40));
//! assert!(!state.loading);
//! # }
//! ```
//!
//! # Overlapping invocations
//!
//! Invocations are never cancelled by newer ones. When several are in flight,
//! each writes its outcome as it settles, so the one settling last decides the
//! final `data`/`error`. The first one to settle already clears `loading`.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::StreamExt;
use futures::stream::BoxStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cell::{StateCell, start, wait_settled};
use crate::config::ResourceOptions;
use crate::error::ResourceError;
use crate::producer::Producer;
use crate::state::ResourceState;

/// A read-mode async resource.
///
/// Dropping the resource abandons its in-flight invocations.
#[derive(Debug)]
pub struct Resource<T> {
    producer: Producer<T>,
    skip: bool,
    cell: Arc<StateCell<T>>,
    token: CancellationToken,
}

impl<T> Resource<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates a resource and, unless `options.skip` is set, starts the first
    /// invocation right away.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime while `skip` is `false`.
    pub fn new(producer: Producer<T>, options: ResourceOptions<T>) -> Self {
        let ResourceOptions { initial_data, skip } = options;

        let resource = Self {
            producer,
            skip,
            cell: StateCell::new(ResourceState::idle(initial_data)),
            token: CancellationToken::new(),
        };

        if !skip {
            // Settlement is observed through the state, not the handle.
            drop(resource.refetch());
        }

        resource
    }

    /// Runs the producer again.
    ///
    /// `loading` is set and `error` cleared before this returns. The returned
    /// [`Fetch`] resolves once this invocation has settled; dropping it does not
    /// stop the invocation. An explicit refetch runs even when the resource is
    /// skipped.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn refetch(&self) -> Fetch {
        self.cell.begin();

        let cell = Arc::clone(&self.cell);
        let token = self.token.clone();
        let operation = start(|| self.producer.call());

        let join = tokio::spawn(async move {
            tokio::select! {
                () = token.cancelled() => {
                    debug!("invocation abandoned");
                }
                // Read mode absorbs failures into state.
                _ = cell.settle(operation) => {}
            }
        });

        Fetch { join }
    }

    /// Re-runs the producer if its dependencies changed.
    ///
    /// Call this on every update cycle of the owner with the current producer
    /// and skip flag. An invocation starts when the skip flag was lifted, or
    /// when the producer is a different function instance and the resource is
    /// not skipped. Returns the handle of the started invocation, if any.
    ///
    /// # Panics
    ///
    /// Panics if an invocation starts outside a tokio runtime.
    pub fn refresh_if_changed(&mut self, producer: Producer<T>, skip: bool) -> Option<Fetch> {
        let producer_changed = !self.producer.ptr_eq(&producer);
        let skip_changed = self.skip != skip;

        self.producer = producer;
        self.skip = skip;

        if skip || !(producer_changed || skip_changed) {
            return None;
        }

        debug!(producer_changed, skip_changed, "dependencies changed");
        Some(self.refetch())
    }

    /// Returns a snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> ResourceState<T> {
        self.cell.snapshot()
    }

    /// Returns the last successfully produced (or seeded) value.
    #[must_use]
    pub fn data(&self) -> Option<T> {
        self.cell.snapshot().data
    }

    /// Returns `true` while an invocation is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.cell.snapshot().loading
    }

    /// Returns the failure of the most recent invocation, if it failed.
    #[must_use]
    pub fn error(&self) -> Option<ResourceError> {
        self.cell.snapshot().error
    }

    /// Returns a receiver that observes every state transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ResourceState<T>> {
        self.cell.subscribe()
    }

    /// Returns a stream of states, starting with the current one.
    #[must_use]
    pub fn watch(&self) -> BoxStream<'static, ResourceState<T>> {
        WatchStream::new(self.cell.subscribe()).boxed()
    }

    /// Waits until nothing is loading and returns the state at that point.
    pub async fn settled(&self) -> ResourceState<T> {
        wait_settled(self.cell.subscribe()).await
    }

    /// Returns the current producer.
    #[must_use]
    pub const fn producer(&self) -> &Producer<T> {
        &self.producer
    }

    /// Returns `true` if automatic invocation is suppressed.
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        self.skip
    }
}

impl<T> Drop for Resource<T> {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Handle to one invocation of a [`Resource`].
///
/// Resolves once the invocation has settled or was abandoned.
#[derive(Debug)]
#[must_use = "dropping a Fetch does not cancel it; await it to observe settlement"]
pub struct Fetch {
    join: JoinHandle<()>,
}

impl Future for Fetch {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        Pin::new(&mut self.join).poll(cx).map(|_| ())
    }
}
