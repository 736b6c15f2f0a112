//! Mutate-mode resources.
//!
//! A [`Mutation`] runs its [`Mutator`] only when [`Mutation::mutate`] is
//! called. Unlike a [`Resource`](crate::resource::Resource), nothing happens at
//! creation: the state starts as `{data: None, loading: false, error: None}`.
//!
//! Each call reports its outcome twice: it is written to the observable state
//! and it is returned to the caller through the [`Mutate`] handle. The state is
//! updated before the handle resolves, so both channels always agree.
//!
//! A call runs to completion once started, even if the handle or the
//! mutation itself is dropped first.
//!
//! # Example
//!
//! ```rust
//! use loadstate::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let create_key = Mutation::new(Mutator::new(|alias: String| async move {
//!     if alias.is_empty() {
//!         Err(ResourceError::new("alias is required"))
//!     } else {
//!         Ok(format!("sk-{alias}"))
//!     }
//! }));
//!
//! let key = create_key.mutate("reporting".to_string()).await;
//! assert_eq!(key.as_deref(), Ok("sk-reporting"));
//! assert_eq!(create_key.data().as_deref(), Some("sk-reporting"));
//!
//! let err = create_key.mutate(String::new()).await;
//! assert!(err.is_err());
//! assert_eq!(create_key.error(), err.err());
//! # }
//! ```

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::StreamExt;
use futures::stream::BoxStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::WatchStream;

use crate::cell::{StateCell, start, wait_settled};
use crate::error::ResourceError;
use crate::producer::Mutator;
use crate::state::ResourceState;

/// A mutate-mode async resource.
///
/// Dropping the mutation does not abort calls already in flight; their
/// [`Mutate`] handles still resolve with the mutator's result.
#[derive(Debug)]
pub struct Mutation<P, T> {
    mutator: Mutator<P, T>,
    cell: Arc<StateCell<T>>,
}

impl<P, T> Mutation<P, T>
where
    P: 'static,
    T: Clone + Send + Sync + 'static,
{
    /// Creates an idle mutation around the given mutator.
    #[must_use]
    pub fn new(mutator: Mutator<P, T>) -> Self {
        Self {
            mutator,
            cell: StateCell::new(ResourceState::default()),
        }
    }

    /// Runs the mutator with `params`.
    ///
    /// `loading` is set and `error` cleared before this returns. The returned
    /// [`Mutate`] resolves with the mutator's result after it has been recorded
    /// in the state. Dropping the handle does not stop the call.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn mutate(&self, params: P) -> Mutate<T> {
        self.cell.begin();

        let cell = Arc::clone(&self.cell);
        let operation = start(|| self.mutator.call(params));

        let join = tokio::spawn(async move { cell.settle(operation).await });

        Mutate {
            join,
            cell: Arc::clone(&self.cell),
        }
    }

    /// Returns a snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> ResourceState<T> {
        self.cell.snapshot()
    }

    /// Returns the result of the last successful call.
    #[must_use]
    pub fn data(&self) -> Option<T> {
        self.cell.snapshot().data
    }

    /// Returns `true` while a call is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.cell.snapshot().loading
    }

    /// Returns the failure of the most recent call, if it failed.
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
}

/// Handle to one [`Mutation::mutate`] call.
#[derive(Debug)]
#[must_use = "dropping a Mutate does not cancel it; await it to get the result"]
pub struct Mutate<T> {
    join: JoinHandle<Result<T, ResourceError>>,
    cell: Arc<StateCell<T>>,
}

impl<T> Future for Mutate<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Output = Result<T, ResourceError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.join).poll(cx).map(|joined| {
            joined.unwrap_or_else(|_| {
                // The task died without settling (runtime shutdown); keep the
                // state consistent with what the caller receives.
                let err = ResourceError::unknown();
                self.cell.record_failure(&err);
                Err(err)
            })
        })
    }
}
