use std::any::type_name;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::ResourceError;
use crate::state::ResourceState;

/// Shared state behind a resource.
///
/// Every transition goes through the watch channel, so observers always see
/// the state after a complete step of the invocation protocol.
#[derive(Debug)]
pub(crate) struct StateCell<T> {
    tx: watch::Sender<ResourceState<T>>,
}

impl<T> StateCell<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub(crate) fn new(initial: ResourceState<T>) -> Arc<Self> {
        let (tx, _) = watch::channel(initial);
        Arc::new(Self { tx })
    }

    pub(crate) fn snapshot(&self) -> ResourceState<T> {
        self.tx.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<ResourceState<T>> {
        self.tx.subscribe()
    }

    /// Start of an invocation: loading on, previous error cleared.
    pub(crate) fn begin(&self) {
        self.tx.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });
        debug!(resource = type_name::<T>(), "invocation started");
    }

    /// Awaits the operation and records its outcome.
    ///
    /// A panicking operation is recorded as [`ResourceError::unknown`].
    pub(crate) async fn settle(
        &self,
        operation: BoxFuture<'static, Result<T, ResourceError>>,
    ) -> Result<T, ResourceError> {
        let outcome = AssertUnwindSafe(operation)
            .catch_unwind()
            .await
            .unwrap_or_else(|_| Err(ResourceError::unknown()));

        match &outcome {
            Ok(value) => {
                self.tx.send_modify(|state| {
                    state.data = Some(value.clone());
                    state.loading = false;
                });
                debug!(resource = type_name::<T>(), "invocation succeeded");
            }
            Err(err) => self.record_failure(err),
        }

        outcome
    }

    /// Records a failure and ends loading; `data` is left as it was.
    pub(crate) fn record_failure(&self, err: &ResourceError) {
        self.tx.send_modify(|state| {
            state.error = Some(err.clone());
            state.loading = false;
        });
        warn!(resource = type_name::<T>(), error = %err, "invocation failed");
    }
}

/// Calls the caller's function to obtain its future.
///
/// A panic raised before the future exists becomes a future that fails with
/// [`ResourceError::unknown`], so it goes through `settle` like any other
/// failure.
pub(crate) fn start<T, F>(call: F) -> BoxFuture<'static, Result<T, ResourceError>>
where
    T: Send + 'static,
    F: FnOnce() -> BoxFuture<'static, Result<T, ResourceError>>,
{
    panic::catch_unwind(AssertUnwindSafe(call))
        .unwrap_or_else(|_| async { Err(ResourceError::unknown()) }.boxed())
}

/// Waits until the observed state is no longer loading.
pub(crate) async fn wait_settled<T: Clone>(
    mut rx: watch::Receiver<ResourceState<T>>,
) -> ResourceState<T> {
    let settled = rx
        .wait_for(|state| !state.loading)
        .await
        .map(|state| state.clone());

    // Err only once the cell is gone; report the last observed value.
    settled.unwrap_or_else(|_| rx.borrow().clone())
}
