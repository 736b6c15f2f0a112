// Shared helpers for integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use loadstate::prelude::*;
use tokio::sync::oneshot;
use tracing_subscriber::EnvFilter;

pub type Outcome<T> = Result<T, ResourceError>;

/// Installs a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Counts how often a producer or mutator was called.
#[derive(Debug, Clone, Default)]
pub struct Calls(Arc<AtomicUsize>);

impl Calls {
    pub fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// A producer whose invocations settle only when the test releases them.
///
/// The n-th call waits on the n-th returned sender.
pub fn gated<T: Send + 'static>(calls: usize) -> (Producer<T>, Vec<oneshot::Sender<Outcome<T>>>) {
    let (senders, receivers): (Vec<_>, VecDeque<_>) =
        (0..calls).map(|_| oneshot::channel::<Outcome<T>>()).unzip();
    let pending = Arc::new(Mutex::new(receivers));

    let producer = Producer::new(move || {
        let rx = pending.lock().ok().and_then(|mut queue| queue.pop_front());
        async move {
            match rx {
                Some(rx) => rx
                    .await
                    .unwrap_or_else(|_| Err(ResourceError::new("gate dropped"))),
                None => Err(ResourceError::new("no gate left")),
            }
        }
    });

    (producer, senders)
}

/// A producer that always resolves to `value` and records its calls.
pub fn counted<T: Clone + Send + Sync + 'static>(value: T, calls: &Calls) -> Producer<T> {
    let calls = calls.clone();
    Producer::new(move || {
        calls.hit();
        let value = value.clone();
        async move { Ok::<_, ResourceError>(value) }
    })
}
