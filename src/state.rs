//! Observable resource state.

use crate::error::ResourceError;

/// Coarse classification of a [`ResourceState`].
///
/// A resource cycles `Idle -> Loading -> {Success | Failed} -> Loading -> ...`
/// with no terminal phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing in flight and no data or error recorded.
    Idle,
    /// An invocation is in flight.
    Loading,
    /// The last settled invocation succeeded, or data was seeded.
    Success,
    /// The last settled invocation failed.
    Failed,
}

/// A snapshot of a resource's `{data, loading, error}` state.
///
/// `data` survives failures and re-invocations; only a successful invocation
/// replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceState<T> {
    /// The last successfully produced value.
    pub data: Option<T>,
    /// Whether an invocation is in flight.
    pub loading: bool,
    /// The failure of the most recent invocation, if it failed.
    pub error: Option<ResourceError>,
}

impl<T> ResourceState<T> {
    /// State of a resource that has not been invoked.
    #[must_use]
    pub const fn idle(data: Option<T>) -> Self {
        Self {
            data,
            loading: false,
            error: None,
        }
    }

    /// Returns the data, if any.
    pub const fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Returns the recorded error, if any.
    pub const fn error(&self) -> Option<&ResourceError> {
        self.error.as_ref()
    }

    /// Returns `true` if an invocation is in flight.
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Returns `true` if the most recent invocation failed.
    pub const fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Returns `true` if data is available and nothing is pending or failed.
    pub const fn is_success(&self) -> bool {
        matches!(self.phase(), Phase::Success)
    }

    /// Classifies this snapshot.
    pub const fn phase(&self) -> Phase {
        if self.loading {
            Phase::Loading
        } else if self.error.is_some() {
            Phase::Failed
        } else if self.data.is_some() {
            Phase::Success
        } else {
            Phase::Idle
        }
    }
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self::idle(None)
    }
}
