use std::error::Error as StdError;
use std::io;

use thiserror::Error;

const UNKNOWN_ERROR: &str = "Unknown error";

/// Error type for resource operations.
///
/// Every failure of a producer or mutator is recorded as
/// [`ResourceError::OperationFailed`], so the `error` field of a resource
/// always has the same shape regardless of what the operation failed with.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// The wrapped producer or mutator failed.
    #[error("{message}")]
    OperationFailed {
        /// Human readable description of the failure.
        message: String,
    },
}

impl ResourceError {
    /// Creates an error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self::OperationFailed {
            message: message.into(),
        }
    }

    /// Creates the normalized error used when an operation fails without a
    /// usable error value (for example, when it panics).
    #[must_use]
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_ERROR)
    }

    /// Returns the failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::OperationFailed { message } => message,
        }
    }
}

impl From<String> for ResourceError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for ResourceError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<io::Error> for ResourceError {
    fn from(err: io::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<Box<dyn StdError + Send + Sync>> for ResourceError {
    fn from(err: Box<dyn StdError + Send + Sync>) -> Self {
        Self::new(err.to_string())
    }
}
