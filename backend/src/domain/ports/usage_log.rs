//! Append-only usage audit port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::generation::UsageLogEntry;

/// Errors surfaced by usage log adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageLogError {
    /// The backing store could not be reached.
    #[error("usage log unavailable: {message}")]
    Connection { message: String },
    /// The append failed during execution.
    #[error("usage log write failed: {message}")]
    Write { message: String },
}

impl UsageLogError {
    /// Helper for connectivity failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for write failures.
    pub fn write(message: impl Into<String>) -> Self {
        Self::Write {
            message: message.into(),
        }
    }
}

/// Record one audit entry per attempt that reaches the logging step.
/// Failures are logged by the orchestrator and never propagated.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsageLog: Send + Sync {
    async fn append(&self, entry: &UsageLogEntry) -> Result<(), UsageLogError>;
}
