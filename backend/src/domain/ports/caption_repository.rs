//! Caption artifact persistence port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::UserId;
use crate::domain::generation::CaptionRecord;

/// Errors surfaced by caption storage adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptionStorageError {
    /// The backing store could not be reached.
    #[error("caption store unavailable: {message}")]
    Connection { message: String },
    /// Query or write failed during execution.
    #[error("caption store query failed: {message}")]
    Query { message: String },
}

impl CaptionStorageError {
    /// Helper for connectivity failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Write-once storage for generated caption records.
///
/// Store failures are best-effort from the pipeline's point of view: the
/// orchestrator logs them and still returns the generation to the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CaptionRepository: Send + Sync {
    /// Persist a record; the record id was assigned by the caller.
    async fn store(&self, record: &CaptionRecord) -> Result<(), CaptionStorageError>;

    /// Fetch the user's records, newest first, bounded by `limit`.
    async fn find_by_user(
        &self,
        user_id: &UserId,
        limit: i64,
    ) -> Result<Vec<CaptionRecord>, CaptionStorageError>;
}
