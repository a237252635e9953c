//! Read-only access to account profiles.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{UserId, UserProfile};

/// Errors surfaced by profile store adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileStoreError {
    /// The backing store could not be reached.
    #[error("profile store unavailable: {message}")]
    Connection { message: String },
    /// Query failed during execution.
    #[error("profile store query failed: {message}")]
    Query { message: String },
}

impl ProfileStoreError {
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

/// Fetch the credit-bearing profile for a verified user id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileQuery: Send + Sync {
    async fn fetch(&self, user_id: &UserId) -> Result<Option<UserProfile>, ProfileStoreError>;
}
