//! Credit ledger port: the race-safe view of a user's remaining credits.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::UserId;

/// Outcome of a pre-generation credit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreditCheck {
    /// False when the balance is already zero.
    pub allowed: bool,
    /// Balance observed at check time; may be stale by commit time.
    pub balance: i32,
}

/// Errors surfaced by credit ledger adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreditLedgerError {
    /// The backing store could not be reached.
    #[error("credit ledger unavailable: {message}")]
    Unavailable { message: String },
    /// Query or mutation failed during execution.
    #[error("credit ledger query failed: {message}")]
    Query { message: String },
    /// The conditional decrement found no remaining credit: a concurrent
    /// commit raced this one to zero. The generation must stay unbilled.
    #[error("credit commit raced to zero for user {user_id}")]
    Exhausted { user_id: UserId },
}

impl CreditLedgerError {
    /// Helper for connectivity failures.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
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

/// Authoritative check-and-commit credit operations.
///
/// `commit` must be a single conditional mutation at the storage layer
/// (decrement-if-positive); a read-then-write pair reintroduces the
/// double-spend race this port exists to close.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CreditLedger: Send + Sync {
    /// Report whether the user may start a generation.
    async fn check(&self, user_id: &UserId) -> Result<CreditCheck, CreditLedgerError>;

    /// Atomically deduct one credit, returning the new balance.
    async fn commit(&self, user_id: &UserId) -> Result<i32, CreditLedgerError>;
}
