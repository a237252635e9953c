//! PostgreSQL-backed `CreditLedger` implementation using Diesel.
//!
//! The commit path is the race-sensitive part of the whole pipeline: it must
//! be a single conditional `UPDATE` so two concurrent generations can never
//! both spend the last credit. The check path is advisory only and reads the
//! balance without locking.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::UserId;
use crate::domain::ports::{CreditCheck, CreditLedger, CreditLedgerError};

use super::pool::{DbPool, PoolError};
use super::schema::profiles;

/// Diesel-backed implementation of the `CreditLedger` port.
#[derive(Clone)]
pub struct DieselCreditLedger {
    pool: DbPool,
}

impl DieselCreditLedger {
    /// Create a new ledger with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain credit ledger errors.
fn map_pool_error(error: PoolError) -> CreditLedgerError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            CreditLedgerError::unavailable(message)
        }
    }
}

/// Map Diesel errors to domain credit ledger errors.
fn map_diesel_error(error: diesel::result::Error) -> CreditLedgerError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            CreditLedgerError::unavailable("database connection error")
        }
        _ => CreditLedgerError::query("database error"),
    }
}

#[async_trait]
impl CreditLedger for DieselCreditLedger {
    async fn check(&self, user_id: &UserId) -> Result<CreditCheck, CreditLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let balance: Option<i32> = profiles::table
            .filter(profiles::id.eq(user_id.as_uuid()))
            .select(profiles::credits_remaining)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        let balance =
            balance.ok_or_else(|| CreditLedgerError::query(format!("no profile for {user_id}")))?;
        Ok(CreditCheck {
            allowed: balance > 0,
            balance,
        })
    }

    async fn commit(&self, user_id: &UserId) -> Result<i32, CreditLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Decrement-if-positive in one statement. A zero-row result means a
        // concurrent commit drained the balance after our check.
        let remaining: Option<i32> = diesel::update(
            profiles::table
                .filter(profiles::id.eq(user_id.as_uuid()))
                .filter(profiles::credits_remaining.gt(0)),
        )
        .set(profiles::credits_remaining.eq(profiles::credits_remaining - 1))
        .returning(profiles::credits_remaining)
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        remaining.ok_or(CreditLedgerError::Exhausted { user_id: *user_id })
    }
}
