//! PostgreSQL-backed `UsageLog` implementation using Diesel.

use async_trait::async_trait;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::generation::UsageLogEntry;
use crate::domain::ports::{UsageLog, UsageLogError};

use super::models::NewUsageLogRow;
use super::pool::{DbPool, PoolError};
use super::schema::usage_logs;

/// Diesel-backed implementation of the `UsageLog` port.
#[derive(Clone)]
pub struct DieselUsageLog {
    pool: DbPool,
}

impl DieselUsageLog {
    /// Create a new log with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain usage log errors.
fn map_pool_error(error: PoolError) -> UsageLogError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UsageLogError::connection(message)
        }
    }
}

/// Map Diesel errors to domain usage log errors.
fn map_diesel_error(error: diesel::result::Error) -> UsageLogError {
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
            UsageLogError::connection("database connection error")
        }
        _ => UsageLogError::write("database error"),
    }
}

#[async_trait]
impl UsageLog for DieselUsageLog {
    async fn append(&self, entry: &UsageLogEntry) -> Result<(), UsageLogError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewUsageLogRow {
            id: Uuid::new_v4(),
            user_id: *entry.user_id.as_uuid(),
            action: &entry.action,
            metadata: &entry.metadata,
            created_at: entry.created_at,
        };

        diesel::insert_into(usage_logs::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
