//! PostgreSQL-backed `ProfileQuery` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{ProfileQuery, ProfileStoreError};
use crate::domain::{SubscriptionTier, UserId, UserProfile};

use super::models::ProfileRow;
use super::pool::{DbPool, PoolError};
use super::schema::profiles;

/// Diesel-backed implementation of the `ProfileQuery` port.
#[derive(Clone)]
pub struct DieselProfileQuery {
    pool: DbPool,
}

impl DieselProfileQuery {
    /// Create a new query adapter with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain profile store errors.
fn map_pool_error(error: PoolError) -> ProfileStoreError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ProfileStoreError::connection(message)
        }
    }
}

/// Map Diesel errors to domain profile store errors.
fn map_diesel_error(error: diesel::result::Error) -> ProfileStoreError {
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
            ProfileStoreError::connection("database connection error")
        }
        _ => ProfileStoreError::query("database error"),
    }
}

/// Convert a database row to a domain profile.
fn row_to_profile(row: ProfileRow) -> UserProfile {
    UserProfile {
        id: UserId::from_uuid(row.id),
        credits_remaining: row.credits_remaining,
        subscription_tier: SubscriptionTier::from_label(&row.subscription_tier),
    }
}

#[async_trait]
impl ProfileQuery for DieselProfileQuery {
    async fn fetch(&self, user_id: &UserId) -> Result<Option<UserProfile>, ProfileStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ProfileRow> = profiles::table
            .filter(profiles::id.eq(user_id.as_uuid()))
            .select(ProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_profile))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-database conversion helpers.
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    #[rstest]
    #[case("pro", SubscriptionTier::Pro)]
    #[case("free", SubscriptionTier::Free)]
    #[case("platinum", SubscriptionTier::Free)]
    fn converts_tier_labels(#[case] label: &str, #[case] expected: SubscriptionTier) {
        let profile = row_to_profile(ProfileRow {
            id: Uuid::new_v4(),
            credits_remaining: 7,
            subscription_tier: label.to_owned(),
        });

        assert_eq!(profile.subscription_tier, expected);
        assert_eq!(profile.credits_remaining, 7);
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let error = map_pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(error, ProfileStoreError::Connection { .. }));
    }
}
