//! PostgreSQL-backed `CaptionRepository` implementation using Diesel.
//!
//! Caption and hashtag lists are stored as JSONB arrays, matching the shape
//! the pipeline parsed out of the provider reply.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::UserId;
use crate::domain::generation::CaptionRecord;
use crate::domain::ports::{CaptionRepository, CaptionStorageError};

use super::models::{CaptionRow, NewCaptionRow};
use super::pool::{DbPool, PoolError};
use super::schema::captions;

/// Diesel-backed implementation of the `CaptionRepository` port.
#[derive(Clone)]
pub struct DieselCaptionRepository {
    pool: DbPool,
}

impl DieselCaptionRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain caption storage errors.
fn map_pool_error(error: PoolError) -> CaptionStorageError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            CaptionStorageError::connection(message)
        }
    }
}

/// Map Diesel errors to domain caption storage errors.
fn map_diesel_error(error: diesel::result::Error) -> CaptionStorageError {
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
            CaptionStorageError::connection("database connection error")
        }
        _ => CaptionStorageError::query("database error"),
    }
}

/// Convert a database row to a domain caption record.
fn row_to_record(row: CaptionRow) -> Result<CaptionRecord, CaptionStorageError> {
    let slide_count = u8::try_from(row.slide_count)
        .map_err(|_| CaptionStorageError::query("stored slide_count out of range"))?;
    let captions: Vec<String> = serde_json::from_value(row.captions)
        .map_err(|_| CaptionStorageError::query("stored captions are not a string array"))?;
    let hashtags: Vec<String> = serde_json::from_value(row.hashtags)
        .map_err(|_| CaptionStorageError::query("stored hashtags are not a string array"))?;

    Ok(CaptionRecord {
        id: row.id,
        user_id: UserId::from_uuid(row.user_id),
        content_type: row.content_type,
        slide_count,
        topic: row.topic,
        tone: row.tone,
        target_audience: row.target_audience,
        captions,
        hashtags,
        created_at: row.created_at,
    })
}

#[async_trait]
impl CaptionRepository for DieselCaptionRepository {
    async fn store(&self, record: &CaptionRecord) -> Result<(), CaptionStorageError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let captions_json = serde_json::Value::from(record.captions.clone());
        let hashtags_json = serde_json::Value::from(record.hashtags.clone());
        let new_row = NewCaptionRow {
            id: record.id,
            user_id: *record.user_id.as_uuid(),
            content_type: &record.content_type,
            slide_count: i32::from(record.slide_count),
            topic: &record.topic,
            tone: &record.tone,
            target_audience: record.target_audience.as_deref(),
            captions: &captions_json,
            hashtags: &hashtags_json,
            created_at: record.created_at,
        };

        diesel::insert_into(captions::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_user(
        &self,
        user_id: &UserId,
        limit: i64,
    ) -> Result<Vec<CaptionRecord>, CaptionStorageError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CaptionRow> = captions::table
            .filter(captions::user_id.eq(user_id.as_uuid()))
            .order(captions::created_at.desc())
            .limit(limit)
            .select(CaptionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_record).collect()
    }
}
