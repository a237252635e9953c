//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{captions, profiles, usage_logs};

/// Row struct for reading from the profiles table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProfileRow {
    pub id: Uuid,
    pub credits_remaining: i32,
    pub subscription_tier: String,
}

/// Row struct for reading from the captions table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = captions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CaptionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content_type: String,
    pub slide_count: i32,
    pub topic: String,
    pub tone: String,
    pub target_audience: Option<String>,
    #[diesel(column_name = caption_texts)]
    pub captions: serde_json::Value,
    pub hashtags: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating caption records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = captions)]
pub(crate) struct NewCaptionRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content_type: &'a str,
    pub slide_count: i32,
    pub topic: &'a str,
    pub tone: &'a str,
    pub target_audience: Option<&'a str>,
    #[diesel(column_name = caption_texts)]
    pub captions: &'a serde_json::Value,
    pub hashtags: &'a serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for appending usage log entries.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = usage_logs)]
pub(crate) struct NewUsageLogRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub action: &'a str,
    pub metadata: &'a serde_json::Value,
    pub created_at: DateTime<Utc>,
}
