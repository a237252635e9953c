//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.

diesel::table! {
    /// Account profiles carrying the credit balance.
    ///
    /// The `id` column is the primary key and matches the authenticated
    /// user id. `credits_remaining` is only ever mutated by the conditional
    /// decrement in the credit ledger adapter.
    profiles (id) {
        /// Primary key: the user's UUID.
        id -> Uuid,
        /// Credits still available for generation, never below zero.
        credits_remaining -> Int4,
        /// Plan label, e.g. "free" or "pro".
        subscription_tier -> Text,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Generated caption sets, one row per successful generation.
    captions (id) {
        /// Primary key: assigned by the pipeline before the insert.
        id -> Uuid,
        /// Owning user.
        user_id -> Uuid,
        /// Requested content type, e.g. "carousel".
        content_type -> Text,
        /// Requested slide count, within the validated range.
        slide_count -> Int4,
        /// Normalized topic text.
        topic -> Text,
        /// Tone the prompt was built with.
        tone -> Text,
        /// Caller-supplied audience, if any.
        target_audience -> Nullable<Text>,
        /// JSON array of caption strings.
        #[sql_name = "captions"]
        caption_texts -> Jsonb,
        /// JSON array of hashtag strings.
        hashtags -> Jsonb,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only usage audit trail.
    usage_logs (id) {
        /// Primary key: assigned at insert time.
        id -> Uuid,
        /// User the action was billed to.
        user_id -> Uuid,
        /// Action label, e.g. "generate".
        action -> Text,
        /// Free-form JSON describing the action.
        metadata -> Jsonb,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}
