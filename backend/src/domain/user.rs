//! User identity and account profile data model.
//!
//! Identity issuance lives outside this service; the domain only deals in
//! verified user identifiers and the credit-bearing profile attached to them.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Validation errors returned by [`UserId::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserIdError {
    Empty,
    Invalid,
}

impl fmt::Display for UserIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "user id must not be empty"),
            Self::Invalid => write!(f, "user id must be a valid UUID"),
        }
    }
}

impl std::error::Error for UserIdError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserIdError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(UserIdError::Empty);
        }
        if raw.trim() != raw {
            return Err(UserIdError::Invalid);
        }
        let parsed = Uuid::parse_str(raw).map_err(|_| UserIdError::Invalid)?;
        Ok(Self(parsed))
    }

    /// Wrap an already-parsed UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Entitlement tier attached to a user profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionTier {
    Free,
    Pro,
}

impl SubscriptionTier {
    /// Map a stored tier label, defaulting unknown values to `Free`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "pro" => Self::Pro,
            _ => Self::Free,
        }
    }

    /// Stable label used in storage and API payloads.
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Pro => "pro",
        }
    }
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Account profile owned by the account subsystem.
///
/// The generation pipeline only reads this and conditionally decrements
/// `credits_remaining` through the credit ledger port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub credits_remaining: i32,
    pub subscription_tier: SubscriptionTier,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn user_id_rejects_empty_input() {
        assert_eq!(UserId::new("").expect_err("empty"), UserIdError::Empty);
    }

    #[rstest]
    #[case("not-a-uuid")]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    #[case("3fa85f64-5717-4562-b3fc-2c963f66afa6 ")]
    fn user_id_rejects_malformed_input(#[case] raw: &str) {
        assert_eq!(UserId::new(raw).expect_err("invalid"), UserIdError::Invalid);
    }

    #[rstest]
    fn user_id_round_trips_through_serde() {
        let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
        let json = serde_json::to_string(&id).expect("serializes");
        assert_eq!(json, "\"3fa85f64-5717-4562-b3fc-2c963f66afa6\"");
        let back: UserId = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(back, id);
    }

    #[rstest]
    #[case("free", SubscriptionTier::Free)]
    #[case("pro", SubscriptionTier::Pro)]
    #[case("enterprise", SubscriptionTier::Free)]
    fn tier_label_mapping_defaults_to_free(#[case] label: &str, #[case] expected: SubscriptionTier) {
        assert_eq!(SubscriptionTier::from_label(label), expected);
    }
}
