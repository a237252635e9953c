//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::Error;

/// Error for a required field the caller omitted.
pub(crate) fn missing_field_error(field: &'static str) -> Error {
    Error::invalid_request(format!("missing required field: {field}")).with_details(json!({
        "field": field,
        "code": "missing_field",
    }))
}

/// Error for a field whose value failed validation.
pub(crate) fn invalid_field_error(
    field: &'static str,
    value: impl Into<String>,
    message: impl Into<String>,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "value": value.into(),
        "code": "invalid_value",
    }))
}
