//! Domain-specific argument parsing helpers

use chrono::DateTime;

use crate::errors::AppError;

/// Validates an RFC3339 timestamp and hands back the verbatim text. The
/// stored value must stay textually identical to the caller's input, so the
/// parsed representation is discarded.
pub fn parse_created_date(value: &str) -> Result<&str, AppError> {
    DateTime::parse_from_rfc3339(value).map_err(|_| {
        AppError::bad_request(
            "invalid_created_date",
            "createdDate must be an RFC3339 timestamp",
        )
    })?;

    Ok(value)
}

pub fn parse_todo_id(value: &str) -> Option<i64> {
    value.parse::<i64>().ok()
}
