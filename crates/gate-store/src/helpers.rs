//! Row-to-record parsing helpers.
//!
//! Rows written by other stations may carry `SQLite`'s `datetime('now')`
//! format instead of RFC 3339, so both are accepted.

use chrono::{DateTime, Utc};

use crate::error::StoreError;

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00.000Z"`) and `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `StoreError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| StoreError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse a TEXT column into a serde-deserializable enum.
///
/// # Errors
///
/// Returns `StoreError::Query` if the string does not match any enum variant.
pub fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, StoreError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| StoreError::Query(format!("Failed to parse enum from '{s}': {e}")))
}

/// Read a nullable TEXT column, mapping SQL NULL to an empty string.
///
/// # Errors
///
/// Returns `StoreError` if the column read fails.
pub fn get_string_or_empty(row: &libsql::Row, idx: i32) -> Result<String, StoreError> {
    Ok(row.get::<Option<String>>(idx)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use gate_core::enums::Outcome;

    use super::*;

    #[test]
    fn parses_rfc3339_and_sqlite_formats() {
        let a = parse_datetime("2026-02-09T14:30:00.250Z").unwrap();
        assert_eq!(a.timestamp_millis(), 1_770_647_400_250);

        let b = parse_datetime("2026-02-09 14:30:00").unwrap();
        assert_eq!(b.timestamp(), 1_770_647_400);
    }

    #[test]
    fn rejects_garbage_datetime() {
        assert!(matches!(
            parse_datetime("yesterday"),
            Err(StoreError::Query(_))
        ));
    }

    #[test]
    fn parses_outcome_column() {
        let outcome: Outcome = parse_enum("EXPIRED").unwrap();
        assert_eq!(outcome, Outcome::Expired);
        assert!(parse_enum::<Outcome>("granted").is_err());
    }
}
