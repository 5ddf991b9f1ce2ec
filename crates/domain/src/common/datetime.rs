//! DateTime parsing utilities with consistent error handling.

use chrono::{DateTime, TimeZone, Utc};

/// Parses an RFC3339 timestamp string, returning an error if parsing fails.
///
/// # Examples
///
/// ```
/// use fabula_domain::common::parse_datetime;
/// use chrono::Datelike;
///
/// let dt = parse_datetime("2024-01-15T10:30:00Z").unwrap();
/// assert_eq!(dt.year(), 2024);
/// ```
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
}

/// Parses a stored timestamp: RFC3339 first, then integer epoch milliseconds.
///
/// Older message rows were written by clients that sent `Date.now()` values,
/// so both forms exist in storage. Anything else is rejected.
///
/// ```
/// use fabula_domain::common::parse_stored_timestamp;
///
/// let a = parse_stored_timestamp("2024-01-15T10:30:00Z").unwrap();
/// let b = parse_stored_timestamp("1705314600000").unwrap();
/// assert_eq!(a, b);
/// assert!(parse_stored_timestamp("yesterday").is_none());
/// ```
pub fn parse_stored_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let trimmed = s.trim();
    if let Ok(dt) = parse_datetime(trimmed) {
        return Some(dt);
    }
    trimmed
        .parse::<i64>()
        .ok()
        .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
}
