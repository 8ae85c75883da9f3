//! # Date Handling Utilities
//!
//! Timestamp tokens substituted into write-action response templates.

use chrono::{DateTime, Utc};

/// Formats a UTC instant as a 14-digit `YYYYMMDDHHMMSS` token.
///
/// # Example
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use sandbox_util::format_compact_timestamp;
///
/// let instant = Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();
/// assert_eq!(format_compact_timestamp(instant), "20260304050607");
/// ```
pub fn format_compact_timestamp(instant: DateTime<Utc>) -> String {
    instant.format("%Y%m%d%H%M%S").to_string()
}

/// Current UTC time as a compact timestamp token.
pub fn compact_timestamp() -> String {
    format_compact_timestamp(Utc::now())
}
