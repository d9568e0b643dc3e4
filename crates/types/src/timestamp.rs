//! RFC 3339 timestamp helpers.
//!
//! All timestamps on the wire and inside signed material are RFC 3339 UTC
//! strings. What was signed is what is stored, so signed structures carry
//! the formatted string rather than a parsed value.

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Returns the current time formatted as an RFC 3339 UTC string.
pub fn now_rfc3339() -> String {
    // Formatting a UTC OffsetDateTime with the well-known description
    // cannot fail.
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| String::from("1970-01-01T00:00:00Z"))
}

/// Returns the current time as whole seconds since the Unix epoch.
pub fn now_unix() -> u64 {
    let now = OffsetDateTime::now_utc().unix_timestamp();
    u64::try_from(now).unwrap_or(0)
}

/// Parses an RFC 3339 string into seconds since the Unix epoch.
pub fn parse_rfc3339_unix(s: &str) -> Result<i64, String> {
    OffsetDateTime::parse(s, &Rfc3339)
        .map(|t| t.unix_timestamp())
        .map_err(|e| format!("invalid RFC 3339 timestamp: {}", e))
}

/// Formats seconds since the Unix epoch as an RFC 3339 UTC string.
pub fn unix_to_rfc3339(secs: i64) -> String {
    OffsetDateTime::from_unix_timestamp(secs)
        .ok()
        .and_then(|t| t.format(&Rfc3339).ok())
        .unwrap_or_else(|| String::from("1970-01-01T00:00:00Z"))
}

/// Returns true when two instants are within `skew_secs` of each other.
pub fn within_skew(a_unix: i64, b_unix: i64, skew_secs: u64) -> bool {
    a_unix.abs_diff(b_unix) <= skew_secs
}
