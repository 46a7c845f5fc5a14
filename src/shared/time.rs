//! Timestamp normalization.
//!
//! Charge points send timestamps in several shapes (`Z`, explicit offset, no
//! offset at all). Every persisted timestamp is normalized to UTC; an
//! unparsable or missing timestamp falls back to the server's current UTC
//! time and logs a warning (§9).

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;

/// Parses `raw` as a timestamp and converts to UTC. Falls back to `Utc::now()`
/// and logs a warning if `raw` is `None` or unparsable.
pub fn normalize_or_now(raw: Option<&str>, context: &str) -> DateTime<Utc> {
    match raw {
        Some(s) => parse_flexible(s).unwrap_or_else(|| {
            warn!(context, raw = s, "unparsable timestamp, falling back to server time");
            Utc::now()
        }),
        None => {
            warn!(context, "missing timestamp, falling back to server time");
            Utc::now()
        }
    }
}

/// Parses an OCPP timestamp string that may carry a `Z` suffix, an explicit
/// numeric offset, or no offset at all (treated as UTC).
pub fn parse_flexible(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // No offset at all — assume UTC.
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_z_suffix() {
        let dt = parse_flexible("2024-03-01T12:00:00Z").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-03-01T12:00:00+00:00");
    }

    #[test]
    fn parses_explicit_offset() {
        let dt = parse_flexible("2024-03-01T12:00:00+02:00").unwrap();
        assert_eq!(dt, DateTime::parse_from_rfc3339("2024-03-01T10:00:00Z").unwrap());
    }

    #[test]
    fn parses_missing_offset_as_utc() {
        let dt = parse_flexible("2024-03-01T12:00:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-03-01T12:00:00+00:00");
    }

    #[test]
    fn falls_back_on_missing() {
        let dt = normalize_or_now(None, "test");
        assert!(dt <= Utc::now());
    }
}
