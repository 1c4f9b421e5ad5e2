//! Time helpers
//!
//! All persisted timestamps are RFC 3339 in UTC with millisecond
//! precision, so string ordering matches time ordering.

use chrono::{DateTime, SecondsFormat, Utc};

/// Current time as the canonical persisted string
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Normalize a client-supplied RFC 3339 timestamp to the canonical form
pub fn normalize_rfc3339(value: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_offsets_to_utc() {
        let normalized = normalize_rfc3339("2026-09-01T12:00:00+02:00").unwrap();
        assert_eq!(normalized, "2026-09-01T10:00:00.000Z");
    }

    #[test]
    fn rejects_garbage() {
        assert!(normalize_rfc3339("next tuesday").is_none());
    }
}
