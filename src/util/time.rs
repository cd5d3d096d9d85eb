use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};

/// Current time as ISO-8601 UTC text with milliseconds, e.g. `2025-01-02T03:04:05.678Z`.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored timestamp. Returns None for missing or malformed text.
pub fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s.trim()).ok()
}

/// Short date for listings (`2025-01-02`), or the raw text when unparsable.
pub fn short_date(s: &str) -> String {
    match parse_timestamp(s) {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => s.to_string(),
    }
}
