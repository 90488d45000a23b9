//! Small shared helpers

/// Trims a string and returns `None` when nothing is left.
#[must_use]
pub fn normalize_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Normalizes optional user-provided text by trimming whitespace.
#[must_use]
pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    value.as_deref().and_then(normalize_text)
}

/// Returns true when the value looks like an HTTP(S) URL.
#[must_use]
pub fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Collapses whitespace runs so response bodies log as a single line.
#[must_use]
pub fn compact_text(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Current unix timestamp in seconds.
#[must_use]
pub fn unix_timestamp_now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Current unix timestamp in milliseconds, the resolution records are
/// stamped with.
#[must_use]
pub fn unix_timestamp_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
