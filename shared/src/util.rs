/// Current UTC timestamp (milliseconds)
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a new random resource ID (UUID v4, hyphenated)
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Milliseconds in one minute
pub const MILLIS_PER_MINUTE: i64 = 60_000;

/// Convert a whole number of minutes to milliseconds
pub fn minutes_to_millis(minutes: i64) -> i64 {
    minutes.saturating_mul(MILLIS_PER_MINUTE)
}
