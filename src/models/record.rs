use chrono::{DateTime, FixedOffset};

/// One parsed access-log line. Immutable once parsed; records that fail the
/// line regex or the timestamp format never become a `LogRecord`.
#[derive(Clone, Debug)]
pub struct LogRecord {
    pub ip: String,
    /// Request time with the log's original UTC offset preserved.
    pub timestamp: DateTime<FixedOffset>,
    pub method: String,
    pub url: String,
    pub status: u16,
    pub referrer: String,
    pub user_agent: String,
}
