use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// A visit session: a maximal run of one IP's requests where consecutive
/// timestamps are at most 30 minutes apart.
#[derive(Clone, Debug, Serialize)]
pub struct Session {
    pub ip: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    /// First URL requested in the session.
    pub landing_page: String,
    /// Referrer of the first request in the session.
    pub referrer: String,
    /// Number of requests in the session.
    pub hits: usize,
}

impl Session {
    /// Session length in minutes. Single-request sessions have duration 0.
    pub fn duration_minutes(&self) -> f64 {
        (self.end - self.start).num_seconds() as f64 / 60.0
    }
}
