//! # Sessions Module
//!
//! Groups filtered records into visit sessions: per IP, a new session starts
//! whenever the inactivity gap exceeds 30 minutes.

use std::collections::HashMap;

use crate::models::{LogRecord, Session};

/// Inactivity threshold. A gap of exactly 30 minutes does NOT split.
pub const SESSION_GAP_SECONDS: i64 = 30 * 60;

/// Partition records into sessions, per IP, splitting at gaps strictly
/// greater than 30 minutes. Input order does not matter; records are sorted
/// by timestamp within each IP. The result is ordered by session start.
pub fn build_sessions(records: &[LogRecord]) -> Vec<Session> {
    let mut by_ip: HashMap<&str, Vec<&LogRecord>> = HashMap::new();
    for rec in records {
        by_ip.entry(rec.ip.as_str()).or_default().push(rec);
    }

    let mut sessions = Vec::new();
    for (_, mut recs) in by_ip {
        recs.sort_by_key(|r| r.timestamp);

        let mut run: Vec<&LogRecord> = Vec::new();
        for rec in recs {
            if let Some(last) = run.last() {
                let gap = (rec.timestamp - last.timestamp).num_seconds();
                if gap > SESSION_GAP_SECONDS {
                    sessions.push(close_session(&run));
                    run.clear();
                }
            }
            run.push(rec);
        }
        if !run.is_empty() {
            sessions.push(close_session(&run));
        }
    }

    sessions.sort_by_key(|s| s.start);
    sessions
}

fn close_session(run: &[&LogRecord]) -> Session {
    let first = run[0];
    let last = run[run.len() - 1];
    Session {
        ip: first.ip.clone(),
        start: first.timestamp,
        end: last.timestamp,
        landing_page: first.url.clone(),
        referrer: first.referrer.clone(),
        hits: run.len(),
    }
}
