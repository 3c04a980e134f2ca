//! # Parser Module
//!
//! Reads a combined-format access log into `LogRecord`s.
//!
//! Lines that do not match the log format, or whose timestamp fails to
//! parse, are skipped without comment; only I/O failures abort the run.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::models::LogRecord;

// Combined/extended format:
// IP - - [timestamp] "METHOD url PROTOCOL" status size "referrer" "user-agent"
static LOG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(?P<ip>\S+) - - \[(?P<ts>[^\]]+)\] "(?P<method>\w+) (?P<url>\S+) HTTP/[0-9.]+" (?P<status>\d+) \d+ "(?P<ref>[^"]*)" "(?P<ua>[^"]*)""#,
    )
    .unwrap()
});

const TIMESTAMP_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Parse one access-log line. Returns `None` for anything that does not
/// match the combined format or carries an unparseable timestamp.
pub fn parse_line(line: &str) -> Option<LogRecord> {
    let caps = LOG_RE.captures(line)?;
    let timestamp = DateTime::parse_from_str(&caps["ts"], TIMESTAMP_FORMAT).ok()?;
    let status: u16 = caps["status"].parse().ok()?;

    Some(LogRecord {
        ip: caps["ip"].to_string(),
        timestamp,
        method: caps["method"].to_string(),
        url: normalize_url(&caps["url"]),
        status,
        referrer: caps["ref"].to_string(),
        user_agent: caps["ua"].to_string(),
    })
}

/// Strip a trailing `index.html` so `/` and `/index.html` count as one page.
pub fn normalize_url(url: &str) -> String {
    url.strip_suffix("index.html").unwrap_or(url).to_string()
}

/// Load every parseable record at or after `cutoff` from the log file.
pub fn load_records(path: &Path, cutoff: DateTime<Utc>) -> Result<Vec<LogRecord>> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            log::error!("failed to open log file {}: {e}", path.display());
            return Err(e).with_context(|| format!("open {}", path.display()));
        }
    };

    let mut records = Vec::new();
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        // Logs scraped by scanners can carry raw bytes; decode lossily so a
        // garbled line is skipped instead of killing the whole run.
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                log::error!("failed to read log file {}: {e}", path.display());
                return Err(e).with_context(|| format!("read {}", path.display()));
            }
        }
        let line = String::from_utf8_lossy(&buf);
        if let Some(rec) = parse_line(line.trim_end_matches(['\r', '\n'])) {
            if rec.timestamp.with_timezone(&Utc) >= cutoff {
                records.push(rec);
            }
        }
    }
    records.sort_by_key(|r| r.timestamp);
    Ok(records)
}
