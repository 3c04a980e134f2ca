use chrono::{TimeZone, Utc};
use std::io::Write;
use traffic_dashboard::parser::{load_records, normalize_url, parse_line};

const VALID_LINE: &str = r#"203.0.113.7 - - [12/May/2025:14:03:22 +0200] "GET /rooms/ HTTP/1.1" 200 5123 "https://duckduckgo.com/" "Mozilla/5.0 (X11; Linux x86_64)""#;

#[test]
fn parses_a_combined_format_line() {
    let rec = parse_line(VALID_LINE).expect("line should parse");
    assert_eq!(rec.ip, "203.0.113.7");
    assert_eq!(rec.method, "GET");
    assert_eq!(rec.url, "/rooms/");
    assert_eq!(rec.status, 200);
    assert_eq!(rec.referrer, "https://duckduckgo.com/");
    assert_eq!(rec.user_agent, "Mozilla/5.0 (X11; Linux x86_64)");
    // offset from the log line is preserved
    assert_eq!(rec.timestamp.offset().local_minus_utc(), 7200);
    assert_eq!(rec.timestamp.to_rfc3339(), "2025-05-12T14:03:22+02:00");
}

#[test]
fn parses_http2_protocol_lines() {
    let line = VALID_LINE.replace("HTTP/1.1", "HTTP/2.0");
    assert!(parse_line(&line).is_some());
}

#[test]
fn rejects_garbage_lines() {
    assert!(parse_line("not a log line").is_none());
    assert!(parse_line("").is_none());
}

#[test]
fn rejects_unparseable_timestamps() {
    let line = VALID_LINE.replace("12/May/2025:14:03:22 +0200", "12/Foo/2025:14:03:22 +0200");
    assert!(parse_line(&line).is_none());
}

#[test]
fn strips_trailing_index_html() {
    assert_eq!(normalize_url("/about/index.html"), "/about/");
    assert_eq!(normalize_url("/index.html"), "/");
    assert_eq!(normalize_url("/rooms/"), "/rooms/");
    assert_eq!(normalize_url("/index.html.bak"), "/index.html.bak");

    let line = VALID_LINE.replace("/rooms/", "/rooms/index.html");
    assert_eq!(parse_line(&line).unwrap().url, "/rooms/");
}

#[test]
fn load_records_skips_bad_lines_and_applies_cutoff() {
    let old_line = VALID_LINE.replace("12/May/2025", "01/Apr/2025");
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "{old_line}").unwrap();
    writeln!(file, "garbage that does not match").unwrap();
    writeln!(file, "{VALID_LINE}").unwrap();
    file.flush().unwrap();

    let cutoff = Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap();
    let records = load_records(file.path(), cutoff).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].url, "/rooms/");
}

#[test]
fn load_records_skips_lines_with_invalid_utf8() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "{VALID_LINE}").unwrap();
    file.write_all(b"\xff\xfe scanner junk\n").unwrap();
    writeln!(file, "{VALID_LINE}").unwrap();
    file.flush().unwrap();

    let cutoff = Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap();
    let records = load_records(file.path(), cutoff).unwrap();
    assert_eq!(records.len(), 2);
}

#[test]
fn load_records_fails_on_missing_file() {
    let cutoff = Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap();
    assert!(load_records(std::path::Path::new("/nonexistent/access.log"), cutoff).is_err());
}
