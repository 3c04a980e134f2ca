//! # Filter Module
//!
//! Noise predicates applied to parsed records before sessionization.
//!
//! The predicates are independent; a record is excluded when ANY of them
//! fires. There is no ordering dependency between them.

use once_cell::sync::Lazy;
use woothee::parser::Parser;

use crate::models::LogRecord;

static UA_PARSER: Lazy<Parser> = Lazy::new(Parser::new);

const BOT_SIGNATURES: &[&str] = &[
    "bot",
    "crawler",
    "spider",
    "crawl",
    "slurp",
    "search",
    "archive",
    "transcoder",
    "monitor",
    "fetch",
    "loader",
    "python-requests",
    "httpclient",
    "java",
    "wget",
    "curl",
    "lighthouse",
    "axios",
    "scrapy",
    "httpx",
    "phantomjs",
    "headless",
    "libwww",
    "mechanize",
    "apachebench",
];

const STATIC_EXTENSIONS: &[&str] = &[
    ".jpg", ".png", ".css", ".js", ".svg", ".ico", ".woff", ".woff2", ".ttf",
];

const SUSPICIOUS_PATHS: &[&str] = &["/wp-admin/", "/admin/", "/login/", "/phpmyadmin/"];
const SUSPICIOUS_METHODS: &[&str] = &["POST", "PUT", "DELETE"];

/// Known-bot signature list match, backed up by the UA parser's crawler
/// classification.
pub fn is_bot(user_agent: &str) -> bool {
    let ua = user_agent.to_lowercase();
    if BOT_SIGNATURES.iter().any(|sig| ua.contains(sig)) {
        return true;
    }
    UA_PARSER
        .parse(user_agent)
        .map(|r| r.category == "crawler")
        .unwrap_or(false)
}

pub fn is_static_asset(url: &str) -> bool {
    STATIC_EXTENSIONS.iter().any(|ext| url.ends_with(ext))
}

pub fn is_suspicious(url: &str, method: &str) -> bool {
    SUSPICIOUS_PATHS.iter().any(|p| url.contains(p)) || SUSPICIOUS_METHODS.contains(&method)
}

/// Direct hits (`-`) and referrers carrying the site's own domain.
pub fn is_internal_referrer(referrer: &str, domain: &str) -> bool {
    referrer == "-" || referrer.contains(domain)
}

/// True when any noise predicate fires.
pub fn is_noise(rec: &LogRecord, domain: &str) -> bool {
    is_bot(&rec.user_agent)
        || rec.status == 404
        || is_static_asset(&rec.url)
        || is_suspicious(&rec.url, &rec.method)
        || is_internal_referrer(&rec.referrer, domain)
}

/// Drop every record matching a noise predicate.
pub fn retain_human(records: Vec<LogRecord>, domain: &str) -> Vec<LogRecord> {
    records
        .into_iter()
        .filter(|r| !is_noise(r, domain))
        .collect()
}
