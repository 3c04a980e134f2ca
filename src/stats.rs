//! # Stats Module
//!
//! Pure grouping and counting over the session list. Everything here feeds
//! the charts and the report template.

use serde::Serialize;
use std::collections::{HashMap, HashSet};

use chrono::{Datelike, Timelike};

use crate::geo::CountryLookup;
use crate::models::Session;

pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// One row of a top-N ranking.
#[derive(Clone, Debug, Serialize)]
pub struct Ranked {
    pub label: String,
    pub sessions: u64,
}

/// Aggregated report data for one run.
#[derive(Clone, Debug, Serialize)]
pub struct Summary {
    pub total_sessions: usize,
    pub unique_ips: usize,
    pub avg_duration_min: f64,
    /// Sessions per weekday, Monday first.
    pub sessions_by_weekday: Vec<u64>,
    /// Mean session duration (minutes) per weekday, Monday first.
    pub avg_duration_by_weekday: Vec<f64>,
    /// Sessions per hour of day, 0..24.
    pub sessions_by_hour: Vec<u64>,
    pub top_landing_pages: Vec<Ranked>,
    pub top_referrers: Vec<Ranked>,
    pub top_countries: Vec<Ranked>,
}

/// Compute every aggregate the report needs.
pub fn summarize(
    sessions: &[Session],
    domain: &str,
    geo: &dyn CountryLookup,
    top_n: usize,
) -> Summary {
    let unique_ips: HashSet<&str> = sessions.iter().map(|s| s.ip.as_str()).collect();
    let avg_duration_min = if sessions.is_empty() {
        0.0
    } else {
        sessions.iter().map(Session::duration_minutes).sum::<f64>() / sessions.len() as f64
    };

    let mut sessions_by_weekday = vec![0u64; 7];
    let mut duration_sum_by_weekday = vec![0.0f64; 7];
    let mut sessions_by_hour = vec![0u64; 24];
    for s in sessions {
        let dow = s.start.weekday().num_days_from_monday() as usize;
        sessions_by_weekday[dow] += 1;
        duration_sum_by_weekday[dow] += s.duration_minutes();
        sessions_by_hour[s.start.hour() as usize] += 1;
    }
    let avg_duration_by_weekday = duration_sum_by_weekday
        .iter()
        .zip(&sessions_by_weekday)
        .map(|(sum, &n)| if n == 0 { 0.0 } else { sum / n as f64 })
        .collect();

    Summary {
        total_sessions: sessions.len(),
        unique_ips: unique_ips.len(),
        avg_duration_min,
        sessions_by_weekday,
        avg_duration_by_weekday,
        sessions_by_hour,
        top_landing_pages: top_landing_pages(sessions, top_n),
        top_referrers: top_external_referrers(sessions, domain, top_n),
        top_countries: top_countries(sessions, geo, top_n),
    }
}

/// Most-visited landing pages, counting only page-like URLs (ending in `/`
/// or `.html`, or empty).
pub fn top_landing_pages(sessions: &[Session], n: usize) -> Vec<Ranked> {
    let pages = sessions
        .iter()
        .map(|s| s.landing_page.as_str())
        .filter(|u| u.is_empty() || u.ends_with('/') || u.ends_with(".html"));
    top_n(pages, n)
}

/// Referrers from outside the site, excluding direct (`-`) hits and anything
/// carrying the own domain.
pub fn top_external_referrers(sessions: &[Session], domain: &str, n: usize) -> Vec<Ranked> {
    let refs = sessions
        .iter()
        .map(|s| s.referrer.as_str())
        .filter(|r| *r != "-" && !r.contains(domain));
    top_n(refs, n)
}

/// Countries of session IPs via the GeoIP collaborator.
pub fn top_countries(sessions: &[Session], geo: &dyn CountryLookup, n: usize) -> Vec<Ranked> {
    let countries: Vec<String> = sessions.iter().map(|s| geo.country(&s.ip)).collect();
    top_n(countries.iter().map(String::as_str), n)
}

// Count distinct values and keep the n most frequent. Ties break by label so
// the output is deterministic.
fn top_n<'a>(values: impl Iterator<Item = &'a str>, n: usize) -> Vec<Ranked> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for v in values {
        *counts.entry(v).or_default() += 1;
    }
    let mut ranked: Vec<(&str, u64)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(n)
        .map(|(label, sessions)| Ranked {
            label: label.to_string(),
            sessions,
        })
        .collect()
}
