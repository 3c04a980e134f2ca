//! # Traffic Dashboard
//!
//! Session-based website traffic reporting over a combined-format access
//! log, plus a translation-overlay utility for static HTML pages.
//!
//! ## Overview
//!
//! The `report` pipeline reads an access log once, sequentially:
//! parse lines, drop bot/static/noise requests, group the remainder into
//! visit sessions split at 30 minutes of inactivity, aggregate per-session
//! statistics (weekday, hour, landing pages, referrers, GeoIP countries),
//! then render PNG charts and an HTML/Markdown dashboard into a
//! period-named output folder.
//!
//! The `translate` utility applies flat JSON maps of CSS-selector keys to
//! replacement fragments against static HTML pages, one output page per
//! language.

/// PNG chart rendering
pub mod charts;

/// Command-line argument parsing
pub mod cli;

/// Noise predicates (bots, static assets, suspicious requests)
pub mod filter;

/// GeoLite2 download and IP-to-country lookup
pub mod geo;

/// Rotating run log setup
pub mod logging;

/// Data models for records and sessions
pub mod models;

/// Translation overlays for static HTML pages
pub mod overlay;

/// Access-log line parsing and file loading
pub mod parser;

/// Report pipeline and HTML/Markdown rendering
pub mod report;

/// Session segmentation (30-minute inactivity gap)
pub mod sessions;

/// Aggregation over the session list
pub mod stats;

/// Period windows and output folder layout
pub mod utils;
