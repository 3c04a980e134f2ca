//! # Report Module
//!
//! Orchestrates the report pipeline (read, filter, sessionize, aggregate,
//! chart, render) and produces the HTML dashboard plus a Markdown summary.

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use std::fs;
use std::path::Path;
use tera::Tera;

use crate::cli::ReportArgs;
use crate::stats::{Summary, WEEKDAYS};
use crate::{charts, filter, geo, parser, sessions, stats, utils};

const DASHBOARD_TEMPLATE: &str = include_str!("../templates/dashboard.html");

/// Run one full report: everything from log file to dashboard on disk.
pub fn run(args: &ReportArgs) -> Result<()> {
    let now = Local::now();
    let cutoff = utils::lookback_start(args.period, now.with_timezone(&Utc));

    geo::ensure_geodb(&args.geodb)?;

    let folder = utils::period_folder(args.period, now);
    let img_dir = utils::ensure_output_dirs(&args.output, &folder)?;

    let records = parser::load_records(&args.logpath, cutoff)?;
    let parsed = records.len();
    let kept = filter::retain_human(records, &args.domain);
    let visits = sessions::build_sessions(&kept);

    let resolver = geo::CountryResolver::open(&args.geodb)?;
    let summary = stats::summarize(&visits, &args.domain, &resolver, args.top_n);
    log::info!(
        "processed {parsed} log entries ({} kept) into {} sessions from {} unique IPs",
        kept.len(),
        summary.total_sessions,
        summary.unique_ips
    );

    charts::render_all(&summary, &img_dir)?;

    let generated = now.format("%Y-%m-%d %H:%M").to_string();
    let html = render_html(&summary, &args.base_url, &args.domain, &generated)?;
    write_report(&args.output.join(&folder).join("dashboard.html"), &html)?;

    let md = render_markdown(&summary, &args.base_url, &args.domain, &generated);
    write_report(&args.output.join(&folder).join("dashboard.md"), &md)?;

    log::info!("dashboard generated: {}", args.output.join(&folder).display());
    Ok(())
}

fn write_report(path: &Path, contents: &str) -> Result<()> {
    if let Err(e) = fs::write(path, contents) {
        log::error!("failed to write report {}: {e}", path.display());
        return Err(e).with_context(|| format!("write {}", path.display()));
    }
    Ok(())
}

/// Fill the embedded dashboard template.
pub fn render_html(
    summary: &Summary,
    base_url: &str,
    domain: &str,
    generated: &str,
) -> Result<String> {
    let mut tera = Tera::default();
    tera.add_raw_template("dashboard.html", DASHBOARD_TEMPLATE)
        .context("register dashboard template")?;

    let mut ctx = tera::Context::new();
    ctx.insert("generated", generated);
    ctx.insert("base_url", base_url);
    ctx.insert("domain", domain);
    ctx.insert("total_sessions", &summary.total_sessions);
    ctx.insert("unique_ips", &summary.unique_ips);
    ctx.insert("avg_len", &summary.avg_duration_min);
    ctx.insert("top_referrers", &summary.top_referrers);

    tera.render("dashboard.html", &ctx)
        .context("render dashboard template")
}

/// Markdown rendition of the same summary: cards as bullets, rankings as
/// tables, charts as image links.
pub fn render_markdown(summary: &Summary, base_url: &str, domain: &str, generated: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("# Website Dashboard ({generated})\n\n"));
    out.push_str(&format!("- Total sessions: **{}**\n", summary.total_sessions));
    out.push_str(&format!("- Unique visitors: **{}**\n", summary.unique_ips));
    out.push_str(&format!(
        "- Avg. session duration: **{:.1} min**\n\n",
        summary.avg_duration_min
    ));

    out.push_str("## Sessions by Day of Week\n\n");
    out.push_str("| Day | Sessions |\n|---|---|\n");
    for (day, n) in WEEKDAYS.iter().zip(&summary.sessions_by_weekday) {
        out.push_str(&format!("| {day} | {n} |\n"));
    }
    out.push_str(&format!(
        "\n![Sessions per weekday]({base_url}/sessions_dow.png)\n\n"
    ));

    out.push_str("## Avg. Session Duration by Day of Week\n\n");
    out.push_str("| Day | Minutes |\n|---|---|\n");
    for (day, m) in WEEKDAYS.iter().zip(&summary.avg_duration_by_weekday) {
        out.push_str(&format!("| {day} | {m:.1} |\n"));
    }
    out.push_str(&format!(
        "\n![Average session length per weekday]({base_url}/avg_len_dow.png)\n\n"
    ));

    out.push_str("## Sessions by Hour\n\n");
    out.push_str("| Hour | Sessions |\n|---|---|\n");
    for (hour, n) in summary.sessions_by_hour.iter().enumerate() {
        out.push_str(&format!("| {hour:02} | {n} |\n"));
    }
    out.push_str(&format!(
        "\n![Sessions per hour]({base_url}/sessions_by_hour.png)\n\n"
    ));

    out.push_str("## Top Landing Pages\n\n| Page | Sessions |\n|---|---|\n");
    for r in &summary.top_landing_pages {
        out.push_str(&format!("| `{}` | {} |\n", r.label, r.sessions));
    }
    out.push_str(&format!("\n![Top landing pages]({base_url}/top5_pages.png)\n\n"));

    out.push_str("## Top External Referrers\n\n| Referrer | Sessions |\n|---|---|\n");
    for r in &summary.top_referrers {
        out.push_str(&format!("| {} | {} |\n", r.label, r.sessions));
    }

    out.push_str("\n## Top Countries\n\n| Country | Sessions |\n|---|---|\n");
    for r in &summary.top_countries {
        out.push_str(&format!("| {} | {} |\n", r.label, r.sessions));
    }
    out.push_str(&format!("\n![Top countries]({base_url}/top5_countries.png)\n\n"));

    out.push_str(&format!(
        "*Bots filtered out; your domain \"{domain}\" excluded from referrers. \
         All metrics are session-based (30-minute timeout).*\n"
    ));
    out
}
