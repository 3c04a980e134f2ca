use std::path::PathBuf;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodArg {
    /// Last 7 days
    #[value(name = "w")]
    Weekly,
    /// Last 30 days
    #[value(name = "m")]
    Monthly,
    /// Last 365 days
    #[value(name = "y")]
    Yearly,
}

#[derive(clap::Parser, Debug)]
#[command(name = "traffic_dashboard", about = "Session-based website traffic dashboard")]
pub struct Args {
    /// Directory for the rotating run log
    #[arg(long, env = "DASHBOARD_LOG_DIR", default_value = ".")]
    pub log_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Analyze an access log and render the dashboard
    Report(ReportArgs),
    /// Apply per-language translation overlays to static HTML pages
    Translate(TranslateArgs),
}

#[derive(clap::Args, Debug)]
pub struct ReportArgs {
    /// Path to access.log
    #[arg(long)]
    pub logpath: PathBuf,

    /// Your own domain, excluded from referrer statistics
    #[arg(long)]
    pub domain: String,

    /// Reporting period: w=weekly, m=monthly, y=yearly
    #[arg(long, value_enum, default_value_t = PeriodArg::Weekly)]
    pub period: PeriodArg,

    /// Root directory for generated output
    #[arg(long, default_value = "output")]
    pub output: PathBuf,

    /// Prefix for image links in the report (e.g. a published base URL)
    #[arg(long, default_value = "images")]
    pub base_url: String,

    /// GeoLite2 country database path; downloaded when absent
    #[arg(long, default_value = crate::geo::DEFAULT_GEO_DB)]
    pub geodb: PathBuf,

    /// Entries per top list (pages, referrers, countries)
    #[arg(long, default_value_t = 5)]
    pub top_n: usize,
}

#[derive(clap::Args, Debug)]
pub struct TranslateArgs {
    /// Directory holding the HTML pages to translate
    #[arg(long, default_value = ".")]
    pub site_root: PathBuf,

    /// Directory with <page>.html.<lang>.json files; defaults to
    /// <site-root>/translations
    #[arg(long)]
    pub translations: Option<PathBuf>,
}

impl Args {
    pub fn parse() -> Self {
        <Args as clap::Parser>::parse()
    }
}
