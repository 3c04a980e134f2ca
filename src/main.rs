use anyhow::Result;

use traffic_dashboard::cli::{Args, Command};
use traffic_dashboard::{logging, overlay, report};

fn main() -> Result<()> {
    let args = Args::parse();
    let _logger = logging::init(&args.log_dir)?;

    let result = match &args.command {
        Command::Report(report_args) => report::run(report_args),
        Command::Translate(translate_args) => overlay::run(translate_args),
    };

    // Top-level failures are logged before terminating the process.
    if let Err(e) = &result {
        log::error!("run failed: {e:#}");
    }
    result
}
