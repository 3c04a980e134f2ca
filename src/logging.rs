//! Rotating run log, duplicated to stderr.

use anyhow::Result;
use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming};
use std::path::Path;

const LOG_BASENAME: &str = "dashboard";
const MAX_LOG_BYTES: u64 = 5_000_000;
const KEPT_LOG_FILES: usize = 5;

/// Start the logger. The returned handle must stay alive for the duration
/// of the run; dropping it flushes and stops logging.
pub fn init(dir: &Path) -> Result<LoggerHandle> {
    let handle = Logger::try_with_env_or_str("info")?
        .log_to_file(FileSpec::default().directory(dir).basename(LOG_BASENAME))
        .rotate(
            Criterion::Size(MAX_LOG_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEPT_LOG_FILES),
        )
        .duplicate_to_stderr(Duplicate::Info)
        .start()?;
    Ok(handle)
}
