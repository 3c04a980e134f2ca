//! Lookback periods, output folder naming, and directory setup.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Local, Utc};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::PeriodArg;

/// Lookback window length for a reporting period.
pub fn lookback_days(period: PeriodArg) -> i64 {
    match period {
        PeriodArg::Weekly => 7,
        PeriodArg::Monthly => 30,
        PeriodArg::Yearly => 365,
    }
}

/// Oldest timestamp still included in the report.
pub fn lookback_start(period: PeriodArg, now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(lookback_days(period))
}

/// Period-stamped output folder name: `w-YYYY-MM-DD`, `m-YYYY-MM`, `y-YYYY`.
pub fn period_folder(period: PeriodArg, now: DateTime<Local>) -> String {
    match period {
        PeriodArg::Weekly => format!("w-{}", now.format("%Y-%m-%d")),
        PeriodArg::Monthly => format!("m-{}", now.format("%Y-%m")),
        PeriodArg::Yearly => format!("y-{}", now.format("%Y")),
    }
}

/// Create `base/folder/images` and return the image directory path.
pub fn ensure_output_dirs(base: &Path, folder: &str) -> Result<PathBuf> {
    let img_dir = base.join(folder).join("images");
    fs::create_dir_all(&img_dir)
        .with_context(|| format!("create output directory {}", img_dir.display()))?;
    Ok(img_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn folder_names_follow_period_format() {
        let now = Local.with_ymd_and_hms(2025, 6, 3, 12, 0, 0).unwrap();
        assert_eq!(period_folder(PeriodArg::Weekly, now), "w-2025-06-03");
        assert_eq!(period_folder(PeriodArg::Monthly, now), "m-2025-06");
        assert_eq!(period_folder(PeriodArg::Yearly, now), "y-2025");
    }

    #[test]
    fn lookback_matches_period() {
        let now = Utc.with_ymd_and_hms(2025, 6, 3, 12, 0, 0).unwrap();
        assert_eq!(lookback_start(PeriodArg::Weekly, now), now - Duration::days(7));
        assert_eq!(lookback_start(PeriodArg::Monthly, now), now - Duration::days(30));
        assert_eq!(lookback_start(PeriodArg::Yearly, now), now - Duration::days(365));
    }
}
