use crate::compile::{compile, CompilePeriod};
use crate::download::{download_range, DownloadReport};
use crate::error::{CollectorError, Result};
use crate::fetch::FileSource;
use crate::library::{append_data_lines, Library};
use crate::types::{ARCHIVE_EPOCH, CANONICAL_HEADER};
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use tracing::{info, warn};

/// Outcome of an incremental update. Recompile problems are carried here
/// instead of being swallowed, so stale year/month aggregates are visible
/// to the caller.
#[derive(Debug, Default)]
pub struct UpdateReport {
    pub up_to_date: bool,
    pub download: DownloadReport,
    pub appended_files: usize,
    pub appended_rows: usize,
    pub year_recompile_error: Option<String>,
    pub month_recompile_error: Option<String>,
}

/// Bring the library up to today and refresh the aggregates.
pub async fn update(source: &dyn FileSource, library: &Library) -> Result<UpdateReport> {
    let today = chrono::Local::now().format("%Y%m%d").to_string();
    update_to(source, library, &today).await
}

/// Update against an explicit "today" token. Split out so the gap logic is
/// testable without the wall clock.
pub async fn update_to(
    source: &dyn FileSource,
    library: &Library,
    today: &str,
) -> Result<UpdateReport> {
    library.ensure_layout()?;
    let last = library.last_date_downloaded()?;

    if let Some(ref last) = last {
        if today <= last.as_str() {
            info!("library already up to date ({})", last);
            return Ok(UpdateReport {
                up_to_date: true,
                ..UpdateReport::default()
            });
        }
    }

    // The last stored date is re-fetched and overwritten in place; only
    // strictly newer dates are appended below.
    let start = last.clone().unwrap_or_else(|| ARCHIVE_EPOCH.to_string());
    let download = download_range(source, library, &start, today, false).await?;

    let threshold = last.unwrap_or_default();
    let new_files: Vec<_> = library
        .per_date_files()?
        .into_iter()
        .filter(|f| f.date.as_str() > threshold.as_str())
        .collect();

    let mut report = UpdateReport {
        download,
        ..UpdateReport::default()
    };

    if !new_files.is_empty() {
        fs::create_dir_all(library.by_all_dir())
            .map_err(|e| CollectorError::io(library.by_all_dir(), e))?;
        let path = library.all_data_path();
        let fresh = !path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| CollectorError::io(&path, e))?;
        let mut writer = BufWriter::new(file);
        if fresh {
            writeln!(writer, "{}", CANONICAL_HEADER).map_err(|e| CollectorError::io(&path, e))?;
        }
        for f in &new_files {
            report.appended_rows += append_data_lines(&mut writer, &f.path)?;
        }
        writer.flush().map_err(|e| CollectorError::io(&path, e))?;
        report.appended_files = new_files.len();
        info!(
            "appended {} rows from {} files to {}",
            report.appended_rows,
            report.appended_files,
            path.display()
        );
    }

    report.month_recompile_error = rebuild(library, CompilePeriod::Month).err();
    report.year_recompile_error = rebuild(library, CompilePeriod::Year).err();

    Ok(report)
}

/// Remove and recompile one aggregate directory. Errors come back as a
/// message for the report instead of aborting the update.
fn rebuild(library: &Library, period: CompilePeriod) -> std::result::Result<(), String> {
    let dir = match period {
        CompilePeriod::Month => library.by_month_dir(),
        CompilePeriod::Year => library.by_year_dir(),
        CompilePeriod::All => library.by_all_dir(),
    };
    let result = (|| -> Result<()> {
        if dir.exists() {
            fs::remove_dir_all(&dir).map_err(|e| CollectorError::io(&dir, e))?;
        }
        compile(library, period)?;
        Ok(())
    })();
    if let Err(ref e) = result {
        warn!("recompile of {} failed: {}", dir.display(), e);
    }
    result.map_err(|e| e.to_string())
}
