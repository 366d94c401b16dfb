use crate::dates::DateRange;
use crate::error::Result;
use crate::fetch::{FileSource, FtpSource};
use crate::library::{Library, PerDateFile};
use crate::normalize::normalize_raw;
use tracing::{info, warn};

/// One date that could not be brought into the library, with the reason
/// kept so the caller can inspect or retry.
#[derive(Debug, Clone)]
pub struct FailedDate {
    pub date: String,
    pub reason: String,
}

/// Outcome of a batch download. Weekends and market holidays have no file
/// on the archive, so a non-empty `failed` list is the normal case.
#[derive(Debug, Default)]
pub struct DownloadReport {
    pub succeeded: Vec<PerDateFile>,
    pub failed: Vec<FailedDate>,
}

impl DownloadReport {
    pub fn attempted(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

/// Fetch, normalize, and store every date in `[start, end]` inclusive.
///
/// With `fresh`, the library is wiped and rebuilt first. A failure on one
/// date never stops the batch; it is recorded in the report instead.
pub async fn download_range(
    source: &dyn FileSource,
    library: &Library,
    start: &str,
    end: &str,
    fresh: bool,
) -> Result<DownloadReport> {
    library.bootstrap(fresh)?;

    let dates = DateRange::new(start, end)?;
    let mut report = DownloadReport::default();

    for date in dates {
        info!("processing {}", FtpSource::remote_file_name(&date));
        match fetch_one(source, library, &date).await {
            Ok(file) => report.succeeded.push(file),
            Err(e) => {
                warn!("skipping {}: {}", date, e);
                report.failed.push(FailedDate {
                    date,
                    reason: e.to_string(),
                });
            }
        }
    }

    info!(
        "downloaded {} of {} dates",
        report.succeeded.len(),
        report.attempted()
    );
    Ok(report)
}

async fn fetch_one(
    source: &dyn FileSource,
    library: &Library,
    date: &str,
) -> Result<PerDateFile> {
    let raw = source.fetch_raw(date).await?;
    let rows = normalize_raw(&raw)?;
    library.write_per_date(date, &rows)
}
