use anyhow::Result;
use cross_stats_collector::{init_logging, update, CollectorConfig, FtpSource, Library};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let config = CollectorConfig::load("config.json");

    let root = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config.library_root.clone());
    let library = Library::new(&root);
    let source = FtpSource::from_config(&config);

    let report = update(&source, &library).await?;

    if report.up_to_date {
        println!("Library already up to date.");
        return Ok(());
    }

    println!(
        "Downloaded {} new date(s), {} skipped; appended {} rows from {} file(s).",
        report.download.succeeded.len(),
        report.download.failed.len(),
        report.appended_rows,
        report.appended_files
    );
    if let Some(e) = report.month_recompile_error {
        eprintln!("Warning: month aggregates are stale: {}", e);
    }
    if let Some(e) = report.year_recompile_error {
        eprintln!("Warning: year aggregates are stale: {}", e);
    }
    Ok(())
}
