use anyhow::Result;
use cross_stats_collector::{
    download_range, init_logging, CollectorConfig, FtpSource, Library,
};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let config = CollectorConfig::load("config.json");

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let fresh = if let Some(pos) = args.iter().position(|a| a == "--fresh") {
        args.remove(pos);
        true
    } else {
        false
    };

    let root = args
        .first()
        .cloned()
        .unwrap_or_else(|| config.library_root.clone());
    let start = args.get(1).cloned().unwrap_or_else(|| config.start_date.clone());
    let end = args
        .get(2)
        .cloned()
        .unwrap_or_else(|| chrono::Local::now().format("%Y%m%d").to_string());

    println!("Downloading cross statistics");
    println!("  Library: {}", root);
    println!("  Range:   {} .. {}", start, end);
    println!("  Fresh:   {}", fresh);

    let library = Library::new(&root);
    let source = FtpSource::from_config(&config);
    let report = download_range(&source, &library, &start, &end, fresh).await?;

    println!(
        "Done: {} downloaded, {} skipped of {} dates",
        report.succeeded.len(),
        report.failed.len(),
        report.attempted()
    );
    Ok(())
}
