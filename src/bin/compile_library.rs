use anyhow::{bail, Result};
use cross_stats_collector::{compile, init_logging, CollectorConfig, CompilePeriod, Library};

fn main() -> Result<()> {
    init_logging();
    let config = CollectorConfig::load("config.json");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let root = args
        .first()
        .cloned()
        .unwrap_or_else(|| config.library_root.clone());
    let period = match args.get(1).map(String::as_str).unwrap_or("all") {
        "all" | "a" => CompilePeriod::All,
        "year" | "y" => CompilePeriod::Year,
        "month" | "m" => CompilePeriod::Month,
        other => bail!("unknown period '{}' (expected all, year, or month)", other),
    };

    let library = Library::new(&root);
    let outputs = compile(&library, period)?;

    println!("Compiled {} aggregate file(s):", outputs.len());
    for path in outputs {
        println!("  {}", path.display());
    }
    Ok(())
}
