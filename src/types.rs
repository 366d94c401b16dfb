use serde::{Deserialize, Serialize};

/// Canonical CSV header shared by per-date files and every aggregate
pub const CANONICAL_HEADER: &str =
    "Date,Symbol,ListingMarket,OpeningCross,ClosingCross,IntradayCross";

/// First date published on the Nasdaq cross statistics archive
pub const ARCHIVE_EPOCH: &str = "20080101";

/// One normalized cross-statistics record.
///
/// Fields stay verbatim strings: the archive mixes counts, blanks, and
/// trailing artifacts across years, and the library's job is faithful
/// cleanup, not numeric interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CrossRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Symbol")]
    pub symbol: String,
    #[serde(rename = "ListingMarket")]
    pub listing_market: String,
    #[serde(rename = "OpeningCross")]
    pub opening_cross: String,
    #[serde(rename = "ClosingCross")]
    pub closing_cross: String,
    #[serde(rename = "IntradayCross")]
    pub intraday_cross: String,
}

/// Collector configuration, loadable from `config.json`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CollectorConfig {
    pub ftp_host: String,
    pub remote_dir: String,
    pub library_root: String,
    pub start_date: String,
}

impl CollectorConfig {
    /// Read `config.json`, falling back to defaults when it is absent or
    /// does not parse.
    pub fn load(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Error parsing {}: {}. Using defaults.", path, e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            ftp_host: "ftp.nasdaqtrader.com:21".to_string(),
            remote_dir: "Files/crosses".to_string(),
            library_root: "data".to_string(),
            start_date: ARCHIVE_EPOCH.to_string(),
        }
    }
}
