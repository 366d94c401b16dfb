//! Shared fixtures for network-free tests.

use crate::error::{CollectorError, Result};
use crate::fetch::FileSource;
use async_trait::async_trait;
use std::collections::HashMap;

/// Canned source: a map of date token to raw file text. Missing dates fail
/// the way an absent archive file would.
pub(crate) struct StaticSource {
    pub files: HashMap<String, String>,
}

#[async_trait]
impl FileSource for StaticSource {
    async fn fetch_raw(&self, date: &str) -> Result<String> {
        self.files
            .get(date)
            .cloned()
            .ok_or_else(|| CollectorError::Other(format!("no file for {}", date)))
    }
}

/// Build an old-format raw file for one date (`mm/dd/yyyy`) and symbol set,
/// junk row and footers included.
pub(crate) fn old_format_raw(date_mdy: &str, symbols: &[&str]) -> String {
    let mut text = String::from(
        "Date,Symbol,ListingMarket,OpeningCross,ClosingCross,IntradayCross\n\
         ------,------,------,------,------,------\n",
    );
    for symbol in symbols {
        text.push_str(&format!("{},{},Q,100,200,300\\r\n", date_mdy, symbol));
    }
    text.push_str("Total Opening,,,100,,\\r\nTotal Closing,,,,200,\\r\nTrade Date,,,,,\\r\n");
    text
}

/// `yyyymmdd` → `mm/dd/yyyy`, for building fixtures from date tokens.
pub(crate) fn token_to_mdy(token: &str) -> String {
    format!("{}/{}/{}", &token[4..6], &token[6..8], &token[..4])
}
