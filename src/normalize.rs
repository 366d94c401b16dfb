use crate::error::{CollectorError, Result};
use crate::format::{detect_format, RawFormat};
use crate::types::CrossRow;
use csv::{ReaderBuilder, StringRecord};
use tracing::warn;

// Header/footer row counts are fixed per format: the old layout carries one
// junk row up top and three footer rows, the new layout one and two.
const LEADING_JUNK_ROWS: usize = 1;
const OLD_FOOTER_ROWS: usize = 3;
const NEW_FOOTER_ROWS: usize = 2;

/// Clean one raw per-date file into canonical rows.
///
/// Detects the legacy layout from the header's column count, drops the
/// fixed junk/footer rows, repairs the old format's trailing artifact on
/// the intraday column, and rewrites every date to `yyyymmdd`.
pub fn normalize_raw(text: &str) -> Result<Vec<CrossRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records: Vec<StringRecord> = Vec::new();
    for record in reader.records() {
        records.push(record?);
    }

    let header = match records.first() {
        Some(h) => h,
        None => return Err(CollectorError::UnrecognizedFormat(0)),
    };
    let format = detect_format(header.len())?;

    let footer_rows = match format {
        RawFormat::Old => OLD_FOOTER_ROWS,
        RawFormat::New => NEW_FOOTER_ROWS,
    };

    let data = &records[1..];
    if data.len() <= LEADING_JUNK_ROWS + footer_rows {
        return Ok(Vec::new());
    }
    let body = &data[LEADING_JUNK_ROWS..data.len() - footer_rows];

    let mut rows = Vec::with_capacity(body.len());
    for record in body {
        if record.len() < 6 {
            warn!("skipping short record ({} fields)", record.len());
            continue;
        }
        let intraday = match format {
            RawFormat::Old => strip_artifact(&record[5]),
            RawFormat::New => record[5].to_string(),
        };
        rows.push(CrossRow {
            date: rewrite_date(&record[0])?,
            symbol: record[1].to_string(),
            listing_market: record[2].to_string(),
            opening_cross: record[3].to_string(),
            closing_cross: record[4].to_string(),
            intraday_cross: intraday,
        });
    }

    Ok(rows)
}

/// Rewrite a source `mm/dd/yyyy` date to `yyyymmdd` by reordering the fixed
/// character windows the archive has always used.
pub fn rewrite_date(raw: &str) -> Result<String> {
    if raw.len() < 8 {
        return Err(CollectorError::MalformedDate(raw.to_string()));
    }
    let (year, month, day) = match (raw.get(6..), raw.get(..2), raw.get(3..5)) {
        (Some(y), Some(m), Some(d)) => (y, m, d),
        _ => return Err(CollectorError::MalformedDate(raw.to_string())),
    };
    Ok(format!("{}{}{}", year, month, day))
}

/// The old format's final column ends with a two-character transfer
/// artifact; drop it. Values shorter than the artifact pass through.
fn strip_artifact(value: &str) -> String {
    let chars = value.chars().count();
    if chars < 2 {
        return value.to_string();
    }
    value.chars().take(chars - 2).collect()
}
