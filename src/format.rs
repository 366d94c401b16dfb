use crate::error::{CollectorError, Result};

/// The two column layouts the archive has used historically. Nothing new
/// has appeared since 2010.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawFormat {
    /// 6-column layout used by the earliest files
    Old,
    /// 7-column layout with a trailing artifact column
    New,
}

/// Classify a raw file by the column count of its header record.
pub fn detect_format(num_columns: usize) -> Result<RawFormat> {
    match num_columns {
        6 => Ok(RawFormat::Old),
        7 => Ok(RawFormat::New),
        other => Err(CollectorError::UnrecognizedFormat(other)),
    }
}
