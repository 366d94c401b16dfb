use crate::error::{CollectorError, Result};
use crate::types::CrossRow;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const FILE_PREFIX: &str = "CrossStats";
pub const FILE_EXT: &str = ".txt";

pub const INDIVIDUAL_DIR: &str = "individualData";
pub const BY_ALL_DIR: &str = "dataByAll";
pub const BY_YEAR_DIR: &str = "dataByYear";
pub const BY_MONTH_DIR: &str = "dataByMonth";

/// One per-date file on disk, with its date token carried explicitly so
/// nothing downstream has to slice it back out of the file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerDateFile {
    pub date: String,
    pub path: PathBuf,
}

/// The local library: a root directory holding per-date files and the
/// three aggregate directories. All paths flow through here; no component
/// touches the process working directory.
#[derive(Debug, Clone)]
pub struct Library {
    root: PathBuf,
}

impl Library {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn individual_dir(&self) -> PathBuf {
        self.root.join(INDIVIDUAL_DIR)
    }

    pub fn by_all_dir(&self) -> PathBuf {
        self.root.join(BY_ALL_DIR)
    }

    pub fn by_year_dir(&self) -> PathBuf {
        self.root.join(BY_YEAR_DIR)
    }

    pub fn by_month_dir(&self) -> PathBuf {
        self.root.join(BY_MONTH_DIR)
    }

    pub fn all_data_path(&self) -> PathBuf {
        self.by_all_dir().join("AllData.txt")
    }

    pub fn per_date_path(&self, date: &str) -> PathBuf {
        self.individual_dir()
            .join(format!("{}{}{}", FILE_PREFIX, date, FILE_EXT))
    }

    /// Create the library layout. With `wipe`, first best-effort delete
    /// everything under the root, logging and continuing past entries that
    /// refuse to go.
    pub fn bootstrap(&self, wipe: bool) -> Result<()> {
        if wipe && self.root.exists() {
            info!("wiping library at {}", self.root.display());
            self.clear_root();
        }
        self.ensure_layout()
    }

    pub fn ensure_layout(&self) -> Result<()> {
        fs::create_dir_all(self.individual_dir())
            .map_err(|e| CollectorError::io(self.individual_dir(), e))?;
        Ok(())
    }

    fn clear_root(&self) {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("could not list {}: {}", self.root.display(), e);
                return;
            }
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let result = if path.is_dir() {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            if let Err(e) = result {
                warn!("could not delete {}: {}", path.display(), e);
            }
        }
    }

    /// Write one per-date file: canonical header, then one line per row.
    pub fn write_per_date(&self, date: &str, rows: &[CrossRow]) -> Result<PerDateFile> {
        let path = self.per_date_path(date);
        let file = File::create(&path).map_err(|e| CollectorError::io(&path, e))?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(BufWriter::new(file));
        // Write the header explicitly so even an empty day carries it
        writer.write_record(crate::types::CANONICAL_HEADER.split(','))?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush().map_err(|e| CollectorError::io(&path, e))?;
        debug!("wrote {} rows to {}", rows.len(), path.display());
        Ok(PerDateFile {
            date: date.to_string(),
            path,
        })
    }

    /// Scan `individualData` and return per-date files sorted ascending by
    /// date token. Files that do not match the naming scheme are skipped.
    pub fn per_date_files(&self) -> Result<Vec<PerDateFile>> {
        let dir = self.individual_dir();
        let entries = fs::read_dir(&dir).map_err(|e| CollectorError::io(&dir, e))?;

        let mut files = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name,
                None => continue,
            };
            if let Some(date) = parse_date_token(name) {
                files.push(PerDateFile {
                    date: date.to_string(),
                    path,
                });
            } else {
                debug!("ignoring non per-date file {}", name);
            }
        }
        files.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(files)
    }

    /// Most recent date token among the per-date files, `None` on an empty
    /// library.
    pub fn last_date_downloaded(&self) -> Result<Option<String>> {
        let files = self.per_date_files()?;
        Ok(files.last().map(|f| f.date.clone()))
    }
}

/// `CrossStats<yyyymmdd>.txt` → the date token.
fn parse_date_token(file_name: &str) -> Option<&str> {
    let date = file_name
        .strip_prefix(FILE_PREFIX)?
        .strip_suffix(FILE_EXT)?;
    if date.len() == 8 && date.bytes().all(|b| b.is_ascii_digit()) {
        Some(date)
    } else {
        None
    }
}

/// Append the header-stripped lines of `source` to an open aggregate writer.
/// Returns the number of data lines appended.
pub fn append_data_lines(writer: &mut impl Write, source: &Path) -> Result<usize> {
    let contents = fs::read_to_string(source).map_err(|e| CollectorError::io(source, e))?;
    let mut appended = 0;
    for line in contents.lines().skip(1) {
        if line.is_empty() {
            continue;
        }
        writeln!(writer, "{}", line).map_err(|e| CollectorError::io(source, e))?;
        appended += 1;
    }
    Ok(appended)
}
