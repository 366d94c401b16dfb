use crate::error::{CollectorError, Result};
use crate::library::{append_data_lines, Library, PerDateFile, FILE_EXT, FILE_PREFIX};
use crate::types::CANONICAL_HEADER;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

/// How per-date files are grouped into aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilePeriod {
    All,
    Year,
    Month,
}

impl CompilePeriod {
    /// Length of the date-token prefix that keys a group. `None` puts
    /// everything in one group.
    fn key_len(self) -> Option<usize> {
        match self {
            CompilePeriod::All => None,
            CompilePeriod::Year => Some(4),
            CompilePeriod::Month => Some(6),
        }
    }

    fn output_dir(self, library: &Library) -> PathBuf {
        match self {
            CompilePeriod::All => library.by_all_dir(),
            CompilePeriod::Year => library.by_year_dir(),
            CompilePeriod::Month => library.by_month_dir(),
        }
    }

    fn output_file_name(self, key: &str) -> String {
        match self {
            CompilePeriod::All => "AllData.txt".to_string(),
            _ => format!("{}{}{}", FILE_PREFIX, key, FILE_EXT),
        }
    }
}

/// Concatenate the library's per-date files into one output file per group,
/// each holding a single canonical header followed by the header-stripped
/// member contents in ascending date order.
///
/// The output directory must not already exist; recompilation requires the
/// caller to remove it first (the updater does exactly that).
pub fn compile(library: &Library, period: CompilePeriod) -> Result<Vec<PathBuf>> {
    let files = library.per_date_files()?;
    let out_dir = period.output_dir(library);

    fs::create_dir(&out_dir).map_err(|e| {
        if e.kind() == std::io::ErrorKind::AlreadyExists {
            CollectorError::OutputDirExists(out_dir.clone())
        } else {
            CollectorError::io(&out_dir, e)
        }
    })?;

    // BTreeMap keeps group output deterministic; members arrive pre-sorted
    let mut groups: BTreeMap<String, Vec<&PerDateFile>> = BTreeMap::new();
    for file in &files {
        let key = match period.key_len() {
            Some(len) => file.date[..len].to_string(),
            None => String::new(),
        };
        groups.entry(key).or_default().push(file);
    }

    let mut outputs = Vec::with_capacity(groups.len());
    for (key, members) in groups {
        let path = out_dir.join(period.output_file_name(&key));
        let out = File::create(&path).map_err(|e| CollectorError::io(&path, e))?;
        let mut writer = BufWriter::new(out);
        writeln!(writer, "{}", CANONICAL_HEADER).map_err(|e| CollectorError::io(&path, e))?;

        let mut rows = 0;
        for member in members {
            info!("processing {}", member.path.display());
            rows += append_data_lines(&mut writer, &member.path)?;
        }
        writer.flush().map_err(|e| CollectorError::io(&path, e))?;
        info!("compiled {} rows into {}", rows, path.display());
        outputs.push(path);
    }

    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CrossRow;

    fn row(date: &str, symbol: &str) -> CrossRow {
        CrossRow {
            date: date.to_string(),
            symbol: symbol.to_string(),
            listing_market: "Q".to_string(),
            opening_cross: "100".to_string(),
            closing_cross: "200".to_string(),
            intraday_cross: "300".to_string(),
        }
    }

    fn seeded_library(dates: &[(&str, usize)]) -> (tempfile::TempDir, Library) {
        let dir = tempfile::tempdir().unwrap();
        let library = Library::new(dir.path());
        library.bootstrap(false).unwrap();
        for (date, symbols) in dates {
            let rows: Vec<CrossRow> = (0..*symbols)
                .map(|i| row(date, &format!("SYM{}", i)))
                .collect();
            library.write_per_date(date, &rows).unwrap();
        }
        (dir, library)
    }

    fn data_line_count(path: &std::path::Path) -> usize {
        let contents = fs::read_to_string(path).unwrap();
        contents.lines().count() - 1
    }

    #[test]
    fn test_compile_all_row_count_matches_sum() {
        let (_dir, library) = seeded_library(&[
            ("20200102", 3),
            ("20200103", 2),
            ("20200106", 4),
        ]);
        let outputs = compile(&library, CompilePeriod::All).unwrap();
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0], library.all_data_path());
        assert_eq!(data_line_count(&outputs[0]), 9);

        let contents = fs::read_to_string(&outputs[0]).unwrap();
        assert_eq!(contents.lines().next().unwrap(), CANONICAL_HEADER);
        // One header total, none repeated from members
        assert_eq!(
            contents.matches("ListingMarket").count(),
            1
        );
    }

    #[test]
    fn test_compile_month_groups_january() {
        let mut seed = Vec::new();
        let dates: Vec<String> = (1..=31).map(|d| format!("202001{:02}", d)).collect();
        for date in &dates {
            seed.push((date.as_str(), 2));
        }
        seed.push(("20200203", 5));
        let (_dir, library) = seeded_library(&seed);

        let outputs = compile(&library, CompilePeriod::Month).unwrap();
        assert_eq!(outputs.len(), 2);
        let january = library.by_month_dir().join("CrossStats202001.txt");
        assert!(january.exists());
        assert_eq!(data_line_count(&january), 62);
        let february = library.by_month_dir().join("CrossStats202002.txt");
        assert_eq!(data_line_count(&february), 5);
    }

    #[test]
    fn test_compile_year_groups() {
        let (_dir, library) = seeded_library(&[
            ("20191230", 1),
            ("20200102", 2),
            ("20200610", 3),
        ]);
        let outputs = compile(&library, CompilePeriod::Year).unwrap();
        assert_eq!(outputs.len(), 2);
        assert_eq!(
            data_line_count(&library.by_year_dir().join("CrossStats2019.txt")),
            1
        );
        assert_eq!(
            data_line_count(&library.by_year_dir().join("CrossStats2020.txt")),
            5
        );
    }

    #[test]
    fn test_compile_output_is_date_ordered() {
        let (_dir, library) = seeded_library(&[
            ("20200301", 1),
            ("20200102", 1),
            ("20200215", 1),
        ]);
        compile(&library, CompilePeriod::All).unwrap();
        let contents = fs::read_to_string(library.all_data_path()).unwrap();
        let dates: Vec<&str> = contents
            .lines()
            .skip(1)
            .map(|l| l.split(',').next().unwrap())
            .collect();
        assert_eq!(dates, vec!["20200102", "20200215", "20200301"]);
    }

    #[test]
    fn test_compile_into_existing_dir_fails() {
        let (_dir, library) = seeded_library(&[("20200102", 1)]);
        compile(&library, CompilePeriod::All).unwrap();
        match compile(&library, CompilePeriod::All) {
            Err(CollectorError::OutputDirExists(path)) => {
                assert_eq!(path, library.by_all_dir());
            }
            other => panic!("expected OutputDirExists, got {:?}", other),
        }
    }
}
