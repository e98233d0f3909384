//! Flat-file persistence for [`SkipIndex`]
//!
//! `dump` overwrites the store file with the bottom level chain, one record
//! per line in ascending key order. The write is not atomic: a crash midway
//! leaves a truncated file. `load` replays a file through `insert`; lines
//! that are not records are skipped and counted, and nothing already loaded
//! is rolled back.

pub mod record;

use crate::{InsertStatus, Result, SkipIndex};
use rand::Rng;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Summary of a `load`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Records inserted as new keys
    pub inserted: usize,
    /// Records whose key was already present
    pub duplicates: usize,
    /// Lines that were not valid records
    pub skipped: usize,
}

impl LoadReport {
    /// Number of lines read
    pub fn lines(&self) -> usize {
        self.inserted + self.duplicates + self.skipped
    }
}

impl<K, V, R> SkipIndex<K, V, R>
where
    K: Ord + fmt::Display,
    V: fmt::Display,
    R: Rng,
{
    /// Write every record to the configured store file
    pub fn dump(&self) -> Result<usize> {
        let path = self.config().store_file.clone();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        self.dump_to(&path)
    }

    /// Write every record to `path`, replacing its contents
    ///
    /// Records are rendered before the file is opened, so a record that
    /// cannot be written leaves the previous file intact.
    pub fn dump_to(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let delimiter = self.config().delimiter;

        let lines = {
            let list = self.inner.read();
            list.iter()
                .map(|(key, value)| record::format_line(key, value, delimiter))
                .collect::<Result<Vec<_>>>()?
        };

        let mut writer = BufWriter::new(File::create(path)?);
        for line in &lines {
            writeln!(writer, "{line}")?;
        }
        writer.flush()?;

        info!("Dumped {} records to {:?}", lines.len(), path);
        Ok(lines.len())
    }
}

impl<K, V, R> SkipIndex<K, V, R>
where
    K: Ord,
    V: FromStr,
    R: Rng,
{
    /// Load records from `path`, parsing keys with `K::from_str`
    pub fn load(&self, path: impl AsRef<Path>) -> Result<LoadReport>
    where
        K: FromStr,
    {
        self.load_with(path, |text| text.parse().ok())
    }

    /// Load records from `path`, parsing keys with `parse_key`
    ///
    /// A key rejected by `parse_key` marks the line as malformed.
    pub fn load_with<F>(&self, path: impl AsRef<Path>, parse_key: F) -> Result<LoadReport>
    where
        F: Fn(&str) -> Option<K>,
    {
        let path = path.as_ref();
        let delimiter = self.config().delimiter;
        let reader = BufReader::new(File::open(path)?);
        let mut report = LoadReport::default();

        for (idx, bytes) in reader.split(b'\n').enumerate() {
            let bytes = bytes?;
            let line_no = idx + 1;

            let Ok(line) = std::str::from_utf8(&bytes) else {
                warn!("Skipping line {}: not valid UTF-8", line_no);
                report.skipped += 1;
                continue;
            };
            let line = line.strip_suffix('\r').unwrap_or(line);

            let fields = record::is_valid_line(line, delimiter)
                .then(|| record::split_line(line, delimiter))
                .flatten();
            let Some((key_text, value_text)) = fields else {
                if line.is_empty() {
                    debug!("Skipping empty line {}", line_no);
                } else {
                    warn!("Skipping line {} without delimiter {:?}", line_no, delimiter);
                }
                report.skipped += 1;
                continue;
            };
            if key_text.is_empty() || value_text.is_empty() {
                warn!("Skipping line {} with empty key or value", line_no);
                report.skipped += 1;
                continue;
            }

            let Some(key) = parse_key(key_text) else {
                warn!("Skipping line {}: unparsable key {:?}", line_no, key_text);
                report.skipped += 1;
                continue;
            };
            let Ok(value) = value_text.parse::<V>() else {
                warn!("Skipping line {}: unparsable value", line_no);
                report.skipped += 1;
                continue;
            };

            match self.insert(key, value) {
                InsertStatus::Inserted => report.inserted += 1,
                InsertStatus::AlreadyExists => report.duplicates += 1,
            }
        }

        info!(
            "Loaded {:?}: {} inserted, {} duplicates, {} skipped",
            path, report.inserted, report.duplicates, report.skipped
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IndexConfig, StoreError};
    use tempfile::TempDir;

    fn index(config: IndexConfig) -> SkipIndex<i64, String> {
        SkipIndex::with_seed(config, 5).unwrap()
    }

    #[test]
    fn test_load_skips_malformed_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.txt");
        fs::write(&path, "1:a\nbadline\n3: c\n").unwrap();

        let index = index(IndexConfig::default());
        let report = index.load(&path).unwrap();

        assert_eq!(
            report,
            LoadReport {
                inserted: 2,
                duplicates: 0,
                skipped: 1
            }
        );
        assert_eq!(
            index.entries(),
            vec![(1, "a".to_string()), (3, "c".to_string())]
        );
    }

    #[test]
    fn test_load_key_policy() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.txt");
        fs::write(
            &path,
            "-4: negative\n007: padded\nx1: letters\n: no key\n9:\n7: again\r\n99999999999999999999: huge\n",
        )
        .unwrap();

        let index = index(IndexConfig::default());
        let report = index.load(&path).unwrap();

        assert_eq!(report.inserted, 2);
        assert_eq!(report.duplicates, 1);
        assert_eq!(report.skipped, 4);
        assert_eq!(report.lines(), 7);
        assert_eq!(index.search(&-4), Some("negative".to_string()));
        assert_eq!(index.search(&7), Some("padded".to_string()));
    }

    #[test]
    fn test_load_with_custom_key_rule() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.txt");
        fs::write(&path, "1:a\n-2:b\n").unwrap();

        let index = index(IndexConfig::default());
        let digits_only = |text: &str| {
            text.bytes()
                .all(|b| b.is_ascii_digit())
                .then(|| text.parse::<i64>().ok())
                .flatten()
        };
        let report = index.load_with(&path, digits_only).unwrap();

        assert_eq!(report.inserted, 1);
        assert_eq!(report.skipped, 1);
        assert!(index.contains(&1));
        assert!(!index.contains(&-2));
    }

    #[test]
    fn test_load_skips_invalid_utf8_line() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.txt");
        fs::write(&path, b"1:a\n2:\xff\xfe\n3: c\n").unwrap();

        let index = index(IndexConfig::default());
        let report = index.load(&path).unwrap();

        assert_eq!(report.inserted, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(
            index.entries(),
            vec![(1, "a".to_string()), (3, "c".to_string())]
        );
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let index = index(IndexConfig::default());
        let err = index.load(temp_dir.path().join("missing")).unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn test_dump_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let config = IndexConfig {
            store_file: temp_dir.path().join("store").join("dumpFile"),
            ..Default::default()
        };

        let index = index(config.clone());
        for (k, v) in [(5, "e"), (1, "a"), (3, " spaced"), (-2, "url: http://x")] {
            index.insert(k, v.to_string());
        }
        assert_eq!(index.dump().unwrap(), 4);

        let text = fs::read_to_string(&config.store_file).unwrap();
        assert_eq!(text, "-2: url: http://x\n1: a\n3:  spaced\n5: e\n");

        let restored = SkipIndex::<i64, String>::with_seed(config.clone(), 99).unwrap();
        let report = restored.load(&config.store_file).unwrap();
        assert_eq!(report.inserted, 4);
        assert_eq!(restored.entries(), index.entries());
    }

    #[test]
    fn test_dump_truncates() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dump.txt");
        fs::write(&path, "1: old\n2: old\n3: old\n").unwrap();

        let index = index(IndexConfig::default());
        index.insert(9, "new".into());
        index.dump_to(&path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "9: new\n");
    }

    #[test]
    fn test_dump_to_unwritable_path() {
        let temp_dir = TempDir::new().unwrap();
        let to_dir = index(IndexConfig::default());
        to_dir.insert(1, "a".into());

        let err = to_dir.dump_to(temp_dir.path()).unwrap_err();
        assert!(err.is_io());

        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let config = IndexConfig {
            store_file: blocker.join("dumpFile"),
            ..Default::default()
        };
        let under_file = index(config);
        under_file.insert(1, "a".into());

        let err = under_file.dump().unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn test_dump_rejects_multiline_value() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dump.txt");
        fs::write(&path, "1: keep\n").unwrap();

        let index = index(IndexConfig::default());
        index.insert(1, "two\nlines".into());
        let err = index.dump_to(&path).unwrap_err();

        assert!(matches!(err, StoreError::InvalidRecord(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), "1: keep\n");
    }

    #[test]
    fn test_custom_delimiter_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let config = IndexConfig {
            delimiter: '=',
            store_file: temp_dir.path().join("eq.txt"),
            ..Default::default()
        };

        let index = index(config.clone());
        index.insert(1, "a:b".into());
        index.dump().unwrap();
        assert_eq!(
            fs::read_to_string(&config.store_file).unwrap(),
            "1= a:b\n"
        );

        let restored = SkipIndex::<i64, String>::with_seed(config.clone(), 1).unwrap();
        restored.load(&config.store_file).unwrap();
        assert_eq!(restored.search(&1), Some("a:b".to_string()));
    }
}
