//! [`DataSource`] backed by a CSV file on local disk.
//!
//! Rows have the form `key,target[,active]`. The file is re-read only when
//! its modification time moves past the last successful fetch.

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, warn};

use crate::domain::data_source::{DataSource, SourceError};
use crate::domain::mapping::Mapping;
use crate::utils::flags::parse_bool;

#[derive(Debug, Default, Clone, Copy)]
struct Timestamps {
    last_update: Option<DateTime<Utc>>,
    last_modified: Option<DateTime<Utc>>,
}

/// CSV file data source.
///
/// # Row rules
///
/// - fields are trimmed
/// - rows with fewer than two columns, an empty key or an empty target are skipped
/// - an empty `active` column counts as active; anything that does not parse
///   as `true` skips the row
/// - duplicate keys: the later row wins
#[derive(Debug)]
pub struct CsvDataSource {
    path: PathBuf,
    skip_header: bool,
    check_modified: bool,
    times: RwLock<Timestamps>,
}

impl CsvDataSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            skip_header: true,
            check_modified: true,
            times: RwLock::new(Timestamps::default()),
        }
    }

    /// Whether the first row is a header (default `true`).
    pub fn with_skip_header(mut self, skip_header: bool) -> Self {
        self.skip_header = skip_header;
        self
    }

    /// Whether [`DataSource::needs_update`] consults the file mtime
    /// (default `true`). When disabled every refresh re-reads the file.
    pub fn with_check_modified(mut self, check_modified: bool) -> Self {
        self.check_modified = check_modified;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn modified_time(&self) -> Option<DateTime<Utc>> {
        match tokio::fs::metadata(&self.path).await {
            Ok(meta) => meta.modified().ok().map(DateTime::<Utc>::from),
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "Cannot stat source file");
                None
            }
        }
    }

    fn times(&self) -> Timestamps {
        *self.times.read().unwrap_or_else(PoisonError::into_inner)
    }
}

fn row_entry(record: &StringRecord) -> Option<(String, String)> {
    let key = record.get(0).filter(|k| !k.is_empty())?;
    let target = record.get(1).filter(|t| !t.is_empty())?;

    match record.get(2).filter(|a| !a.is_empty()) {
        None => {}
        Some(active) => match parse_bool(active) {
            Some(true) => {}
            Some(false) => return None,
            None => {
                warn!(key, active, "Skipping row with invalid active flag");
                return None;
            }
        },
    }

    Some((key.to_string(), target.to_string()))
}

/// Parses CSV content into a mapping according to the row rules of
/// [`CsvDataSource`].
///
/// # Errors
///
/// Returns [`SourceError::Malformed`] when the content is not valid CSV
/// (for example invalid UTF-8).
pub fn parse_mapping(data: &[u8], skip_header: bool) -> Result<Mapping, SourceError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(skip_header)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(data);

    let mut mapping = Mapping::new();
    for record in reader.records() {
        let record = record.map_err(|e| SourceError::Malformed(e.to_string()))?;
        if let Some((key, target)) = row_entry(&record) {
            mapping.insert(key, target);
        }
    }

    Ok(mapping)
}

#[async_trait]
impl DataSource for CsvDataSource {
    async fn fetch_mapping(&self) -> Result<Mapping, SourceError> {
        // Stamped before reading: a save that lands mid-read must look newer.
        let started = Utc::now();
        let modified = self.modified_time().await;
        let data = tokio::fs::read(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.clone(),
                source,
            })?;

        let mapping = parse_mapping(&data, self.skip_header)?;
        debug!(path = %self.path.display(), entries = mapping.len(), "Read CSV source");

        let mut times = self.times.write().unwrap_or_else(PoisonError::into_inner);
        times.last_update = Some(started);
        times.last_modified = modified;

        Ok(mapping)
    }

    async fn needs_update(&self) -> bool {
        if !self.check_modified {
            return true;
        }

        let Some(last_update) = self.times().last_update else {
            return true;
        };
        let Some(modified) = self.modified_time().await else {
            return true;
        };

        self.times
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .last_modified = Some(modified);

        modified > last_update
    }

    fn last_update(&self) -> Option<DateTime<Utc>> {
        self.times().last_update
    }

    fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.times().last_modified
    }

    fn id(&self) -> String {
        format!("csv:{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn write_source(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("links.csv");
        std::fs::write(&path, content).unwrap();
        path
    }

    fn touch_future(path: &Path) {
        let file = std::fs::OpenOptions::new().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(60))
            .unwrap();
    }

    #[test]
    fn test_parse_with_header() {
        let data = b"key,target,active\ndocs,https://example.com/docs,true\n";
        let mapping = parse_mapping(data, true).unwrap();

        assert_eq!(mapping.len(), 1);
        assert_eq!(
            mapping.get("docs").map(String::as_str),
            Some("https://example.com/docs")
        );
    }

    #[test]
    fn test_parse_without_header_keeps_first_row() {
        let data = b"docs,https://example.com/docs\nwiki,https://example.com/wiki\n";
        let mapping = parse_mapping(data, false).unwrap();

        assert_eq!(mapping.len(), 2);
    }

    #[test]
    fn test_parse_trims_fields() {
        let data = b" docs , https://example.com/docs , 1 \n";
        let mapping = parse_mapping(data, false).unwrap();

        assert_eq!(
            mapping.get("docs").map(String::as_str),
            Some("https://example.com/docs")
        );
    }

    #[test]
    fn test_parse_skips_incomplete_rows() {
        let data = b"only-key\n,https://example.com\nempty-target,\nok,https://ok\n";
        let mapping = parse_mapping(data, false).unwrap();

        assert_eq!(mapping.len(), 1);
        assert!(mapping.contains_key("ok"));
    }

    #[test]
    fn test_parse_active_column() {
        let data = b"a,https://a,TRUE\nb,https://b,false\nc,https://c,\nd,https://d,maybe\ne,https://e,0\n";
        let mapping = parse_mapping(data, false).unwrap();

        let mut keys: Vec<_> = mapping.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn test_parse_duplicate_keys_last_wins() {
        let data = b"a,https://first\na,https://second\n";
        let mapping = parse_mapping(data, false).unwrap();

        assert_eq!(mapping.get("a").map(String::as_str), Some("https://second"));
    }

    #[test]
    fn test_parse_invalid_utf8_is_malformed() {
        let data = b"a,\xff\xfe\n";
        let result = parse_mapping(data, false);

        assert!(matches!(result, Err(SourceError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_fetch_records_timestamps() {
        let dir = TempDir::new().unwrap();
        let path = write_source(&dir, "key,target\ndocs,https://example.com/docs\n");
        let source = CsvDataSource::new(&path);

        assert!(source.last_update().is_none());
        let mapping = source.fetch_mapping().await.unwrap();

        assert_eq!(mapping.len(), 1);
        assert!(source.last_update().is_some());
        assert!(source.last_modified().is_some());
    }

    #[tokio::test]
    async fn test_fetch_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let source = CsvDataSource::new(dir.path().join("missing.csv"));

        let result = source.fetch_mapping().await;

        assert!(matches!(result, Err(SourceError::Io { .. })));
        assert!(source.last_update().is_none());
    }

    #[tokio::test]
    async fn test_needs_update_follows_mtime() {
        let dir = TempDir::new().unwrap();
        let path = write_source(&dir, "key,target\ndocs,https://example.com/docs\n");
        let source = CsvDataSource::new(&path);

        assert!(source.needs_update().await, "never fetched");

        source.fetch_mapping().await.unwrap();
        assert!(!source.needs_update().await, "unchanged since fetch");

        touch_future(&path);
        assert!(source.needs_update().await, "modified after fetch");
    }

    #[tokio::test]
    async fn test_save_during_fetch_is_detected() {
        let dir = TempDir::new().unwrap();
        let rows: String = (0..20_000)
            .map(|i| format!("key{i},https://example.com/{i}\n"))
            .collect();
        let path = write_source(&dir, &format!("key,target\n{rows}"));
        let source = CsvDataSource::new(&path);

        let before = SystemTime::now();
        source.fetch_mapping().await.unwrap();
        let after = SystemTime::now();

        // A save landing halfway through the read and parse.
        let during = before + after.duration_since(before).unwrap() / 2;
        std::fs::write(&path, "key,target\nnew,https://example.com/new\n").unwrap();
        let file = std::fs::OpenOptions::new().write(true).open(&path).unwrap();
        file.set_modified(during).unwrap();

        assert!(
            source.needs_update().await,
            "a save after the fetch started must trigger a reload"
        );
    }

    #[tokio::test]
    async fn test_needs_update_without_mtime_check() {
        let dir = TempDir::new().unwrap();
        let path = write_source(&dir, "key,target\ndocs,https://example.com/docs\n");
        let source = CsvDataSource::new(&path).with_check_modified(false);

        source.fetch_mapping().await.unwrap();

        assert!(source.needs_update().await);
    }

    #[tokio::test]
    async fn test_needs_update_when_file_disappears() {
        let dir = TempDir::new().unwrap();
        let path = write_source(&dir, "key,target\ndocs,https://example.com/docs\n");
        let source = CsvDataSource::new(&path);

        source.fetch_mapping().await.unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(source.needs_update().await);
    }

    #[test]
    fn test_id_contains_path() {
        let source = CsvDataSource::new("/srv/links.csv");

        assert_eq!(source.id(), "csv:/srv/links.csv");
    }
}
