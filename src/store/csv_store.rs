//! File-backed record store.
//!
//! [`CsvStore`] is the sole authority over the backing CSV file. Every
//! operation re-opens and scans the file from the start; there is no index
//! and no in-process cache. Reads are linear scans; `create` appends one
//! row; `update` and `destroy` rewrite the whole file into a temporary
//! sibling and atomically rename it over the primary, so a crash mid-rewrite
//! never corrupts the primary file.
//!
//! There is no locking: at most one writer is assumed active at a time.
//! Concurrent rewrites race, last rename wins, and a writer working from a
//! stale copy silently loses the other writer's changes. That limitation is
//! documented here rather than fixed.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use crate::error::PokedexError;

use super::params::{Draft, PokemonParams, UPDATE_PERMITTED};
use super::record::{Pokemon, NAME_COLUMN};

/// Default page index when the `page` query param is missing or unparsable.
pub const DEFAULT_PAGE: usize = 0;

/// Default page size when the `per_page` query param is missing or unparsable.
pub const DEFAULT_PER_PAGE: usize = 20;

/// Paths the store operates on.
///
/// Replaces global file-path state with explicit configuration handed to the
/// store at construction: the primary backing file plus the temporary
/// sibling used transiently during rewrites. The temp file must never
/// persist between operations; it is either renamed over the primary or
/// removed on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// The backing CSV file, the sole persistent store.
    pub path: PathBuf,
    /// Scratch path for the rewrite step of update/destroy.
    pub tmp_path: PathBuf,
}

impl StoreConfig {
    /// Configuration with the default temp path, `<stem>_tmp.<ext>` next to
    /// the primary file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let tmp_path = default_tmp_path(&path);
        StoreConfig { path, tmp_path }
    }

    /// Configuration with an explicit temp path.
    pub fn with_tmp_path(path: impl Into<PathBuf>, tmp_path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            path: path.into(),
            tmp_path: tmp_path.into(),
        }
    }
}

/// Derives the temp sibling for a primary path: `database.csv` becomes
/// `database_tmp.csv` in the same directory.
fn default_tmp_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("database");
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => path.with_file_name(format!("{stem}_tmp.{ext}")),
        None => path.with_file_name(format!("{stem}_tmp")),
    }
}

/// What the rewrite pass does with one existing row.
enum RowAction {
    /// Carry the row through unchanged.
    Keep,
    /// Emit these fields instead of the row.
    Replace([String; 13]),
    /// Drop the row.
    Skip,
}

/// The CSV-backed record store.
///
/// All operations are synchronous, blocking, and stateless between calls.
/// The store assumes the backing file exists, is well-formed CSV with the
/// expected header, and is not concurrently modified by another writer; any
/// I/O failure or malformed row surfaces as an error the caller treats as
/// unexpected.
#[derive(Debug, Clone)]
pub struct CsvStore {
    config: StoreConfig,
}

impl CsvStore {
    /// Creates a store over the given paths. The backing file is not opened
    /// until the first operation.
    pub fn new(config: StoreConfig) -> Self {
        CsvStore { config }
    }

    /// The store's path configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Opens a fresh headered reader over the backing file.
    fn reader(&self) -> Result<csv::Reader<std::fs::File>, PokedexError> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.config.path)?;
        Ok(reader)
    }

    /// Finds the first record whose name equals `name`, scanning in file
    /// order.
    ///
    /// # Errors
    ///
    /// [`PokedexError::RecordNotFound`] when the scan completes without a
    /// match.
    pub fn find_by_name(&self, name: &str) -> Result<Pokemon, PokedexError> {
        let mut reader = self.reader()?;
        for result in reader.records() {
            let record = result?;
            if record.get(NAME_COLUMN) == Some(name) {
                return Pokemon::from_csv(&record);
            }
        }
        Err(PokedexError::RecordNotFound)
    }

    /// True when no existing record carries `name`. Short-circuits on the
    /// first hit, unlike the field validation checks.
    pub fn is_name_unique(&self, name: &str) -> Result<bool, PokedexError> {
        let mut reader = self.reader()?;
        for result in reader.records() {
            let record = result?;
            if record.get(NAME_COLUMN) == Some(name) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Returns one page of records in file order.
    ///
    /// Records with zero-based index in `[page * per_page, (page+1) *
    /// per_page)` are included. The scan stops as soon as the index passes
    /// the end of the page, so the cost is bounded by the page's end rather
    /// than the file length. A page past the last record is empty; bounds
    /// saturate, so an absurdly large page index is just past the end too.
    pub fn page(&self, page: usize, per_page: usize) -> Result<Vec<Pokemon>, PokedexError> {
        let start = page.saturating_mul(per_page);
        let end = start.saturating_add(per_page);

        let mut results = Vec::new();
        let mut reader = self.reader()?;
        for (index, result) in reader.records().enumerate() {
            if index >= end {
                break;
            }
            if index >= start {
                results.push(Pokemon::from_csv(&result?)?);
            }
        }

        Ok(results)
    }

    /// Creates a record from params and appends it to the backing file.
    ///
    /// The params pass through the create allow-list, then validation with
    /// the uniqueness check: presence and numeric errors accumulate, and a
    /// taken name appends `"The name must be unique"`.
    ///
    /// # Errors
    ///
    /// [`PokedexError::RecordInvalid`] carrying the comma-joined messages
    /// when any check fails.
    pub fn create(&self, params: &PokemonParams) -> Result<Pokemon, PokedexError> {
        let draft = Draft::from_params(params);

        let mut errors = draft.validate();
        if let Some(name) = draft.name() {
            if !self.is_name_unique(name)? {
                errors.push("The name must be unique".to_string());
            }
        }
        if !errors.is_empty() {
            return Err(PokedexError::RecordInvalid(errors.join(",")));
        }

        let record = draft
            .into_record()
            .map_err(|e| PokedexError::RecordInvalid(e.join(",")))?;

        let file = OpenOptions::new().append(true).open(&self.config.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record(&record.csv_fields())?;
        writer.flush()?;

        tracing::debug!(name = %record.name, "Created record");
        Ok(record)
    }

    /// Updates the record named `name` in place.
    ///
    /// Params pass through the update allow-list, which omits `name`: the
    /// key can never change. Uniqueness is not re-checked. On success the
    /// whole file is rewritten: the header verbatim, the matching row
    /// replaced with the updated serialization, every other row carried
    /// through in its original relative order, then the temp file atomically
    /// replaces the primary.
    ///
    /// # Errors
    ///
    /// [`PokedexError::RecordNotFound`] when no record carries `name`;
    /// [`PokedexError::RecordInvalid`] when the merged record fails
    /// validation.
    pub fn update(&self, name: &str, params: &PokemonParams) -> Result<Pokemon, PokedexError> {
        let target = self.find_by_name(name)?;

        let mut draft = Draft::from_record(&target);
        draft.apply(params, &UPDATE_PERMITTED);

        let errors = draft.validate();
        if !errors.is_empty() {
            return Err(PokedexError::RecordInvalid(errors.join(",")));
        }
        let record = draft
            .into_record()
            .map_err(|e| PokedexError::RecordInvalid(e.join(",")))?;

        let fields = record.csv_fields();
        self.rewrite(|row| {
            if row.get(NAME_COLUMN) == Some(name) {
                RowAction::Replace(fields.clone())
            } else {
                RowAction::Keep
            }
        })?;

        tracing::debug!(name = %record.name, "Updated record");
        Ok(record)
    }

    /// Removes the record named `name` from the backing file.
    ///
    /// Same rewrite procedure as [`CsvStore::update`], but the matching row
    /// is omitted entirely. Destroying a name that no longer exists rewrites
    /// the file with identical content; the API layer fetches first, so a
    /// missing name is reported there.
    pub fn destroy(&self, name: &str) -> Result<(), PokedexError> {
        self.rewrite(|row| {
            if row.get(NAME_COLUMN) == Some(name) {
                RowAction::Skip
            } else {
                RowAction::Keep
            }
        })?;

        tracing::debug!(name = %name, "Destroyed record");
        Ok(())
    }

    /// Rewrites the backing file through the temp path, then atomically
    /// renames it over the primary. On failure the temp file is removed
    /// best-effort so it never persists between operations.
    fn rewrite<F>(&self, transform: F) -> Result<(), PokedexError>
    where
        F: FnMut(&csv::StringRecord) -> RowAction,
    {
        let result = self.rewrite_inner(transform);
        if result.is_err() {
            let _ = std::fs::remove_file(&self.config.tmp_path);
        }
        result
    }

    fn rewrite_inner<F>(&self, mut transform: F) -> Result<(), PokedexError>
    where
        F: FnMut(&csv::StringRecord) -> RowAction,
    {
        let mut reader = self.reader()?;
        let headers = reader.headers()?.clone();

        let mut writer = csv::Writer::from_path(&self.config.tmp_path)?;
        writer.write_record(&headers)?;

        for result in reader.records() {
            let row = result?;
            match transform(&row) {
                RowAction::Keep => writer.write_record(&row)?,
                RowAction::Replace(fields) => writer.write_record(&fields)?,
                RowAction::Skip => {}
            }
        }

        writer.flush()?;
        drop(writer);

        std::fs::rename(&self.config.tmp_path, &self.config.path)?;
        Ok(())
    }
}

/// Coerces a raw query param into a page index or size.
///
/// Missing, non-numeric, and negative values all fall back to the default;
/// this is the "parse as integer, default on failure" rule applied to both
/// `page` (default 0) and `per_page` (default 20).
pub fn parse_page_param(raw: Option<&str>, default: usize) -> usize {
    match raw {
        Some(value) => value.trim().parse::<usize>().unwrap_or(default),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tmp_path_keeps_extension() {
        let config = StoreConfig::new("/data/database.csv");
        assert_eq!(config.tmp_path, PathBuf::from("/data/database_tmp.csv"));
    }

    #[test]
    fn test_default_tmp_path_without_extension() {
        let config = StoreConfig::new("/data/records");
        assert_eq!(config.tmp_path, PathBuf::from("/data/records_tmp"));
    }

    #[test]
    fn test_explicit_tmp_path() {
        let config = StoreConfig::with_tmp_path("a.csv", "b.csv");
        assert_eq!(config.tmp_path, PathBuf::from("b.csv"));
    }

    #[test]
    fn test_parse_page_param_defaults() {
        assert_eq!(parse_page_param(None, 0), 0);
        assert_eq!(parse_page_param(None, 20), 20);
    }

    #[test]
    fn test_parse_page_param_valid_values() {
        assert_eq!(parse_page_param(Some("3"), 0), 3);
        assert_eq!(parse_page_param(Some("50"), 20), 50);
        assert_eq!(parse_page_param(Some("0"), 20), 0);
    }

    #[test]
    fn test_parse_page_param_rejects_garbage_and_negatives() {
        assert_eq!(parse_page_param(Some("abc"), 20), 20);
        assert_eq!(parse_page_param(Some("-1"), 0), 0);
        assert_eq!(parse_page_param(Some("1.5"), 20), 20);
        assert_eq!(parse_page_param(Some(""), 20), 20);
    }
}
