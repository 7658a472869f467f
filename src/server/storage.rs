//! On-disk storage for the single plan document.
//!
//! The document is one UTF-8 text file. A missing file reads as
//! [`DEFAULT_TEMPLATE`]; the template is not written back until someone
//! pushes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::digest::Digest;

/// Document served when nothing has been saved yet.
pub const DEFAULT_TEMPLATE: &str = "\
# Daily plan
#
# Lines starting with # are comments.
# Header lines:  Goal: ...   Reason: ...   Calorie Target: 1800
# Schedule lines: HH:MM | description (calories like 250 kcal are counted)

Goal: Stay on plan
Reason: Feel good tomorrow
Calorie Target: 1800

07:30 | Breakfast (400 kcal)
12:30 | Lunch (600 kcal)
15:30 | Snack (200 kcal)
19:00 | Dinner (600 kcal)
";

/// Errors that can occur reading or writing the document.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error for {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] io::Error),
}

/// The canonical copy of the document on disk.
#[derive(Debug, Clone)]
pub struct ContentStore {
    path: PathBuf,
}

impl ContentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the current content and its digest.
    pub fn read(&self) -> Result<(String, Digest), StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => DEFAULT_TEMPLATE.to_string(),
            Err(e) => return Err(StoreError::Io(self.path.clone(), e)),
        };
        let digest = Digest::of(&content);
        Ok((content, digest))
    }

    /// Replaces the document and returns the digest of the new content.
    ///
    /// Written to a sibling temp file and renamed into place, so a reader
    /// sees either the old or the new file.
    pub fn write(&self, content: &str) -> Result<Digest, StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::Io(parent.to_path_buf(), e))?;
        }

        let temp_path = self.temp_path();
        fs::write(&temp_path, content).map_err(|e| StoreError::Io(temp_path.clone(), e))?;
        fs::rename(&temp_path, &self.path).map_err(|e| StoreError::Io(self.path.clone(), e))?;

        Ok(Digest::of(content))
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "document".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (ContentStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = ContentStore::new(temp_dir.path().join("reminders.txt"));
        (store, temp_dir)
    }

    #[test]
    fn test_read_missing_returns_template() {
        let (store, _temp) = setup();

        let (content, digest) = store.read().unwrap();
        assert_eq!(content, DEFAULT_TEMPLATE);
        assert_eq!(digest, Digest::of(DEFAULT_TEMPLATE));
    }

    #[test]
    fn test_read_missing_does_not_create_file() {
        let (store, _temp) = setup();

        store.read().unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_write_and_read_roundtrip() {
        let (store, _temp) = setup();

        let written = store.write("08:00 | Coffee").unwrap();
        let (content, digest) = store.read().unwrap();

        assert_eq!(content, "08:00 | Coffee");
        assert_eq!(digest, written);
    }

    #[test]
    fn test_write_overwrites_in_place() {
        let (store, temp) = setup();

        store.write("first").unwrap();
        store.write("second").unwrap();

        assert_eq!(store.read().unwrap().0, "second");
        let entries: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1, "temp file should be renamed away");
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let store = ContentStore::new(temp_dir.path().join("nested").join("plan.txt"));

        store.write("Goal: Fast").unwrap();
        assert!(temp_dir.path().join("nested").join("plan.txt").exists());
    }

    #[test]
    fn test_empty_document_is_not_the_template() {
        let (store, _temp) = setup();

        store.write("").unwrap();
        let (content, digest) = store.read().unwrap();
        assert_eq!(content, "");
        assert_eq!(digest, Digest::of(""));
    }

    #[test]
    fn test_read_error_is_surfaced() {
        let temp_dir = TempDir::new().unwrap();
        // A directory where the file should be.
        let store = ContentStore::new(temp_dir.path());

        let err = store.read().unwrap_err();
        assert!(matches!(err, StoreError::Io(_, _)));
        assert!(err.to_string().starts_with("I/O error for"));
    }

    #[test]
    fn test_template_parses() {
        let plan = crate::parser::parse(
            DEFAULT_TEMPLATE,
            chrono::NaiveDate::from_ymd_opt(2025, 1, 1)
                .unwrap()
                .and_hms_opt(13, 0, 0)
                .unwrap(),
        );
        assert_eq!(plan.metadata.calorie_target, Some(1800));
        assert_eq!(plan.calories_consumed, 1000);
        assert_eq!(plan.upcoming.len(), 2);
    }
}
