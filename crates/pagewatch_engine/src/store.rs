use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tempfile::NamedTempFile;
use thiserror::Error;

// Everything outside the RFC 3986 unreserved set is escaped, so two
// distinct URLs can never map to the same file name.
const BASELINE_KEY: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// File name under the baseline directory for a watched URL.
pub fn baseline_key(url: &str) -> String {
    utf8_percent_encode(url, BASELINE_KEY).to_string()
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("baseline directory missing or not writable: {0}")]
    Directory(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Persists the last-known visible text per URL, one file per URL.
///
/// The store is the only state that survives across runs. Concurrent
/// saves touch disjoint files (one task per URL per run), and each
/// save is a temp-file-then-rename so readers never observe a partial
/// baseline.
#[derive(Debug, Clone)]
pub struct BaselineStore {
    dir: PathBuf,
}

impl BaselineStore {
    /// Opens the store, creating the baseline directory if missing.
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        if dir.exists() {
            let meta = fs::metadata(dir).map_err(|e| StoreError::Directory(e.to_string()))?;
            if !meta.is_dir() {
                return Err(StoreError::Directory("path is not a directory".into()));
            }
        } else {
            fs::create_dir_all(dir).map_err(|e| StoreError::Directory(e.to_string()))?;
        }
        // Basic writability probe: try creating a temp file.
        NamedTempFile::new_in(dir).map_err(|e| StoreError::Directory(e.to_string()))?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Previously stored content for the URL; `Ok(None)` means the URL
    /// has never been seen, which is not an error.
    pub fn load(&self, url: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(url)) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::Io(err)),
        }
    }

    /// Persists content for the URL, replacing any prior baseline.
    pub fn save(&self, url: &str, content: &str) -> Result<(), StoreError> {
        let target = self.path_for(url);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        if target.exists() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }

    fn path_for(&self, url: &str) -> PathBuf {
        self.dir.join(baseline_key(url))
    }
}
