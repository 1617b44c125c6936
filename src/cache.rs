//! Single-slot cache for the last successful summary.
//!
//! The cache holds at most one entry. Storing replaces whatever was there;
//! there is no history and no eviction policy beyond "replace". The slot is
//! a JSON file so it survives restarts of the client. Each write goes to its
//! own uniquely named temp file in the same directory and is then renamed
//! over the slot, so a crash or a concurrent writer never leaves a
//! half-written slot behind.

use crate::response::SummaryResult;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::debug;

/// Errors from reading or writing the cache slot.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Failed to access cache file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cache file '{path}' is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// What the slot holds: the result plus where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedSummary {
    /// File name or URL the summary was produced from.
    pub source: String,
    /// Seconds since the Unix epoch when the entry was stored.
    pub stored_at: u64,
    pub result: SummaryResult,
}

/// A bounded cache with capacity one, backed by a file.
#[derive(Debug, Clone)]
pub struct LastResultCache {
    path: PathBuf,
}

impl LastResultCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Cache at the platform cache directory
    /// (e.g. `~/.cache/pdf-summarizer/last-summary.json`).
    ///
    /// Returns `None` when the platform has no cache directory.
    pub fn default_location() -> Option<Self> {
        dirs::cache_dir().map(|d| Self::new(d.join("pdf-summarizer").join("last-summary.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the slot's content with `result`.
    pub fn store(&self, source: &str, result: &SummaryResult) -> Result<(), CacheError> {
        let entry = CachedSummary {
            source: source.to_string(),
            stored_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
            result: result.clone(),
        };
        let json = serde_json::to_vec_pretty(&entry).map_err(|e| CacheError::Corrupt {
            path: self.path.clone(),
            source: e,
        })?;

        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(|e| self.io_err(e))?;
        tmp.write_all(&json).map_err(|e| self.io_err(e))?;
        tmp.persist(&self.path).map_err(|e| self.io_err(e.error))?;

        debug!("Stored last summary in {}", self.path.display());
        Ok(())
    }

    /// The current entry, or `None` if nothing has been stored yet.
    pub fn load(&self) -> Result<Option<CachedSummary>, CacheError> {
        let data = match std::fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_err(e)),
        };
        serde_json::from_slice(&data)
            .map(Some)
            .map_err(|e| CacheError::Corrupt {
                path: self.path.clone(),
                source: e,
            })
    }

    /// Empty the slot. Clearing an empty slot is not an error.
    pub fn clear(&self) -> Result<(), CacheError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_err(e)),
        }
    }

    fn io_err(&self, source: io::Error) -> CacheError {
        CacheError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
