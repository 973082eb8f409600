//! Cache storage module
//!
//! This module provides persistent caching functionality using the system's
//! standard cache directory. Data is serialized to JSON format for storage and
//! every entry carries the time it was written, so entries older than the
//! storage's freshness window load as a miss.

use serde::{Deserialize, Serialize};
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Errors that can occur during cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    /// Failed to determine cache directory location
    #[error("Failed to determine cache directory location")]
    CacheDirectoryNotFound,

    /// Failed to create or access cache directory
    #[error("Failed to create cache directory at {path}: {source}")]
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to read cached data
    #[error("Failed to read cache file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write cached data
    #[error("Failed to write cache file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to deserialize cached data
    #[error("Failed to deserialize cache file {path}: {source}")]
    DeserializationFailed {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Failed to serialize data for caching
    #[error("Failed to serialize data: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// On-disk envelope around a cached value.
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry<T> {
    /// Seconds since the Unix epoch at which the entry was written
    stored_at: u64,
    data: T,
}

/// Just the timestamp of an entry, for pruning without knowing its data type.
#[derive(Debug, Deserialize)]
struct EntryStamp {
    stored_at: u64,
}

/// A generic cache storage for serializable data
///
/// This structure provides persistent caching of data that implements
/// `Serialize` and `Deserialize`. Data is stored as JSON files in the
/// system's standard cache directory.
pub(crate) struct CacheStorage<T> {
    /// The directory where cached data is stored
    cache_dir: PathBuf,
    /// Maximum age of an entry before it is treated as missing (None = never expires)
    ttl: Option<Duration>,
    /// Phantom data for the generic type
    _phantom: PhantomData<T>,
}

impl<T> CacheStorage<T>
where
    T: Serialize + for<'de> Deserialize<'de>,
{
    /// Opens or creates a cache storage with the given name
    ///
    /// The cache will be stored in the system's standard cache directory
    /// under a subdirectory named after the application and the provided name.
    /// The name will be sanitized (lowercased, non-alphanumeric characters
    /// replaced with underscores).
    ///
    /// # Arguments
    ///
    /// * `name` - The name for this cache storage
    /// * `ttl` - Freshness window for entries, or None to keep them forever
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let cache: CacheStorage<String> =
    ///     CacheStorage::open("responses", Some(Duration::from_secs(3600)))?;
    /// ```
    pub fn open(name: &str, ttl: Option<Duration>) -> Result<Self, CacheError> {
        let proj_dirs = directories::ProjectDirs::from("net", "sportarr", "sportarr-agent")
            .ok_or(CacheError::CacheDirectoryNotFound)?;

        Self::open_in(proj_dirs.cache_dir(), name, ttl)
    }

    /// Opens or creates a cache storage below an explicit root directory
    pub fn open_in(root: &Path, name: &str, ttl: Option<Duration>) -> Result<Self, CacheError> {
        let cache_dir = root.join(sanitize_name(name));

        fs::create_dir_all(&cache_dir).map_err(|e| CacheError::DirectoryCreationFailed {
            path: cache_dir.clone(),
            source: e,
        })?;

        Ok(Self {
            cache_dir,
            ttl,
            _phantom: PhantomData,
        })
    }

    /// Loads cached data for the given identifier
    ///
    /// Returns `Ok(None)` if nothing is stored under the identifier or the
    /// stored entry is older than the freshness window; stale entries are
    /// deleted. Returns an error if the data exists but cannot be read or
    /// deserialized.
    pub fn load(&self, identifier: &str) -> Result<Option<T>, CacheError> {
        let file_path = self.entry_path(identifier);

        if !file_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&file_path).map_err(|e| CacheError::ReadFailed {
            path: file_path.clone(),
            source: e,
        })?;

        let entry: CacheEntry<T> =
            serde_json::from_str(&content).map_err(|e| CacheError::DeserializationFailed {
                path: file_path.clone(),
                source: e,
            })?;

        if !is_fresh(entry.stored_at, unix_now(), self.ttl) {
            if let Err(e) = fs::remove_file(&file_path) {
                log::debug!("Failed to remove stale cache file {}: {e}", file_path.display());
            }
            return Ok(None);
        }

        Ok(Some(entry.data))
    }

    /// Stores data in the cache with the given identifier
    pub fn store(&self, identifier: &str, data: &T) -> Result<(), CacheError> {
        let file_path = self.entry_path(identifier);

        let entry = CacheEntry {
            stored_at: unix_now(),
            data,
        };
        let content = serde_json::to_string(&entry)?;

        fs::write(&file_path, content).map_err(|e| CacheError::WriteFailed {
            path: file_path,
            source: e,
        })?;

        Ok(())
    }

    /// Deletes every entry that is stale or unreadable
    ///
    /// Returns the number of files removed. Files that cannot be removed are
    /// skipped.
    pub fn prune(&self) -> Result<usize, CacheError> {
        let entries = fs::read_dir(&self.cache_dir).map_err(|e| CacheError::ReadFailed {
            path: self.cache_dir.clone(),
            source: e,
        })?;

        let now = unix_now();
        let mut removed = 0;

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }

            let stale = fs::read_to_string(&path)
                .ok()
                .and_then(|content| serde_json::from_str::<EntryStamp>(&content).ok())
                .is_none_or(|stamp| !is_fresh(stamp.stored_at, now, self.ttl));

            if stale && fs::remove_file(&path).is_ok() {
                removed += 1;
            }
        }

        Ok(removed)
    }

    /// Returns the path to the cache directory
    pub fn cache_dir(&self) -> &PathBuf {
        &self.cache_dir
    }

    fn entry_path(&self, identifier: &str) -> PathBuf {
        self.cache_dir
            .join(format!("{}.json", sanitize_name(identifier)))
    }
}

/// Whether an entry written at `stored_at` is still within `ttl` at `now`.
fn is_fresh(stored_at: u64, now: u64, ttl: Option<Duration>) -> bool {
    match ttl {
        None => true,
        Some(ttl) => now.saturating_sub(stored_at) < ttl.as_secs(),
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Sanitizes a name for use in file paths
///
/// Converts to lowercase and replaces all characters that are not
/// a-z, 0-9, or hyphen with underscores. URLs are used as identifiers, so
/// distinct URLs can collide after sanitizing; callers that need exact keys
/// store the original key inside the cached value.
fn sanitize_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
