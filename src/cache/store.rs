// TTL file cache: one JSON object on disk mapping fact key -> {data, timestamp}.
// Caching is an optimization only, so no filesystem or parse error ever
// reaches the caller; the worst case is a call to the fetch function.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::ttl::TtlTable;

/// One memoized fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub data: serde_json::Value,
    /// Epoch milliseconds at which `data` was fetched.
    pub timestamp: u64,
}

impl CacheEntry {
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.timestamp)
    }

    /// An entry is fresh iff `now - timestamp < ttl`.
    pub fn is_fresh(&self, ttl: Duration, now_ms: u64) -> bool {
        u128::from(self.age_ms(now_ms)) < ttl.as_millis()
    }
}

pub type CacheMap = BTreeMap<String, CacheEntry>;

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[derive(Debug, Clone)]
pub struct TtlCache {
    path: PathBuf,
    ttl: TtlTable,
}

impl TtlCache {
    pub fn new(path: impl Into<PathBuf>, ttl: TtlTable) -> Self {
        Self {
            path: path.into(),
            ttl,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn ttl(&self) -> &TtlTable {
        &self.ttl
    }

    /// Return the cached value for `key` if it is still fresh, otherwise call
    /// `fetch`, persist its value and return it.
    ///
    /// Errors from `fetch` are handed back untouched and are not cached, so a
    /// failing fact is retried on the next invocation.
    pub fn get_cached<T, E, F>(&self, key: &str, fetch: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Result<T, E>,
    {
        self.get_cached_at(key, now_millis(), fetch)
    }

    /// [`get_cached`](Self::get_cached) with an explicit clock.
    pub fn get_cached_at<T, E, F>(&self, key: &str, now_ms: u64, fetch: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Result<T, E>,
    {
        let mut entries = self.entries();

        if let Some(entry) = entries.get(key) {
            if entry.is_fresh(self.ttl.ttl_for(key), now_ms) {
                match serde_json::from_value::<T>(entry.data.clone()) {
                    Ok(value) => {
                        tracing::debug!(key, age_ms = entry.age_ms(now_ms), "cache hit");
                        return Ok(value);
                    }
                    Err(e) => tracing::debug!(key, error = %e, "cached entry has unexpected shape"),
                }
            }
        }

        tracing::debug!(key, "cache miss");
        let value = fetch()?;

        match serde_json::to_value(&value) {
            Ok(data) => {
                entries.insert(
                    key.to_string(),
                    CacheEntry {
                        data,
                        timestamp: now_ms,
                    },
                );
                if let Err(e) = self.store(&entries) {
                    tracing::debug!(path = %self.path.display(), error = %e, "cache write failed");
                }
            }
            Err(e) => tracing::debug!(key, error = %e, "value not serializable; skipping cache"),
        }

        Ok(value)
    }

    /// Parse the cache file. Absent, unreadable or corrupt files read as empty.
    pub fn entries(&self) -> CacheMap {
        match fs::read_to_string(&self.path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::debug!(path = %self.path.display(), error = %e, "corrupt cache file; treating as empty");
                CacheMap::new()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => CacheMap::new(),
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "cache file unreadable");
                CacheMap::new()
            }
        }
    }

    /// Delete the cache file. Returns `false` if there was nothing to delete.
    pub fn clear(&self) -> io::Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Write the whole mapping via a per-process temp file and rename.
    /// Concurrent writers race and the last rename wins; readers never see
    /// a partially written file.
    fn store(&self, entries: &CacheMap) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_vec_pretty(entries)?;
        let temp_path = temp_path_for(&self.path);

        let mut file = fs::File::create(&temp_path)?;
        file.write_all(&json)?;
        drop(file);

        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }
        Ok(())
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(".{}.tmp", std::process::id()));
    path.with_file_name(name)
}
