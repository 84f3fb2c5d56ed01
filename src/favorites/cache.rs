//! Durable per-user favorites cache.
//!
//! Liked builds are cached at `~/.autobuild/favorites/<user_id>.json`,
//! one file per user, independent of the remote store. The cache
//! survives restarts and is only ever touched from the single
//! interactive thread, so reads and writes are unlocked.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use super::FavoriteRecord;

/// File-backed favorites store, namespaced by user id.
pub struct FavoriteCache {
    cache_dir: PathBuf,
}

impl Default for FavoriteCache {
    fn default() -> Self {
        Self::new()
    }
}

impl FavoriteCache {
    /// Create a new favorites cache.
    ///
    /// Cache location: `~/.autobuild/favorites/`.
    pub fn new() -> Self {
        let cache_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".autobuild")
            .join("favorites");

        Self { cache_dir }
    }

    /// Cache with a custom directory (for testing).
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    fn cache_path(&self, user_id: i64) -> PathBuf {
        self.cache_dir.join(format!("{}.json", user_id))
    }

    /// All cached records for a user, in like order.
    ///
    /// A missing or unreadable file is an empty list, not an error.
    pub fn records(&self, user_id: i64) -> Vec<FavoriteRecord> {
        let path = self.cache_path(user_id);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(_) => return Vec::new(),
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// True iff the user's cache holds a record with this identity key.
    pub fn is_favorite(&self, user_id: i64, build_index: usize, total_price: f64) -> bool {
        self.records(user_id)
            .iter()
            .any(|r| r.same_identity(build_index as i64, total_price))
    }

    /// The cached record with this identity key, if any.
    pub fn find(&self, user_id: i64, build_index: usize, total_price: f64) -> Option<FavoriteRecord> {
        self.records(user_id)
            .into_iter()
            .find(|r| r.same_identity(build_index as i64, total_price))
    }

    /// Toggle a record: remove the existing one with the same identity
    /// key and return `false` (now unfavorited), or append the given
    /// record and return `true` (now favorited).
    ///
    /// This is a pure toggle, matching "click the heart twice":
    /// repeating the same call flips the state back.
    pub fn upsert_toggle(&self, user_id: i64, record: FavoriteRecord) -> Result<bool> {
        let mut records = self.records(user_id);
        let before = records.len();
        records.retain(|r| !r.same_identity(record.build_id, record.total_price));

        let favorited = records.len() == before;
        if favorited {
            records.push(record);
        }

        self.write(user_id, &records)?;
        Ok(favorited)
    }

    /// Replace a user's records wholesale; used to reconcile the cache
    /// with the remote list.
    pub fn replace_all(&self, user_id: i64, records: &[FavoriteRecord]) -> Result<()> {
        self.write(user_id, records)
    }

    fn write(&self, user_id: i64, records: &[FavoriteRecord]) -> Result<()> {
        fs::create_dir_all(&self.cache_dir).with_context(|| {
            format!(
                "Failed to create cache directory: {}",
                self.cache_dir.display()
            )
        })?;

        let content =
            serde_json::to_string_pretty(records).context("Failed to serialize favorites")?;

        let path = self.cache_path(user_id);
        fs::write(&path, content)
            .with_context(|| format!("Failed to write cache file: {}", path.display()))?;

        Ok(())
    }

    /// Remove all cached favorites files.
    pub fn clear(&self) -> Result<(usize, PathBuf), std::io::Error> {
        let dir = &self.cache_dir;
        let mut count = 0;

        if dir.is_dir() {
            for entry in fs::read_dir(dir)? {
                let entry = entry?;
                if entry.path().extension().and_then(|e| e.to_str()) == Some("json") {
                    count += 1;
                }
            }
            fs::remove_dir_all(dir)?;
        }

        Ok((count, dir.clone()))
    }
}
