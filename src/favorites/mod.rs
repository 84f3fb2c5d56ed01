//! Favorited builds: identity, durable local cache, and remote sync.

mod cache;
mod sync;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::builds::{normalize_build, Build, Part};

pub use cache::FavoriteCache;
pub use sync::{FavoriteSync, SyncError};

/// One favorited build, snapshotted at like-time.
///
/// Records are immutable: a like creates one, an unlike removes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteRecord {
    /// Index of the build within its collection when it was liked.
    pub build_id: i64,
    /// Backend-supplied total at like-time.
    pub total_price: f64,
    /// Use-case label at like-time.
    #[serde(default)]
    pub category: String,
    /// The user's original free-text request, if available.
    #[serde(default)]
    pub needs: String,
    /// Parts snapshot at like-time.
    #[serde(default)]
    pub parts: Vec<Part>,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
    /// Row id assigned by the remote store, once known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<i64>,
}

impl FavoriteRecord {
    /// Snapshot a build as a favorite. Explicit context wins over what
    /// the build itself carries, when present.
    pub fn snapshot(build: &Build, build_index: usize, category: &str, needs: &str) -> Self {
        let category = if category.is_empty() {
            build.category_label().to_string()
        } else {
            category.to_string()
        };
        let needs = if needs.is_empty() {
            build.needs.clone()
        } else {
            needs.to_string()
        };

        Self {
            build_id: build_index as i64,
            total_price: build.total_price,
            category,
            needs,
            parts: build.parts.clone(),
            timestamp: Utc::now(),
            remote_id: None,
        }
    }

    /// Rebuild a record from a raw remote favorites row.
    ///
    /// The row doubles as a raw build payload, so its parts are
    /// recovered through the same fallback chain a freshly generated
    /// build goes through.
    pub fn from_remote(row: &Value) -> Self {
        let build = normalize_build(row);

        Self {
            build_id: row.get("build_id").and_then(Value::as_i64).unwrap_or(0),
            total_price: build.total_price,
            category: build.category_label().to_string(),
            needs: build.needs,
            parts: build.parts,
            timestamp: parse_created_at(row.get("created_at").and_then(Value::as_str)),
            remote_id: row.get("id").and_then(Value::as_i64),
        }
    }

    /// Whether this record names the same favorite as the given key.
    ///
    /// Identity is the (collection index, total price) pair the stored
    /// records have always used. The key is positional: two distinct
    /// builds sharing an index and a total collide.
    pub fn same_identity(&self, build_id: i64, total_price: f64) -> bool {
        self.build_id == build_id && self.total_price == total_price
    }
}

/// Remote rows carry `created_at` either RFC 3339 or in the database's
/// space-separated form.
fn parse_created_at(raw: Option<&str>) -> DateTime<Utc> {
    let Some(raw) = raw else { return Utc::now() };

    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return t.with_timezone(&Utc);
    }
    if let Ok(t) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return t.and_utc();
    }
    Utc::now()
}
