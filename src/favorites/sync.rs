//! Write-through favorite toggling against the remote store.
//!
//! The heart toggle confirms with the remote API before touching the
//! local cache, so the two stores never diverge: a failed request
//! leaves both unchanged and the user simply clicks again.

use serde_json::json;
use thiserror::Error;

use crate::api::FavoritesRemote;
use crate::builds::Build;
use crate::session::UserSession;

use super::{FavoriteCache, FavoriteRecord};

/// Why a favorites operation did not happen.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Guests and signed-out users have no favorites scope; the caller
    /// should send them to the login flow.
    #[error("favoriting requires a signed-in account")]
    NotAuthenticated,
    /// The remote store rejected or never received the write. The local
    /// cache was not touched, so retrying the toggle is safe.
    #[error("favorites request failed: {0}")]
    RemoteWrite(#[source] anyhow::Error),
    /// The remote write succeeded but the local cache could not be
    /// updated.
    #[error("favorites cache update failed: {0}")]
    Cache(#[source] anyhow::Error),
}

/// Orchestrates the heart toggle: remote write first, local cache
/// second.
pub struct FavoriteSync<'a, R: FavoritesRemote> {
    remote: &'a R,
    cache: &'a FavoriteCache,
}

impl<'a, R: FavoritesRemote> FavoriteSync<'a, R> {
    pub fn new(remote: &'a R, cache: &'a FavoriteCache) -> Self {
        Self { remote, cache }
    }

    /// Current liked-state for the build at `build_index`. Guests are
    /// never liked.
    pub fn is_liked(
        &self,
        user: Option<&UserSession>,
        build_index: usize,
        total_price: f64,
    ) -> bool {
        match user {
            Some(user) if !user.is_guest => {
                self.cache.is_favorite(user.id, build_index, total_price)
            }
            _ => false,
        }
    }

    /// Toggle the favorite state of `build`, returning the new state.
    ///
    /// Rejects guests before any network or cache effect. The remote
    /// write happens first and the cache is only mutated once the
    /// remote confirms.
    pub fn toggle(
        &self,
        user: Option<&UserSession>,
        build: &Build,
        build_index: usize,
        category: &str,
        needs: &str,
    ) -> Result<bool, SyncError> {
        let user = authenticated(user)?;

        match self.cache.find(user.id, build_index, build.total_price) {
            Some(existing) => {
                let remote_id = match existing.remote_id {
                    Some(id) => Some(id),
                    // Record predates the row id; re-resolve it by
                    // identity before deleting.
                    None => self.resolve_remote_id(user.id, &existing)?,
                };
                if let Some(id) = remote_id {
                    self.remote
                        .delete(user.id, id)
                        .map_err(SyncError::RemoteWrite)?;
                }
                self.cache
                    .upsert_toggle(user.id, existing)
                    .map_err(SyncError::Cache)?;
                Ok(false)
            }
            None => {
                let mut record = FavoriteRecord::snapshot(build, build_index, category, needs);
                let build_data = json!({
                    "needs": record.needs,
                    "description": build.description,
                    "category": record.category,
                    "total_price": record.total_price,
                    "parts": record.parts,
                });

                record.remote_id = self
                    .remote
                    .create(user.id, &build_data.to_string())
                    .map_err(SyncError::RemoteWrite)?;

                self.cache
                    .upsert_toggle(user.id, record)
                    .map_err(SyncError::Cache)?;
                Ok(true)
            }
        }
    }

    /// Fetch the remote favorites and reconcile the local cache to
    /// match. Returns the reconciled records.
    pub fn refresh(&self, user: Option<&UserSession>) -> Result<Vec<FavoriteRecord>, SyncError> {
        let user = authenticated(user)?;

        let rows = self
            .remote
            .list(user.id)
            .map_err(SyncError::RemoteWrite)?;
        let records: Vec<FavoriteRecord> = rows.iter().map(FavoriteRecord::from_remote).collect();

        self.cache
            .replace_all(user.id, &records)
            .map_err(SyncError::Cache)?;
        Ok(records)
    }

    fn resolve_remote_id(
        &self,
        user_id: i64,
        record: &FavoriteRecord,
    ) -> Result<Option<i64>, SyncError> {
        let rows = self
            .remote
            .list(user_id)
            .map_err(SyncError::RemoteWrite)?;

        Ok(rows
            .iter()
            .map(FavoriteRecord::from_remote)
            .find(|row| row.same_identity(record.build_id, record.total_price))
            .and_then(|row| row.remote_id))
    }
}

fn authenticated(user: Option<&UserSession>) -> Result<&UserSession, SyncError> {
    match user {
        Some(user) if !user.is_guest => Ok(user),
        _ => Err(SyncError::NotAuthenticated),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use serde_json::{json, Value};
    use tempfile::TempDir;

    use super::*;
    use crate::builds::Part;

    /// Remote double that records every call and can be told to fail.
    struct FakeRemote {
        fail: bool,
        rows: Vec<Value>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeRemote {
        fn new() -> Self {
            Self {
                fail: false,
                rows: Vec::new(),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new()
            }
        }
    }

    impl FavoritesRemote for FakeRemote {
        fn list(&self, _user_id: i64) -> anyhow::Result<Vec<Value>> {
            self.calls.borrow_mut().push("list".to_string());
            if self.fail {
                anyhow::bail!("connection refused");
            }
            Ok(self.rows.clone())
        }

        fn create(&self, _user_id: i64, _build_data: &str) -> anyhow::Result<Option<i64>> {
            self.calls.borrow_mut().push("create".to_string());
            if self.fail {
                anyhow::bail!("connection refused");
            }
            Ok(Some(77))
        }

        fn delete(&self, _user_id: i64, favorite_id: i64) -> anyhow::Result<()> {
            self.calls.borrow_mut().push(format!("delete {favorite_id}"));
            if self.fail {
                anyhow::bail!("connection refused");
            }
            Ok(())
        }
    }

    fn sample_build() -> Build {
        Build {
            parts: vec![Part {
                part_type: "cpu".to_string(),
                display_type: "CPU".to_string(),
                name: "Ryzen 5 5600".to_string(),
                price: 199.99,
                ..Part::default()
            }],
            total_price: 199.99,
            category: "Gaming".to_string(),
            ..Build::default()
        }
    }

    #[test]
    fn test_guest_toggle_touches_nothing() {
        let dir = TempDir::new().unwrap();
        let cache = FavoriteCache::with_dir(dir.path().to_path_buf());
        let remote = FakeRemote::new();
        let sync = FavoriteSync::new(&remote, &cache);
        let guest = UserSession {
            id: 3,
            is_guest: true,
        };

        let err = sync
            .toggle(Some(&guest), &sample_build(), 0, "", "")
            .unwrap_err();

        assert!(matches!(err, SyncError::NotAuthenticated));
        assert!(remote.calls.borrow().is_empty());
        assert!(cache.records(3).is_empty());
    }

    #[test]
    fn test_signed_out_toggle_touches_nothing() {
        let dir = TempDir::new().unwrap();
        let cache = FavoriteCache::with_dir(dir.path().to_path_buf());
        let remote = FakeRemote::new();
        let sync = FavoriteSync::new(&remote, &cache);

        let err = sync.toggle(None, &sample_build(), 0, "", "").unwrap_err();

        assert!(matches!(err, SyncError::NotAuthenticated));
        assert!(remote.calls.borrow().is_empty());
    }

    #[test]
    fn test_toggle_on_then_off_round_trips() {
        let dir = TempDir::new().unwrap();
        let cache = FavoriteCache::with_dir(dir.path().to_path_buf());
        let remote = FakeRemote::new();
        let sync = FavoriteSync::new(&remote, &cache);
        let user = UserSession {
            id: 7,
            is_guest: false,
        };
        let build = sample_build();

        assert!(sync.toggle(Some(&user), &build, 0, "Gaming", "").unwrap());
        let records = cache.records(7);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].remote_id, Some(77));
        assert!(sync.is_liked(Some(&user), 0, 199.99));

        assert!(!sync.toggle(Some(&user), &build, 0, "Gaming", "").unwrap());
        assert!(cache.records(7).is_empty());
        assert!(!sync.is_liked(Some(&user), 0, 199.99));

        let calls = remote.calls.borrow();
        assert_eq!(*calls, ["create", "delete 77"]);
    }

    #[test]
    fn test_remote_failure_leaves_cache_untouched() {
        let dir = TempDir::new().unwrap();
        let cache = FavoriteCache::with_dir(dir.path().to_path_buf());
        let remote = FakeRemote::failing();
        let sync = FavoriteSync::new(&remote, &cache);
        let user = UserSession {
            id: 7,
            is_guest: false,
        };

        let err = sync
            .toggle(Some(&user), &sample_build(), 0, "", "")
            .unwrap_err();

        assert!(matches!(err, SyncError::RemoteWrite(_)));
        assert!(cache.records(7).is_empty());
        assert!(!sync.is_liked(Some(&user), 0, 199.99));
    }

    #[test]
    fn test_unlike_resolves_missing_row_id_from_remote() {
        let dir = TempDir::new().unwrap();
        let cache = FavoriteCache::with_dir(dir.path().to_path_buf());
        let build = sample_build();

        // A cached record from before row ids were captured.
        let mut stale = FavoriteRecord::snapshot(&build, 0, "Gaming", "");
        stale.remote_id = None;
        cache.replace_all(7, &[stale]).unwrap();

        let remote = FakeRemote {
            rows: vec![json!({
                "id": 41,
                "build_id": 0,
                "total_price": 199.99,
            })],
            ..FakeRemote::new()
        };
        let sync = FavoriteSync::new(&remote, &cache);
        let user = UserSession {
            id: 7,
            is_guest: false,
        };

        assert!(!sync.toggle(Some(&user), &build, 0, "", "").unwrap());
        assert!(cache.records(7).is_empty());

        let calls = remote.calls.borrow();
        assert_eq!(*calls, ["list", "delete 41"]);
    }

    #[test]
    fn test_refresh_reconciles_cache_from_remote() {
        let dir = TempDir::new().unwrap();
        let cache = FavoriteCache::with_dir(dir.path().to_path_buf());
        let user = UserSession {
            id: 7,
            is_guest: false,
        };

        // Locally cached like that no longer exists remotely.
        cache
            .replace_all(7, &[FavoriteRecord::snapshot(&sample_build(), 9, "", "")])
            .unwrap();

        let remote = FakeRemote {
            rows: vec![json!({
                "id": 5,
                "build_id": 1,
                "total_price": 640.0,
                "parts": [{ "partType": "gpu", "name": "RTX 4060", "price": 320.0 }],
            })],
            ..FakeRemote::new()
        };
        let sync = FavoriteSync::new(&remote, &cache);

        let records = sync.refresh(Some(&user)).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].remote_id, Some(5));
        assert!(cache.is_favorite(7, 1, 640.0));
        assert!(!cache.is_favorite(7, 9, 199.99));
    }

    #[test]
    fn test_refresh_rejects_guests() {
        let dir = TempDir::new().unwrap();
        let cache = FavoriteCache::with_dir(dir.path().to_path_buf());
        let remote = FakeRemote::new();
        let sync = FavoriteSync::new(&remote, &cache);

        let err = sync.refresh(None).unwrap_err();
        assert!(matches!(err, SyncError::NotAuthenticated));
        assert!(remote.calls.borrow().is_empty());
    }
}
