//! Interactive session state.
//!
//! The browser original kept the signed-in user, the loaded build
//! batch, and the current-build pointer in `sessionStorage`; the CLI
//! keeps the same state in `~/.autobuild/session.json` between
//! invocations. Core functions receive this state as explicit
//! arguments, never as ambient globals.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::builds::{BudgetRange, BuildCursor};

/// The signed-in user, as reported by the account backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSession {
    pub id: i64,
    #[serde(default)]
    pub is_guest: bool,
}

/// Everything the tool remembers between invocations.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Session {
    /// Signed-in user, if any.
    #[serde(default)]
    pub user: Option<UserSession>,
    /// The loaded batch and current-build pointer.
    #[serde(default)]
    pub cursor: Option<BuildCursor>,
    /// Budget bounds echoed by the last generation.
    #[serde(default)]
    pub budget_range: Option<BudgetRange>,
    /// Advisory note from the last generation.
    #[serde(default)]
    pub budget_note: Option<String>,
    /// Use-case label of the last generation.
    #[serde(default)]
    pub category: String,
    /// Free-text needs of the last generation.
    #[serde(default)]
    pub needs: String,
}

/// File-backed session store.
pub struct SessionStore {
    path: PathBuf,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Create a new session store.
    ///
    /// Session location: `~/.autobuild/session.json`.
    pub fn new() -> Self {
        let path = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".autobuild")
            .join("session.json");

        Self { path }
    }

    /// Store at a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load the session; a missing or unreadable file is a fresh
    /// session.
    pub fn load(&self) -> Session {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => return Session::default(),
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Persist the session.
    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create session directory: {}", parent.display())
            })?;
        }

        let content =
            serde_json::to_string_pretty(session).context("Failed to serialize session")?;

        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write session file: {}", self.path.display()))?;

        Ok(())
    }

    /// Remove the session file.
    pub fn clear(&self) -> std::io::Result<bool> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Get the session file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builds::Build;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_a_fresh_session() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::with_path(dir.path().join("session.json"));

        let session = store.load();
        assert!(session.user.is_none());
        assert!(session.cursor.is_none());
    }

    #[test]
    fn test_session_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::with_path(dir.path().join("session.json"));

        let mut session = Session {
            user: Some(UserSession {
                id: 12,
                is_guest: false,
            }),
            category: "Gaming".to_string(),
            needs: "1440p at high settings".to_string(),
            budget_note: Some("Adjusted to the closest viable range.".to_string()),
            ..Session::default()
        };
        session.cursor = Some(BuildCursor::new(vec![Build {
            total_price: 55_000.0,
            ..Build::default()
        }]));
        store.save(&session).unwrap();

        let loaded = store.load();
        assert_eq!(loaded.user.map(|u| u.id), Some(12));
        assert_eq!(loaded.category, "Gaming");
        assert_eq!(
            loaded.cursor.and_then(|c| c.current().map(|b| b.total_price)),
            Some(55_000.0)
        );
    }

    #[test]
    fn test_corrupt_file_is_a_fresh_session() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{broken").unwrap();

        let store = SessionStore::with_path(path);
        assert!(store.load().user.is_none());
    }

    #[test]
    fn test_clear_removes_the_file() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::with_path(dir.path().join("session.json"));

        assert!(!store.clear().unwrap());
        store.save(&Session::default()).unwrap();
        assert!(store.clear().unwrap());
        assert!(!store.path().exists());
    }
}
