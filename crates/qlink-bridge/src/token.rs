//! IBM Quantum token storage.
//!
//! The device hands its token over with `configure_ibm`; the bridge keeps it
//! in memory and, when a path is configured, on disk so it survives restarts.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{BridgeError, BridgeResult};

/// On-disk form of a saved token.
#[derive(Clone, Serialize, Deserialize)]
struct StoredToken {
    token: String,
    saved_at: DateTime<Utc>,
}

/// In-memory token with optional file persistence.
pub struct TokenStore {
    path: Option<PathBuf>,
    token: RwLock<Option<String>>,
}

impl TokenStore {
    /// A store that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            token: RwLock::new(None),
        }
    }

    /// A store persisted at `path`, preloaded from it when the file exists.
    pub fn persistent(path: impl Into<PathBuf>) -> BridgeResult<Self> {
        let path = path.into();
        let token = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| {
                BridgeError::TokenStore(format!("Failed to read {}: {e}", path.display()))
            })?;
            let stored: StoredToken = serde_json::from_str(&content)?;
            debug!(path = %path.display(), saved_at = %stored.saved_at, "loaded IBM token");
            Some(stored.token)
        } else {
            None
        };

        Ok(Self {
            path: Some(path),
            token: RwLock::new(token),
        })
    }

    /// Default location: `~/.qlink/ibm_token.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".qlink").join("ibm_token.json"))
    }

    /// File backing this store, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The current token.
    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Check whether a token is configured.
    pub fn is_configured(&self) -> bool {
        self.token().is_some()
    }

    /// Replace the token, overwriting the file when persistent.
    pub fn save(&self, token: &str) -> BridgeResult<()> {
        if let Some(ref path) = self.path {
            write_token_file(path, token)?;
        }

        *self
            .token
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(token.to_string());
        info!("IBM Quantum token configured");
        Ok(())
    }
}

fn write_token_file(path: &Path, token: &str) -> BridgeResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            BridgeError::TokenStore(format!("Failed to create token directory: {e}"))
        })?;
    }

    let stored = StoredToken {
        token: token.to_string(),
        saved_at: Utc::now(),
    };
    let json = serde_json::to_string_pretty(&stored)?;
    std::fs::write(path, json)
        .map_err(|e| BridgeError::TokenStore(format!("Failed to write token file: {e}")))?;

    // Set restrictive permissions on Unix
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .map_err(|e| BridgeError::TokenStore(format!("Failed to set permissions: {e}")))?;
    }

    Ok(())
}

impl fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenStore")
            .field("path", &self.path)
            .field("token", &self.token().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory() {
        let store = TokenStore::in_memory();
        assert!(!store.is_configured());
        store.save("abc").unwrap();
        assert_eq!(store.token().as_deref(), Some("abc"));
        assert!(store.path().is_none());
    }

    #[test]
    fn test_persistent_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("token.json");

        let store = TokenStore::persistent(&path).unwrap();
        assert!(!store.is_configured());
        store.save("secret").unwrap();
        assert!(path.exists());

        let reloaded = TokenStore::persistent(&path).unwrap();
        assert_eq!(reloaded.token().as_deref(), Some("secret"));
    }

    #[cfg(unix)]
    #[test]
    fn test_token_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        TokenStore::persistent(&path).unwrap().save("x").unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(TokenStore::persistent(&path).is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let store = TokenStore::in_memory();
        store.save("super-secret").unwrap();
        let debug = format!("{store:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
