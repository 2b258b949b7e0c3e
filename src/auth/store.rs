// Credential persistence

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::types::Credential;

/// Repository for the cached credential record
pub trait CredentialStore: Send + Sync {
    /// Load the persisted credential, `None` if absent or unreadable
    fn load(&self) -> Option<Credential>;

    /// Persist a credential, replacing any prior record
    fn save(&self, credential: &Credential) -> Result<()>;
}

/// JSON file backed credential store
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Option<Credential> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No token cache at {}", self.path.display());
                return None;
            }
            Err(e) => {
                tracing::warn!("Failed to read token cache {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str::<Credential>(&data) {
            Ok(credential) => Some(credential),
            Err(e) => {
                // A torn write from an earlier run lands here and is replaced on refresh
                tracing::warn!(
                    "Ignoring unparseable token cache {}: {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create token cache directory: {}", parent.display())
                })?;
            }
        }

        let data = serde_json::to_vec(credential).context("Failed to serialize credential")?;

        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options
            .open(&self.path)
            .with_context(|| format!("Failed to open token cache: {}", self.path.display()))?;
        file.write_all(&data)
            .with_context(|| format!("Failed to write token cache: {}", self.path.display()))?;

        tracing::debug!("Token cache written to {}", self.path.display());
        Ok(())
    }
}

/// In-process credential store, nothing survives the run
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    credential: Mutex<Option<Credential>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: Credential) -> Self {
        Self {
            credential: Mutex::new(Some(credential)),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Option<Credential> {
        self.credential
            .lock()
            .ok()
            .and_then(|guard| guard.as_ref().cloned())
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        let mut guard = self
            .credential
            .lock()
            .map_err(|_| anyhow::anyhow!("Credential store lock poisoned"))?;
        *guard = Some(credential.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample() -> Credential {
        Credential::new("cached-token", Utc.timestamp_opt(1_900_000_000, 0).unwrap())
    }

    #[test]
    fn test_file_store_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("token_cache.json"));
        assert!(store.load().is_none());
    }

    #[test]
    fn test_file_store_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("nested/token_cache.json"));

        store.save(&sample()).unwrap();
        assert_eq!(store.load(), Some(sample()));

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["access_token"], "cached-token");
        assert_eq!(json["expiry"], 1_900_000_000);
    }

    #[test]
    fn test_file_store_overwrites_prior_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("token_cache.json"));

        store
            .save(&Credential::new(
                "a-much-longer-old-token-value",
                Utc.timestamp_opt(1_800_000_000, 0).unwrap(),
            ))
            .unwrap();
        store.save(&sample()).unwrap();

        assert_eq!(store.load(), Some(sample()));
    }

    #[test]
    fn test_file_store_corrupt_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token_cache.json");
        std::fs::write(&path, r#"{"access_token": "trunc"#).unwrap();

        let store = FileCredentialStore::new(path);
        assert!(store.load().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("token_cache.json"));
        store.save(&sample()).unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryCredentialStore::new();
        assert!(store.load().is_none());

        store.save(&sample()).unwrap();
        assert_eq!(store.load(), Some(sample()));
    }
}
