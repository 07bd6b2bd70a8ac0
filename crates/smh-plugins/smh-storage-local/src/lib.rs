//! # smh-storage-local
//!
//! Local implementations of `KeyValueStore`, the client's equivalent of
//! browser local storage: one JSON document per key in a directory on disk,
//! or a process-lifetime map for tests and ephemeral sessions.
//!
//! Writes are last-write-wins; there is no versioning or merge.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dashmap::DashMap;
use smh_core::error::{AppError, Result};
use smh_core::traits::KeyValueStore;
use tokio::fs;
use uuid::Uuid;

/// Keys become file names, so they are restricted to a safe alphabet.
fn check_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(AppError::Validation(format!("unusable storage key {key:?}")))
    }
}

fn io_err(path: &Path, err: std::io::Error) -> AppError {
    AppError::Internal(format!("{}: {err}", path.display()))
}

pub struct FileStore {
    /// Directory holding `<key>.json` files (e.g., "~/.local/share/study-hub")
    root_path: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root_path: root.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        check_key(key)?;
        Ok(self.root_path.join(format!("{key}.json")))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_err(&path, e)),
        }
    }

    /// Writes to a sibling temp file and renames it over the target, so a
    /// reader never sees a half-written value.
    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root_path)
            .await
            .map_err(|e| io_err(&self.root_path, e))?;

        // One staging file per write, so concurrent writers never share it.
        let staging = self
            .root_path
            .join(format!(".{key}.{}.tmp", Uuid::new_v4().simple()));
        fs::write(&staging, value).await.map_err(|e| io_err(&staging, e))?;
        if let Err(e) = fs::rename(&staging, &path).await {
            let _ = fs::remove_file(&staging).await;
            return Err(io_err(&path, e));
        }
        log::debug!("stored {key} ({} bytes)", value.len());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_err(&path, e)),
        }
    }
}

/// Non-persistent store; contents vanish with the process.
#[derive(Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        check_key(key)?;
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        check_key(key)?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        check_key(key)?;
        self.entries.remove(key);
        Ok(())
    }
}
