//! Client-scoped storage for the caller's AI credential.
//!
//! The credential is the only thing Folio persists. The file store keeps a
//! JSON object `{client_id: api_key}` and rewrites it whole on every change.
//! A rewrite goes to a staging file first and is renamed over the old one, so
//! the live file is always either the previous or the next complete version.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::assist::AssistError;

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn get(&self, client_id: &str) -> Result<Option<String>, AssistError>;
    async fn put(&self, client_id: &str, api_key: &str) -> Result<(), AssistError>;
    /// Returns whether a credential was stored.
    async fn delete(&self, client_id: &str) -> Result<bool, AssistError>;
}

// ────────────────────────────────────────────────────────────────────────────
// File-backed store
// ────────────────────────────────────────────────────────────────────────────

pub struct FileCredentialStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles on the file.
    lock: Mutex<()>,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling of the live file; same directory so the rename stays atomic.
    fn staging_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "credentials".to_string());
        self.path.with_file_name(format!(".{name}.tmp"))
    }

    async fn load(&self) -> anyhow::Result<HashMap<String, String>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", self.path.display()));
            }
        };
        if raw.trim().is_empty() {
            return Ok(HashMap::new());
        }
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", self.path.display()))
    }

    async fn save(&self, entries: &HashMap<String, String>) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let body = serde_json::to_vec_pretty(entries)?;
        let staging = self.staging_path();
        tokio::fs::write(&staging, body)
            .await
            .with_context(|| format!("writing {}", staging.display()))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .with_context(|| format!("replacing {}", self.path.display()))
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn get(&self, client_id: &str) -> Result<Option<String>, AssistError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(client_id))
    }

    async fn put(&self, client_id: &str, api_key: &str) -> Result<(), AssistError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        entries.insert(client_id.to_string(), api_key.to_string());
        self.save(&entries).await?;
        info!(client_id, "credential stored");
        Ok(())
    }

    async fn delete(&self, client_id: &str) -> Result<bool, AssistError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        if entries.remove(client_id).is_none() {
            debug!(client_id, "no credential to delete");
            return Ok(false);
        }
        self.save(&entries).await?;
        info!(client_id, "credential deleted");
        Ok(true)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory store
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryCredentialStore {
    entries: RwLock<HashMap<String, String>>,
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self, client_id: &str) -> Result<Option<String>, AssistError> {
        Ok(self.entries.read().await.get(client_id).cloned())
    }

    async fn put(&self, client_id: &str, api_key: &str) -> Result<(), AssistError> {
        self.entries
            .write()
            .await
            .insert(client_id.to_string(), api_key.to_string());
        Ok(())
    }

    async fn delete(&self, client_id: &str) -> Result<bool, AssistError> {
        Ok(self.entries.write().await.remove(client_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_store(dir: &tempfile::TempDir) -> FileCredentialStore {
        FileCredentialStore::new(dir.path().join("nested").join("credentials.json"))
    }

    #[tokio::test]
    async fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = make_store(&dir);
        assert_eq!(store.get("client-a").await.unwrap(), None);
        assert!(!store.delete("client-a").await.unwrap());
    }

    #[tokio::test]
    async fn test_put_get_delete_persists_per_client() {
        let dir = tempfile::tempdir().unwrap();
        let store = make_store(&dir);
        store.put("client-a", "sk-a").await.unwrap();
        store.put("client-b", "sk-b").await.unwrap();

        // A fresh handle on the same file sees both.
        let reopened = make_store(&dir);
        assert_eq!(reopened.get("client-a").await.unwrap().as_deref(), Some("sk-a"));
        assert_eq!(reopened.get("client-b").await.unwrap().as_deref(), Some("sk-b"));

        assert!(reopened.delete("client-a").await.unwrap());
        assert_eq!(store.get("client-a").await.unwrap(), None);
        assert_eq!(store.get("client-b").await.unwrap().as_deref(), Some("sk-b"));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = FileCredentialStore::new(&path);
        let err = store.get("client-a").await.unwrap_err();
        assert!(matches!(err, AssistError::Storage(_)));
    }

    #[tokio::test]
    async fn test_interrupted_write_leaves_live_file_intact() {
        let dir = tempfile::tempdir().unwrap();
        let store = make_store(&dir);
        store.put("client-a", "sk-a").await.unwrap();
        assert!(!store.staging_path().exists());

        // A write that died halfway only ever touched the staging file.
        std::fs::write(store.staging_path(), "{\"client-a\": \"sk-").unwrap();
        assert_eq!(store.get("client-a").await.unwrap().as_deref(), Some("sk-a"));

        store.put("client-b", "sk-b").await.unwrap();
        assert!(!store.staging_path().exists());
        let raw = std::fs::read_to_string(store.path()).unwrap();
        let entries: HashMap<String, String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryCredentialStore::default();
        store.put("c", "sk").await.unwrap();
        assert_eq!(store.get("c").await.unwrap().as_deref(), Some("sk"));
        assert!(store.delete("c").await.unwrap());
        assert!(!store.delete("c").await.unwrap());
    }
}
