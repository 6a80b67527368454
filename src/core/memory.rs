//! Persistent assistant memory backed by a single JSON file
//!
//! The whole file is read on every [`MemoryStore::load`] and rewritten on every
//! [`MemoryStore::save`]. There is no locking: the gateway assumes a single
//! user, and two concurrent `memorize` requests can lose one of the notes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Owner name used until the user configures one
pub const DEFAULT_OWNER: &str = "Senhor";

/// What the assistant remembers about its owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryRecord {
    #[serde(rename = "nome_usuario")]
    pub owner_name: String,

    #[serde(rename = "preferencias")]
    pub preferences: BTreeMap<String, String>,

    #[serde(rename = "lembretes")]
    pub notes: Vec<String>,
}

impl Default for MemoryRecord {
    fn default() -> Self {
        Self {
            owner_name: DEFAULT_OWNER.to_string(),
            preferences: BTreeMap::new(),
            notes: Vec::new(),
        }
    }
}

/// Errors from writing the memory file
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// File-backed memory store
#[derive(Debug, Clone)]
pub struct MemoryStore {
    path: PathBuf,
}

impl MemoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the record. A missing, unreadable or corrupt file yields the defaults.
    pub async fn load(&self) -> MemoryRecord {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return MemoryRecord::default(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Memory file unreadable, using defaults");
                return MemoryRecord::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Memory file corrupt, using defaults");
                MemoryRecord::default()
            }
        }
    }

    /// Overwrite the file with `record`
    pub async fn save(&self, record: &MemoryRecord) -> Result<(), MemoryError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(record)?;
        fs::write(&self.path, json).await?;
        tracing::debug!(path = %self.path.display(), notes = record.notes.len(), "Memory saved");
        Ok(())
    }

    /// Load, append one note, save. Returns the record as written.
    pub async fn append_note(&self, note: &str) -> Result<MemoryRecord, MemoryError> {
        let mut record = self.load().await;
        record.notes.push(note.to_string());
        self.save(&record).await?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio_test::assert_ok;

    fn store_in(dir: &TempDir) -> MemoryStore {
        MemoryStore::new(dir.path().join("memoria.json"))
    }

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let record = store.load().await;
        assert_eq!(record, MemoryRecord::default());
        assert_eq!(record.owner_name, "Senhor");
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "{ not json").unwrap();

        assert_eq!(store.load().await, MemoryRecord::default());
    }

    #[tokio::test]
    async fn test_append_note_persists() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert_ok!(store.append_note("buy milk").await);
        assert_ok!(store.append_note("call mom").await);

        let record = store.load().await;
        assert_eq!(record.notes, vec!["buy milk", "call mom"]);
    }

    #[tokio::test]
    async fn test_file_uses_portuguese_keys() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let mut record = MemoryRecord::default();
        record.owner_name = "Tony".to_string();
        record
            .preferences
            .insert("musica".to_string(), "rock".to_string());
        assert_ok!(store.save(&record).await);

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["nome_usuario"], "Tony");
        assert_eq!(raw["preferencias"]["musica"], "rock");
        assert!(raw["lembretes"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), r#"{"lembretes": ["a"]}"#).unwrap();

        let record = store.load().await;
        assert_eq!(record.owner_name, "Senhor");
        assert_eq!(record.notes, vec!["a"]);
    }

    #[tokio::test]
    async fn test_save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let store = MemoryStore::new(dir.path().join("nested/deeper/memoria.json"));

        assert_ok!(store.save(&MemoryRecord::default()).await);
        assert!(store.path().exists());
    }

    #[tokio::test]
    async fn test_save_fails_when_path_is_a_directory() {
        let dir = TempDir::new().unwrap();
        let store = MemoryStore::new(dir.path());

        let result = store.save(&MemoryRecord::default()).await;
        assert!(matches!(result, Err(MemoryError::Io(_))));
    }
}
