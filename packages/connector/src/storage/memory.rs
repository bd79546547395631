//! In-memory file storage.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{FileStorage, StorageError};

/// Thread-safe map from reference to bytes.
#[derive(Default)]
pub struct MemoryFileStorage {
    files: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryFileStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `content` under `file_ref`, replacing any previous content.
    pub fn insert(&self, file_ref: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.files
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(file_ref.into(), content.into());
    }
}

#[async_trait]
impl FileStorage for MemoryFileStorage {
    async fn read_file(&self, file_ref: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let files = self
            .files
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(files.get(file_ref).cloned())
    }
}
