//! Directory-backed file storage.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use super::{FileStorage, StorageError};

/// Reads references as paths relative to a shared directory.
///
/// References must be relative and may not contain `..`; anything else is
/// rejected with [`StorageError::InvalidReference`].
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, file_ref: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(file_ref);
        let safe = !file_ref.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !safe {
            return Err(StorageError::InvalidReference(file_ref.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn read_file(&self, file_ref: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.resolve(file_ref)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                file_ref: file_ref.to_string(),
                source,
            }),
        }
    }
}
