//! Readers for artifact bytes kept in shared storage.
//!
//! When the deposit configuration declares shared storage, the host hands
//! over artifacts as references (`file_ref`) rather than inline bytes. The
//! [`FileStorage`] trait resolves such a reference to its content.
//!
//! # Implementations
//!
//! | Type | When to use |
//! |------|-------------|
//! | [`MemoryFileStorage`] | Tests and embedding hosts that already hold the bytes |
//! | [`LocalFileStorage`] | Production; a directory shared with the host platform |
//!
//! [`MemoryFileStorage`]: memory::MemoryFileStorage
//! [`LocalFileStorage`]: local::LocalFileStorage

pub mod local;
pub mod memory;

use async_trait::async_trait;

/// Errors that storage reads can return.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The reference escapes the storage root or is otherwise unusable.
    #[error("invalid file reference {0:?}")]
    InvalidReference(String),

    /// The underlying read failed.
    #[error("failed to read {file_ref:?}: {source}")]
    Io {
        file_ref: String,
        #[source]
        source: std::io::Error,
    },
}

/// Resolves shared-storage references to bytes.
///
/// Implementations must be `Send + Sync + 'static` so they can be held in an
/// `Arc<dyn FileStorage>`.
#[async_trait]
pub trait FileStorage: Send + Sync + 'static {
    /// Content of `file_ref`, or `None` when nothing is stored under it.
    async fn read_file(&self, file_ref: &str) -> Result<Option<Vec<u8>>, StorageError>;
}
