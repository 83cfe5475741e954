//! Storage collaborator — hands decrypted document bytes to the pipeline.
//!
//! At-rest encryption happens outside this service; by the time a document
//! reaches the parser it is plain bytes. The trait exists so the pipeline can
//! be tested against an in-memory store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Document unreadable or corrupted: {0}")]
    Corrupted(String),
}

impl StorageError {
    pub fn kind(&self) -> &'static str {
        match self {
            StorageError::NotFound(_) => "DocumentNotFound",
            StorageError::Corrupted(_) => "DocumentCorrupted",
        }
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns the decrypted bytes of the document at `path`.
    async fn read_decrypted(&self, path: &str) -> Result<Bytes, StorageError>;
}

/// Filesystem-backed store rooted at a configured directory.
pub struct LocalDocumentStore {
    root: PathBuf,
}

impl LocalDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.root.join(p)
        }
    }
}

#[async_trait]
impl DocumentStore for LocalDocumentStore {
    async fn read_decrypted(&self, path: &str) -> Result<Bytes, StorageError> {
        let resolved = self.resolve(path);

        let bytes = match tokio::fs::read(&resolved).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(path.to_string()));
            }
            Err(e) => {
                return Err(StorageError::Corrupted(format!("{path}: {e}")));
            }
        };

        if bytes.is_empty() {
            return Err(StorageError::Corrupted(format!("{path}: empty file")));
        }

        Ok(Bytes::from(bytes))
    }
}
