// src/storage/blobs.rs
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::storage::{BlobError, BlobStore};

/// Blob store backed by a directory; URLs are served by the app under `/blobs/`.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
    public_base_url: String,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a key to a path below the root, refusing anything that could escape it.
    fn object_path(&self, key: &str) -> Result<PathBuf, BlobError> {
        if key.is_empty() {
            return Err(BlobError::InvalidKey(key.to_string()));
        }
        let rel = Path::new(key);
        let safe = rel
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(BlobError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(rel))
    }

    pub fn read(&self, key: &str) -> Result<Vec<u8>, BlobError> {
        let path = self.object_path(key)?;
        if !path.is_file() {
            return Err(BlobError::NotFound(key.to_string()));
        }
        fs::read(&path).map_err(|e| BlobError::Io(e.to_string()))
    }
}

impl BlobStore for FsBlobStore {
    fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<(), BlobError> {
        let path = self.object_path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| BlobError::Io(e.to_string()))?;
        }
        fs::write(&path, bytes).map_err(|e| BlobError::Io(e.to_string()))?;
        tracing::debug!(key, content_type, size = bytes.len(), "blob stored");
        Ok(())
    }

    fn download_url(&self, key: &str) -> Result<String, BlobError> {
        let path = self.object_path(key)?;
        if !path.is_file() {
            return Err(BlobError::NotFound(key.to_string()));
        }
        Ok(format!("{}/blobs/{}", self.public_base_url, key))
    }
}
