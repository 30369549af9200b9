//! Seams to the document store and the blob store.
//!
//! The repository only talks to these traits so tests can swap in fakes.

pub mod blobs;
pub mod photo;

use serde_json::Value;
use thiserror::Error;

pub use blobs::FsBlobStore;
pub use photo::{ImageEncoder, JpegCompressor, IMAGE_DECODE_FAILED};

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{0}")]
pub struct StoreError(pub String);

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BlobError {
    #[error("invalid object key: {0}")]
    InvalidKey(String),
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("blob io failed: {0}")]
    Io(String),
}

/// A stored document: store-assigned id plus its JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

pub trait DocumentStore {
    /// Insert a new document and return the id the store generated for it.
    fn insert(&self, collection: &str, data: &Value) -> Result<String, StoreError>;

    /// Every document in `collection`, ordered by a top-level numeric field.
    fn query_ordered(
        &self,
        collection: &str,
        order_by: &str,
        descending: bool,
    ) -> Result<Vec<Document>, StoreError>;

    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;
}

pub trait BlobStore {
    fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<(), BlobError>;

    /// Durable URL for an uploaded object.
    fn download_url(&self, key: &str) -> Result<String, BlobError>;
}
