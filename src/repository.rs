// src/repository.rs
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::auth::AuthProvider;
use crate::domain::{Report, REPORTED_DATE_FIELD, REPORTS_COLLECTION};
use crate::storage::{BlobStore, Document, DocumentStore, ImageEncoder, JpegCompressor};

/// Blob namespace for report photos.
pub const IMAGE_NAMESPACE: &str = "pet_images";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReportError {
    #[error("User not authenticated")]
    Unauthenticated,
    #[error("Failed to upload image: {0}")]
    ImageUploadFailed(String),
    #[error("Failed to save pet: {0}")]
    StoreWriteFailed(String),
    #[error("Error fetching pets: {0}")]
    FetchFailed(String),
}

/// Persists new reports (with an optional photo) and loads the full set.
pub struct ReportRepository<D, B, E = JpegCompressor> {
    docs: D,
    blobs: B,
    encoder: E,
    clock: fn() -> DateTime<Utc>,
    reports: Vec<Report>,
}

impl<D: DocumentStore, B: BlobStore> ReportRepository<D, B, JpegCompressor> {
    pub fn new(docs: D, blobs: B) -> Self {
        Self::with_encoder(docs, blobs, JpegCompressor::default())
    }
}

impl<D: DocumentStore, B: BlobStore, E: ImageEncoder> ReportRepository<D, B, E> {
    pub fn with_encoder(docs: D, blobs: B, encoder: E) -> Self {
        Self {
            docs,
            blobs,
            encoder,
            clock: Utc::now,
            reports: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Last fetched collection, most recent first.
    #[cfg(test)]
    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    #[cfg(test)]
    pub fn documents(&self) -> &D {
        &self.docs
    }

    #[cfg(test)]
    pub fn blobs(&self) -> &B {
        &self.blobs
    }

    /// Stamp, upload the photo if any, then write the document.
    ///
    /// When an image is supplied and its upload fails, nothing is written.
    pub fn create_report(
        &self,
        auth: &dyn AuthProvider,
        report: Report,
        image: Option<&[u8]>,
    ) -> Result<Report, ReportError> {
        let principal = auth
            .current_principal()
            .ok_or(ReportError::Unauthenticated)?;

        let mut report = Report {
            id: None,
            image_url: None,
            reported_by: principal.as_str().to_string(),
            reported_date: (self.clock)(),
            ..report
        };

        if let Some(raw) = image {
            report.image_url = Some(self.upload_image(raw)?);
        }

        let body = serde_json::to_value(&report)
            .map_err(|e| ReportError::StoreWriteFailed(e.to_string()))?;
        let id = self
            .docs
            .insert(REPORTS_COLLECTION, &body)
            .map_err(|e| ReportError::StoreWriteFailed(e.to_string()))?;

        tracing::info!(
            id = %id,
            principal = %principal,
            with_image = report.image_url.is_some(),
            "pet report created"
        );

        report.id = Some(id);
        Ok(report)
    }

    fn upload_image(&self, raw: &[u8]) -> Result<String, ReportError> {
        let image = self
            .encoder
            .encode(raw)
            .map_err(ReportError::ImageUploadFailed)?;

        let key = format!(
            "{IMAGE_NAMESPACE}/{:032x}.{}",
            rand::random::<u128>(),
            image.extension
        );

        self.blobs
            .put(&key, &image.bytes, image.content_type)
            .map_err(|e| ReportError::ImageUploadFailed(e.to_string()))?;

        self.blobs
            .download_url(&key)
            .map_err(|e| ReportError::ImageUploadFailed(e.to_string()))
    }

    /// Load every report, newest first, replacing the in-memory collection.
    /// On failure the previous collection is kept.
    pub fn fetch_all_reports(&mut self) -> Result<&[Report], ReportError> {
        let docs = self
            .docs
            .query_ordered(REPORTS_COLLECTION, REPORTED_DATE_FIELD, true)
            .map_err(|e| ReportError::FetchFailed(e.to_string()))?;

        self.reports = docs.into_iter().filter_map(decode_report).collect();
        Ok(&self.reports)
    }

    pub fn find_report(&self, id: &str) -> Result<Option<Report>, ReportError> {
        let doc = self
            .docs
            .get(REPORTS_COLLECTION, id)
            .map_err(|e| ReportError::FetchFailed(e.to_string()))?;
        Ok(doc.and_then(decode_report))
    }
}

fn decode_report(doc: Document) -> Option<Report> {
    match serde_json::from_value::<Report>(doc.data) {
        Ok(mut report) => {
            report.id = Some(doc.id);
            Some(report)
        }
        Err(e) => {
            tracing::warn!(id = %doc.id, error = %e, "skipping undecodable pet document");
            None
        }
    }
}
