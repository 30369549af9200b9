// src/domain/report.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Collection that holds every pet report document.
pub const REPORTS_COLLECTION: &str = "pets";

/// Field used to order report queries.
pub const REPORTED_DATE_FIELD: &str = "reportedDate";

/// Species offered by the report form.
pub const SPECIES_OPTIONS: [&str; 4] = ["Dog", "Cat", "Bird", "Other"];

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Build a point, rejecting non-finite or out-of-range degrees.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, String> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err("coordinates must be finite".into());
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(format!("latitude {latitude} out of range"));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(format!("longitude {longitude} out of range"));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// A missing-pet record.
///
/// `id` is the document key and never part of the stored body.
/// `reported_by` and `reported_date` are stamped by the repository on create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(skip)]
    pub id: Option<String>,
    pub name: String,
    pub species: String,
    pub description: String,
    pub last_seen_location: GeoPoint,
    #[serde(default)]
    pub last_seen_address: String,
    pub contact_info: String,
    #[serde(
        rename = "imageURL",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<String>,
    pub reported_by: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub reported_date: DateTime<Utc>,
}

impl Report {
    /// A report as the form builds it: ownership and date are placeholders
    /// that the repository overwrites.
    pub fn draft(
        name: impl Into<String>,
        species: impl Into<String>,
        description: impl Into<String>,
        location: GeoPoint,
        address: impl Into<String>,
        contact_info: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            species: species.into(),
            description: description.into(),
            last_seen_location: location,
            last_seen_address: address.into(),
            contact_info: contact_info.into(),
            image_url: None,
            reported_by: String::new(),
            reported_date: Utc::now(),
        }
    }

    /// Form-level completeness check: every free-text field must be filled.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.species.trim().is_empty() {
            missing.push("species");
        }
        if self.description.trim().is_empty() {
            missing.push("description");
        }
        if self.contact_info.trim().is_empty() {
            missing.push("contact info");
        }
        missing
    }
}
