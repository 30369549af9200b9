// src/geo/placemark.rs
use thiserror::Error;

use crate::domain::GeoPoint;

/// Address components returned by a reverse-geocode lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Placemark {
    pub thoroughfare: Option<String>,
    pub locality: Option<String>,
    pub administrative_area: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeocodeError {
    #[error("geocoder request failed: {0}")]
    Network(String),
    #[error("geocoder returned an unexpected response: {0}")]
    Response(String),
}

/// Coordinate -> placemarks. Implementations are called from worker threads.
pub trait ReverseGeocoder: Send + Sync {
    fn reverse_geocode(&self, point: GeoPoint) -> Result<Vec<Placemark>, GeocodeError>;
}

/// Street, locality, region, country; absent or blank parts are skipped.
pub fn format_address(placemark: &Placemark) -> String {
    [
        &placemark.thoroughfare,
        &placemark.locality,
        &placemark.administrative_area,
        &placemark.country,
    ]
    .into_iter()
    .filter_map(|part| part.as_deref().map(str::trim))
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(", ")
}
