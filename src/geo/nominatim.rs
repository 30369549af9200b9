// src/geo/nominatim.rs
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::domain::GeoPoint;
use crate::geo::placemark::{GeocodeError, Placemark, ReverseGeocoder};

/// Reverse geocoding against an OpenStreetMap Nominatim instance.
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

// reverse?format=jsonv2 response, only the parts we read
#[derive(Debug, Deserialize)]
struct ReverseResponse {
    error: Option<String>,
    address: Option<NominatimAddress>,
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    road: Option<String>,
    pedestrian: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    hamlet: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

impl From<NominatimAddress> for Placemark {
    fn from(a: NominatimAddress) -> Self {
        Placemark {
            thoroughfare: a.road.or(a.pedestrian),
            locality: a.city.or(a.town).or(a.village).or(a.hamlet),
            administrative_area: a.state,
            country: a.country,
        }
    }
}

impl NominatimGeocoder {
    pub fn new(
        base_url: &str,
        user_agent: &str,
        timeout_secs: u64,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| GeocodeError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn reverse_url(&self, point: GeoPoint) -> Result<Url, GeocodeError> {
        Url::parse_with_params(
            &format!("{}/reverse", self.base_url),
            &[
                ("format", "jsonv2".to_string()),
                ("lat", point.latitude.to_string()),
                ("lon", point.longitude.to_string()),
                ("addressdetails", "1".to_string()),
            ],
        )
        .map_err(|e| GeocodeError::Response(format!("bad geocoder url: {e}")))
    }
}

fn parse_reverse(body: &str) -> Result<Vec<Placemark>, GeocodeError> {
    let parsed: ReverseResponse =
        serde_json::from_str(body).map_err(|e| GeocodeError::Response(e.to_string()))?;

    if let Some(err) = parsed.error {
        return Err(GeocodeError::Response(err));
    }
    Ok(parsed.address.map(Placemark::from).into_iter().collect())
}

impl ReverseGeocoder for NominatimGeocoder {
    fn reverse_geocode(&self, point: GeoPoint) -> Result<Vec<Placemark>, GeocodeError> {
        let url = self.reverse_url(point)?;

        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| GeocodeError::Network(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .map_err(|e| GeocodeError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(GeocodeError::Network(format!("HTTP {status}: {text}")));
        }

        parse_reverse(&text)
    }
}
