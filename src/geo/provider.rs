// src/geo/provider.rs
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use crate::domain::GeoPoint;
use crate::geo::placemark::{format_address, GeocodeError, Placemark, ReverseGeocoder};

/// Zoom used when recentering on a freshly acquired coordinate.
pub const DEFAULT_SPAN: f64 = 0.05;
/// Tighter zoom for a single report's detail map.
pub const DETAIL_SPAN: f64 = 0.01;
pub const DEFAULT_CENTER: GeoPoint = GeoPoint {
    latitude: 37.33233141,
    longitude: -122.03121860,
};

/// Map viewport: a center and a square span in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapRegion {
    pub center: GeoPoint,
    pub span: f64,
}

impl MapRegion {
    pub fn around(center: GeoPoint, span: f64) -> Self {
        Self { center, span }
    }

    /// (min_lon, min_lat, max_lon, max_lat), the order OSM embeds expect.
    pub fn bounding_box(&self) -> (f64, f64, f64, f64) {
        let half = self.span / 2.0;
        (
            self.center.longitude - half,
            self.center.latitude - half,
            self.center.longitude + half,
            self.center.latitude + half,
        )
    }
}

impl Default for MapRegion {
    fn default() -> Self {
        Self::around(DEFAULT_CENTER, DEFAULT_SPAN)
    }
}

/// Current coordinate and the best address known for it.
/// The address trails the coordinate until its lookup completes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationSnapshot {
    pub coordinate: Option<GeoPoint>,
    pub address: String,
}

struct GeocodeCompletion {
    seq: u64,
    point: GeoPoint,
    result: Result<Vec<Placemark>, GeocodeError>,
}

/// Tracks the last-seen location being picked for a report.
///
/// Lookups run on worker threads and report back over a channel; completions
/// are only applied by the owner (`settle`), and only if
/// they answer the most recently issued lookup.
pub struct GeolocationProvider {
    geocoder: Arc<dyn ReverseGeocoder>,
    snapshot: LocationSnapshot,
    region: MapRegion,
    tracking: bool,
    latest_seq: u64,
    in_flight: usize,
    tx: Sender<GeocodeCompletion>,
    rx: Receiver<GeocodeCompletion>,
}

impl GeolocationProvider {
    pub fn new(geocoder: Arc<dyn ReverseGeocoder>) -> Self {
        let (tx, rx) = channel();
        Self {
            geocoder,
            snapshot: LocationSnapshot::default(),
            region: MapRegion::default(),
            tracking: false,
            latest_seq: 0,
            in_flight: 0,
            tx,
            rx,
        }
    }

    /// Begin passive acquisition; the first device fix ends it.
    pub fn start_updates(&mut self) {
        self.tracking = true;
    }

    #[cfg(test)]
    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    pub fn on_device_location_update(&mut self, coordinate: GeoPoint) {
        if !self.tracking {
            tracing::debug!("ignoring device location while not tracking");
            return;
        }
        self.tracking = false;
        self.move_to(coordinate);
    }

    /// User-placed pin; no passive subscription is involved.
    pub fn set_manual_location(&mut self, coordinate: GeoPoint) {
        self.move_to(coordinate);
    }

    fn move_to(&mut self, coordinate: GeoPoint) {
        self.snapshot.coordinate = Some(coordinate);
        self.region = MapRegion::around(coordinate, DEFAULT_SPAN);
        self.resolve_address(coordinate);
    }

    /// Fire off a reverse-geocode lookup. Returns its sequence number.
    pub fn resolve_address(&mut self, coordinate: GeoPoint) -> u64 {
        self.latest_seq += 1;
        self.in_flight += 1;
        let seq = self.latest_seq;

        let geocoder = Arc::clone(&self.geocoder);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = catch_unwind(AssertUnwindSafe(|| geocoder.reverse_geocode(coordinate)))
                .unwrap_or_else(|_| Err(GeocodeError::Response("geocoder panicked".into())));
            // the provider may be gone; nobody is left to care
            let _ = tx.send(GeocodeCompletion {
                seq,
                point: coordinate,
                result,
            });
        });

        seq
    }

    /// Apply whatever lookups have finished, without blocking.
    #[cfg(test)]
    pub fn poll_completions(&mut self) {
        while let Ok(done) = self.rx.try_recv() {
            self.apply(done);
        }
    }

    /// Block until every issued lookup has reported back.
    pub fn settle(&mut self) {
        while self.in_flight > 0 {
            match self.rx.recv() {
                Ok(done) => self.apply(done),
                // unreachable while we hold a sender
                Err(_) => break,
            }
        }
    }

    fn apply(&mut self, done: GeocodeCompletion) {
        self.in_flight = self.in_flight.saturating_sub(1);

        if done.seq != self.latest_seq {
            tracing::debug!(
                seq = done.seq,
                latest = self.latest_seq,
                "discarding stale geocode result"
            );
            return;
        }

        match done.result {
            Ok(placemarks) => match placemarks.first() {
                Some(first) => self.snapshot.address = format_address(first),
                None => tracing::debug!(
                    lat = done.point.latitude,
                    lon = done.point.longitude,
                    "geocoder returned no placemarks"
                ),
            },
            Err(e) => tracing::warn!(
                error = %e,
                lat = done.point.latitude,
                lon = done.point.longitude,
                "geocoding error"
            ),
        }
    }

    pub fn snapshot(&self) -> &LocationSnapshot {
        &self.snapshot
    }

    pub fn region(&self) -> MapRegion {
        self.region
    }

    #[cfg(test)]
    pub fn pending(&self) -> usize {
        self.in_flight
    }
}
