pub mod nominatim;
pub mod placemark;
pub mod provider;

pub use nominatim::NominatimGeocoder;
pub use placemark::ReverseGeocoder;
pub use provider::{GeolocationProvider, LocationSnapshot, MapRegion, DETAIL_SPAN};
