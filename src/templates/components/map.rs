use maud::{html, Markup};

use crate::domain::GeoPoint;
use crate::geo::MapRegion;

const OSM_EMBED: &str = "https://www.openstreetmap.org/export/embed.html";

pub fn osm_embed_url(region: MapRegion, marker: Option<GeoPoint>) -> String {
    let (min_lon, min_lat, max_lon, max_lat) = region.bounding_box();
    let mut url = format!("{OSM_EMBED}?bbox={min_lon},{min_lat},{max_lon},{max_lat}&layer=mapnik");
    if let Some(p) = marker {
        url.push_str(&format!("&marker={},{}", p.latitude, p.longitude));
    }
    url
}

pub fn osm_embed(region: MapRegion, marker: Option<GeoPoint>) -> Markup {
    html! {
        iframe
            class="map"
            width="100%"
            height="300"
            loading="lazy"
            title="Map"
            src=(osm_embed_url(region, marker)) {}
    }
}
