use crate::geo::{LocationSnapshot, MapRegion};
use crate::templates::components::osm_embed;
use maud::{html, Markup};

/// Address preview swapped into the report form after a pin move or device fix.
pub fn location_fragment(snapshot: &LocationSnapshot, region: MapRegion) -> Markup {
    html! {
        div id="location-result" {
            @if snapshot.address.is_empty() {
                p class="muted" { "Address unavailable" }
            } @else {
                p class="address" { (snapshot.address) }
            }
            input type="hidden" name="address" value=(snapshot.address);
            (osm_embed(region, snapshot.coordinate))
        }
    }
}
