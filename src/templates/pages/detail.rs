use crate::domain::Report;
use crate::geo::{MapRegion, DETAIL_SPAN};
use crate::templates::components::osm_embed;
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn detail_page(report: &Report) -> Markup {
    let location = report.last_seen_location;

    desktop_layout(
        &report.name,
        true,
        html! {
            main class="container" {
                @if let Some(url) = &report.image_url {
                    img class="hero" src=(url) alt=(report.name) style="max-width: 100%; max-height: 300px;";
                }
                h1 { (report.name) }
                p class="muted" { (report.species) }

                h3 { "Description" }
                p { (report.description) }

                h3 { "Last Seen" }
                @if !report.last_seen_address.is_empty() {
                    p { (report.last_seen_address) }
                }
                (osm_embed(MapRegion::around(location, DETAIL_SPAN), Some(location)))

                h3 { "Contact Information" }
                p { (report.contact_info) }

                p class="muted small" {
                    "Reported on " (report.reported_date.format("%B %e, %Y at %H:%M UTC").to_string())
                }
            }
        },
    )
}
