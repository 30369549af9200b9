use crate::domain::Report;
use crate::templates::components::pet_list;
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn listing_page(reports: &[Report], query: &str) -> Markup {
    desktop_layout(
        "Missing Pets",
        true,
        html! {
            main class="container" {
                h1 { "Missing Pets" }
                form method="get" action="/" role="search" {
                    input
                        type="search"
                        name="q"
                        value=(query)
                        placeholder="Search by species or location"
                        hx-get="/pets/search"
                        hx-trigger="input changed delay:300ms, search"
                        hx-target="#pet-list"
                        hx-swap="outerHTML";
                }
                (pet_list(reports))
            }
        },
    )
}
