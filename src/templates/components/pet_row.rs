use maud::{html, Markup};

use crate::domain::Report;

pub fn pet_row(report: &Report) -> Markup {
    let href = report
        .id
        .as_deref()
        .map(|id| format!("/pets/{id}"))
        .unwrap_or_else(|| "/".to_string());

    html! {
        li class="pet-row" {
            a href=(href) {
                @match &report.image_url {
                    Some(url) => {
                        img class="thumb" src=(url) alt=(report.name) width="60" height="60";
                    }
                    None => {
                        div class="thumb thumb-empty" aria-hidden="true" {}
                    }
                }
                div class="pet-summary" {
                    h3 { (report.name) }
                    p class="muted" { (report.species) }
                    @if !report.last_seen_address.is_empty() {
                        p class="muted" { "Last seen: " (report.last_seen_address) }
                    }
                    p class="muted small" {
                        "Reported " (report.reported_date.format("%b %e, %Y").to_string())
                    }
                }
            }
        }
    }
}

/// The list body; also swapped in on its own by live search.
pub fn pet_list(reports: &[Report]) -> Markup {
    html! {
        div id="pet-list" {
            @if reports.is_empty() {
                p class="empty" { "No pets found" }
            } @else {
                ul class="pet-list" {
                    @for report in reports {
                        (pet_row(report))
                    }
                }
            }
        }
    }
}
