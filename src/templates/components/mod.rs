use maud::{html, Markup};

pub mod card;
pub mod error;
pub mod map;
pub mod pet_row;

pub use card::card;
pub use error::{alert, error_page, flash};
pub use map::osm_embed;
pub use pet_row::pet_list;

pub fn button(label: &str) -> Markup {
    html! {
        button type="submit" class="btn" { (label) }
    }
}
