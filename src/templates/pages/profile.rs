use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn profile_page(email: Option<&str>, version: &str) -> Markup {
    desktop_layout(
        "Profile",
        true,
        html! {
            main class="container" {
                h1 { "Profile" }
                p class="profile-email" { (email.unwrap_or("Guest User")) }

                form method="post" action="/auth/logout" {
                    button type="submit" class="btn" { "Sign out" }
                }

                p class="muted small" { "Version " (version) }
            }
        },
    )
}
