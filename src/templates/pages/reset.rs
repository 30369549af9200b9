use crate::auth::accounts::MIN_PASSWORD_LEN;
use crate::templates::components::{alert, button, flash};
use crate::templates::desktop_layout;
use maud::{html, Markup};

/// Swapped in place of the request form; same text whether or not the email exists.
pub fn reset_sent_content(message: &str) -> Markup {
    html! {
        div id="reset-result" {
            (flash(message))
            p { a href="/login" { "Back to sign in" } }
        }
    }
}

pub fn reset_sent_page(message: &str) -> Markup {
    desktop_layout(
        "Reset password",
        false,
        html! {
            main class="container narrow" {
                h1 { "Reset password" }
                (reset_sent_content(message))
            }
        },
    )
}

pub fn reset_request_page(error: Option<&str>) -> Markup {
    desktop_layout(
        "Reset password",
        false,
        html! {
            main class="container narrow" {
                h1 { "Reset password" }
                @if let Some(msg) = error {
                    (alert(msg))
                }
                form
                    class="stacked"
                    method="post"
                    action="/auth/reset"
                    hx-post="/auth/reset"
                    hx-target="this"
                    hx-swap="outerHTML"
                {
                    label for="email" { "Email" }
                    input type="email" id="email" name="email" autocomplete="email" required;
                    (button("Send reset link"))
                }
            }
        },
    )
}

pub fn reset_confirm_page(token: &str, error: Option<&str>) -> Markup {
    desktop_layout(
        "Choose a new password",
        false,
        html! {
            main class="container narrow" {
                h1 { "Choose a new password" }
                @if let Some(msg) = error {
                    (alert(msg))
                }
                form class="stacked" method="post" action="/auth/reset/confirm" {
                    input type="hidden" name="token" value=(token);
                    label for="password" { "New password" }
                    input type="password" id="password" name="password"
                        minlength=(MIN_PASSWORD_LEN) autocomplete="new-password" required;
                    (button("Update password"))
                }
            }
        },
    )
}
