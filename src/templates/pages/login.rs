use crate::auth::accounts::MIN_PASSWORD_LEN;
use crate::templates::components::{alert, button, card, flash};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn login_page(error: Option<&str>, notice: Option<&str>, email: &str) -> Markup {
    desktop_layout(
        "Sign in",
        false,
        html! {
            main class="container narrow" {
                h1 { "Sign in" }
                @if let Some(msg) = notice {
                    (flash(msg))
                }
                @if let Some(msg) = error {
                    (alert(msg))
                }

                (card("Sign in", html! {
                    form class="stacked" method="post" action="/auth/login" {
                        label for="login-email" { "Email" }
                        input type="email" id="login-email" name="email" value=(email) autocomplete="email" required;
                        label for="login-password" { "Password" }
                        input type="password" id="login-password" name="password" autocomplete="current-password" required;
                        (button("Sign in"))
                    }
                    p { a href="/auth/reset" { "Forgot password?" } }
                }))

                (card("Create an account", html! {
                    form class="stacked" method="post" action="/auth/register" {
                        label for="register-email" { "Email" }
                        input type="email" id="register-email" name="email" autocomplete="email" required;
                        label for="register-password" { "Password" }
                        input type="password" id="register-password" name="password"
                            minlength=(MIN_PASSWORD_LEN) autocomplete="new-password" required;
                        (button("Register"))
                    }
                }))

                form method="post" action="/auth/guest" {
                    button type="submit" class="btn secondary" { "Continue as guest" }
                }
            }
        },
    )
}
