use maud::{html, Markup, DOCTYPE};

/// Standalone error page; deliberately not wrapped in the app layout.
pub fn error_page(status: u16, message: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { "Error " (status) }
                style {
                    "body { font-family: system-ui, sans-serif; max-width: 720px; margin: 4rem auto; padding: 1rem; }"
                    "h1 { font-size: 2rem; margin-bottom: 1rem; }"
                    "p { font-size: 1.1rem; color: #444; }"
                }
            }
            body {
                h1 { "Error " (status) }
                p { (message) }
                p { a href="/" { "← Back to pets" } }
            }
        }
    }
}

pub fn alert(message: &str) -> Markup {
    html! {
        div class="alert alert-error" role="alert" { (message) }
    }
}

pub fn flash(message: &str) -> Markup {
    html! {
        div class="alert alert-success" role="status" { (message) }
    }
}
