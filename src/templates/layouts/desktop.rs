use maud::{html, Markup, DOCTYPE};

const STYLES: &str = "
body { font-family: system-ui, sans-serif; margin: 0; color: #1f2937; }
header { display: flex; align-items: center; justify-content: space-between; padding: 0.75rem 1.5rem; box-shadow: 0 1px 3px rgba(0,0,0,.1); }
header nav ul { display: flex; gap: 1.25rem; list-style: none; margin: 0; padding: 0; }
main.container { max-width: 760px; margin: 2rem auto; padding: 0 1rem; }
.pet-list { list-style: none; padding: 0; }
.pet-row a { display: flex; gap: 1rem; padding: 0.75rem 0; border-bottom: 1px solid #f3f4f6; color: inherit; text-decoration: none; }
.thumb { width: 60px; height: 60px; object-fit: cover; border-radius: 8px; background: #e5e7eb; }
.muted { color: #6b7280; margin: 0.15rem 0; }
.small { font-size: 0.85rem; }
.alert { padding: 0.75rem 1rem; border-radius: 6px; margin-bottom: 1rem; }
.alert-error { background: #fee2e2; color: #991b1b; }
.alert-success { background: #dcfce7; color: #166534; }
form.stacked label { display: block; margin-top: 0.75rem; font-weight: 500; }
form.stacked input, form.stacked select, form.stacked textarea { width: 100%; padding: 0.5rem; box-sizing: border-box; }
.btn { margin-top: 1rem; padding: 0.5rem 1rem; background: #524ed2; color: white; border: none; border-radius: 6px; cursor: pointer; }
";

pub fn desktop_layout(title: &str, signed_in: bool, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (STYLES) }
                script src="https://unpkg.com/htmx.org@1.9.12" defer {}
            }
            body {
                header {
                    svg
                        xmlns="http://www.w3.org/2000/svg"
                        width="24"
                        height="24"
                        viewBox="0 0 24 24"
                        fill="none"
                        stroke="#524ed2"
                        stroke-width="2"
                        stroke-linecap="round"
                        stroke-linejoin="round"
                    {
                        path stroke="none" d="M0 0h24v24H0z" fill="none" {}
                        path d="M12 21s-7-4.35-7-10a7 7 0 0 1 14 0c0 5.65-7 10-7 10z" {}
                        circle cx="12" cy="11" r="2.5" {}
                    }
                    @if signed_in {
                        nav {
                            ul {
                                li { a href="/" { "Missing Pets" } }
                                li { a href="/report" { "Report Missing" } }
                                li { a href="/profile" { "Profile" } }
                            }
                        }
                    } @else {
                        a href="/login" { "Sign in" }
                    }
                }
                (content)
            }
        }
    }
}
