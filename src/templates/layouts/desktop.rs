use maud::{html, Markup, DOCTYPE};

pub fn desktop_layout(title: &str, signed_in: bool, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href="/static/main.css";
                script src="https://unpkg.com/htmx.org@1.9.12" defer {};
            }
            body {
                header class="flex items-center justify-between px-6 py-3 shadow" {
                    h3 { "Nurseline" }
                    nav {
                        ul {
                            li { a href="/" { "Home" } }
                            @if signed_in {
                                li { a href="/feed" { "Live Requests" } }
                            }
                        }
                    }
                }
                (content)
            }
        }
    }
}
