use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn home_page(signed_in: bool) -> Markup {
    desktop_layout(
        "Home",
        signed_in,
        html! {
            main class="container" {
                h1 { "Nurseline" }
                p { "Emergency home nursing, matched in minutes." }

                @if signed_in {
                    section class="card" {
                        h3 { "On duty?" }
                        p { a href="/feed" { "Open the live request feed" } }
                    }
                } @else {
                    p { "Sign in from the caregiver app to see live requests." }
                }
            }
        },
    )
}
