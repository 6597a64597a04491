use maud::{html, Markup};

use crate::feed::FeedItem;
use crate::templates::components::request_card::request_card;
use crate::templates::desktop_layout;

pub struct FeedVm {
    pub caregiver_name: String,
    pub items: Vec<FeedItem>,
    /// Feed-store version rendered into the next poll URL.
    pub version: u64,
    /// A new live request arrived since the caller's last poll.
    pub play_alert: bool,
}

pub fn feed_page(vm: &FeedVm) -> Markup {
    desktop_layout(
        "Live Requests",
        true,
        html! {
            main class="container" {
                h1 { "Live requests" }
                p { "Signed in as " strong { (vm.caregiver_name) } }
                (feed_list(vm))
            }
        },
    )
}

/// The polled partial. It re-arms its own refresh with the version it
/// rendered, so the server can tell "anything new since then?".
pub fn feed_list(vm: &FeedVm) -> Markup {
    html! {
        div
            id="feed-list"
            hx-get=(format!("/feed/cards?since={}", vm.version))
            hx-trigger="every 5s"
            hx-swap="outerHTML"
        {
            @if vm.play_alert {
                audio autoplay src="/assets/alert.wav" {}
            }

            @if vm.items.is_empty() {
                p class="feed-empty" { "No live requests right now." }
            }

            @for item in &vm.items {
                (request_card(item))
            }
        }
    }
}
