use maud::{html, Markup};

use crate::card::{CardState, DismissReason, FlashCard, ENTER_MS, EXIT_MS};
use crate::templates::components::toast::toast;

/// Transient overlay for one incoming request. The 1 Hz poll drives the
/// card's countdown server-side; each render reflects the current state.
pub fn flash_card(card_id: u64, card: &FlashCard) -> Markup {
    if let CardState::Dismissed(reason) = card.state() {
        return exit_shell(card_id, *reason);
    }

    html! {
        div
            class="flash-card"
            id=(format!("flash-{card_id}"))
            style=(format!("animation: flash-in {ENTER_MS}ms ease-out"))
            hx-get=(format!("/flash/{card_id}"))
            hx-trigger="every 1s"
            hx-swap="outerHTML"
        {
            header class="flex items-center justify-between" {
                strong { "Emergency request" }
                @if matches!(card.state(), CardState::Entering | CardState::Counting) {
                    span class="countdown" { (card.remaining_secs()) "s" }
                }
            }

            p {
                (card.request.patient_name) " · " (card.request.city)
                @if let Some(d) = card.distance_km {
                    " · " (format!("{d:.2} km"))
                }
            }
            span class=(format!("badge badge-{}", card.request.urgency.as_str())) {
                (card.request.urgency.label())
            }

            @match card.state() {
                CardState::Entering | CardState::Counting => { (decision_buttons(card_id)) }
                CardState::OfferInput => { (offer_input(card_id, card)) }
                CardState::Submitting => { (submitting_note()) }
                CardState::Accepted { .. } => { (accepted_note()) }
                CardState::Dismissed(_) => {}
            }
        }
    }
}

fn decision_buttons(card_id: u64) -> Markup {
    html! {
        div class="flash-actions" {
            button
                hx-post=(format!("/flash/{card_id}/accept"))
                hx-target=(format!("#flash-{card_id}"))
                hx-swap="outerHTML"
            { "Accept" }
            button
                class="secondary"
                hx-post=(format!("/flash/{card_id}/dismiss"))
                hx-target=(format!("#flash-{card_id}"))
                hx-swap="outerHTML"
            { "Decline" }
        }
    }
}

fn offer_input(card_id: u64, card: &FlashCard) -> Markup {
    html! {
        @if let Some(error) = &card.error {
            (toast("error", error))
        }
        form
            class="offer-form"
            hx-post=(format!("/flash/{card_id}/submit"))
            hx-target=(format!("#flash-{card_id}"))
            hx-swap="outerHTML"
        {
            label {
                "Your price"
                input type="number" name="price" min="1" required value=(card.price_input);
            }
            label {
                "ETA (minutes)"
                input type="number" name="eta_minutes" min="1" required value=(card.eta_input);
            }
            label {
                "Message"
                input type="text" name="message" value=(card.message_input);
            }
            button type="submit" { "Send offer" }
            button
                type="button"
                class="secondary"
                hx-post=(format!("/flash/{card_id}/cancel"))
                hx-target=(format!("#flash-{card_id}"))
                hx-swap="outerHTML"
            { "Back" }
        }
    }
}

fn submitting_note() -> Markup {
    html! {
        p class="submitting" aria-busy="true" { "Sending your offer…" }
    }
}

fn accepted_note() -> Markup {
    html! {
        p class="accepted" { "Offer sent. The patient has been notified." }
    }
}

/// Final frame: plays the exit transition, then removes itself. No poll
/// attribute, so this is the last thing the page hears from the card.
fn exit_shell(card_id: u64, reason: DismissReason) -> Markup {
    html! {
        div
            class="flash-card flash-exit"
            id=(format!("flash-{card_id}"))
            style=(format!("animation: flash-out {EXIT_MS}ms ease-in forwards"))
        {
            @if reason == DismissReason::NoLongerAvailable {
                (toast("info", "This request is no longer available."))
            }
        }
    }
}
