use maud::{html, Markup};

use crate::feed::FeedItem;

/// One row of the live feed: request facts plus either the inline offer
/// form or the "Offer sent" mark.
pub fn request_card(item: &FeedItem) -> Markup {
    let req = &item.request;
    html! {
        article class="card request-card" id=(format!("request-{}", req.id)) {
            header class="flex items-center justify-between" {
                strong { (req.patient_name) }
                span class=(format!("badge badge-{}", req.urgency.as_str())) {
                    (req.urgency.label())
                }
            }

            p class="request-meta" {
                (req.city)
                @if let Some(d) = item.distance_km {
                    " · " (format!("{d:.2} km away"))
                }
            }

            @if !req.service_codes.is_empty() {
                ul class="service-codes" {
                    @for code in &req.service_codes {
                        li { (code) }
                    }
                }
            }

            @if let Some(notes) = &req.notes {
                p class="request-notes" { (notes) }
            }

            @if let Some(price) = req.offered_price {
                p { "Patient offers: " strong { (price) } }
            }

            (offer_slot(item))
        }
    }
}

fn offer_slot(item: &FeedItem) -> Markup {
    if item.offer_sent {
        return offer_sent_mark();
    }
    offer_form(&item.request.id, item.request.offered_price)
}

pub fn offer_sent_mark() -> Markup {
    html! {
        p class="offer-sent" { "Offer sent ✓" }
    }
}

/// Inline offer form, swapped for its outcome fragment on submit.
pub fn offer_form(request_id: &str, prefill_price: Option<i64>) -> Markup {
    html! {
        form
            class="offer-form"
            hx-post="/offers"
            hx-target="this"
            hx-swap="outerHTML"
        {
            input type="hidden" name="request_id" value=(request_id);
            label {
                "Your price"
                input type="number" name="price" min="1" required
                    value=[prefill_price];
            }
            label {
                "ETA (minutes)"
                input type="number" name="eta_minutes" min="1" required;
            }
            label {
                "Message"
                input type="text" name="message" placeholder="Optional note";
            }
            button type="submit" { "Send offer" }
        }
    }
}

/// Outcome fragment for a failed submission: the form again, with the
/// failure toast above it.
pub fn offer_form_with_error(request_id: &str, error: Markup) -> Markup {
    html! {
        div {
            (error)
            (offer_form(request_id, None))
        }
    }
}
