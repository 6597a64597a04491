use maud::{html, Markup};

use crate::errors::ServerError;

pub fn toast(kind: &str, message: &str) -> Markup {
    html! {
        div class=(format!("toast toast-{kind}")) role="status" {
            (message)
        }
    }
}

/// Caregiver-facing failure text. The duplicate-offer conflict gets its
/// own actionable message; validation echoes its reason; everything else
/// collapses into a generic retry prompt.
pub fn error_toast(err: &ServerError) -> Markup {
    match err {
        ServerError::DuplicateOffer => {
            toast("info", "You already sent an offer for this request.")
        }
        ServerError::Validation(msg) => toast("error", msg),
        _ => toast("error", "Failed to submit, please try again."),
    }
}
