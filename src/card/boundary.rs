//! Crash containment for the flash card. The card is transient,
//! cosmetic chrome: a rendering defect inside it must degrade to
//! "nothing shown, card dismissed", never take the page down.

use std::panic::{catch_unwind, AssertUnwindSafe};

use maud::{html, Markup};
use tracing::error;

/// Render through the boundary. A panic inside `render` is caught and
/// logged; the card reports itself dismissed and contributes no markup.
pub fn mount<F, D>(render: F, on_dismiss: D) -> Markup
where
    F: FnOnce() -> Markup,
    D: FnOnce(),
{
    match catch_unwind(AssertUnwindSafe(render)) {
        Ok(markup) => markup,
        Err(panic) => {
            let what = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic".to_string());
            error!("flash card render panicked, dismissing: {what}");
            on_dismiss();
            html! {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn healthy_render_passes_through() {
        let dismissed = Cell::new(false);
        let markup = mount(|| html! { p { "ok" } }, || dismissed.set(true));
        assert_eq!(markup.into_string(), "<p>ok</p>");
        assert!(!dismissed.get());
    }

    #[test]
    fn panicking_render_dismisses_and_yields_nothing() {
        let dismissed = Cell::new(false);
        let markup = mount(
            || -> Markup { panic!("broken template") },
            || dismissed.set(true),
        );
        assert_eq!(markup.into_string(), "");
        assert!(dismissed.get(), "dismiss callback must fire on panic");
    }
}
