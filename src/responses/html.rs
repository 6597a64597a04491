use astra::{Body, ResponseBuilder};
use maud::Markup;

use crate::errors::ServerError;
use crate::responses::ResultResp;

/// Full-page HTML response.
pub fn html_response(markup: Markup) -> ResultResp {
    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", mime::TEXT_HTML_UTF_8.as_ref())
        .body(Body::from(markup.into_string()))
        .map_err(|_| ServerError::InternalError)
}

/// htmx partial; same wire shape, named for intent at call sites.
pub fn html_fragment(markup: Markup) -> ResultResp {
    html_response(markup)
}

pub fn css_response(css: &'static str) -> ResultResp {
    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", mime::TEXT_CSS.as_ref())
        .header("Cache-Control", "public, max-age=3600")
        .body(Body::from(css.to_string()))
        .map_err(|_| ServerError::InternalError)
}

/// The synthesized alert chime.
pub fn wav_response(bytes: Vec<u8>) -> ResultResp {
    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", "audio/wav")
        .header("Cache-Control", "public, max-age=86400")
        .body(Body::from(bytes))
        .map_err(|_| ServerError::InternalError)
}
