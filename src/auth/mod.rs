pub mod sessions;
pub mod token;

/// Pull the raw session token out of a `Cookie` header value.
pub fn session_token_from_cookie(header: &str) -> Option<&str> {
    header.split(';').find_map(|pair| {
        let (k, v) = pair.trim().split_once('=')?;
        (k == "session").then_some(v)
    })
}
