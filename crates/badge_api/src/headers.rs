use std::collections::BTreeMap;

use crate::config::BadgeApiConfig;

pub const HEADER_ACCEPT: &str = "accept";
pub const HEADER_CONTENT_TYPE: &str = "content-type";
pub const HEADER_COOKIE: &str = "cookie";
pub const HEADER_CSRF_TOKEN: &str = "x-csrf-token";
pub const HEADER_USER_AGENT: &str = "user-agent";

pub const ACCEPT_HTML: &str = "text/html,application/xhtml+xml";
pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

/// Single `Cookie` header value carrying only the session cookie.
pub fn session_cookie(cookie_name: &str, session_id: &str) -> String {
    format!("{cookie_name}={session_id}")
}

/// Headers for the authenticated edit-page read.
///
/// No `Origin` is sent; Rails accepts a missing origin as same-origin.
pub fn build_read_headers(config: &BadgeApiConfig, session_id: &str) -> BTreeMap<String, String> {
    let mut headers = base_headers(config, session_id);
    headers.insert(HEADER_ACCEPT.to_owned(), ACCEPT_HTML.to_owned());
    headers
}

/// Headers for the form submission.
///
/// The session id is sent as given, even when the server rotated it to an
/// empty value; the server then rejects the write. A missing CSRF token
/// leaves the header off with the same effect.
pub fn build_write_headers(
    config: &BadgeApiConfig,
    session_id: &str,
    csrf_token: Option<&str>,
) -> BTreeMap<String, String> {
    let mut headers = base_headers(config, session_id);
    headers.insert(HEADER_ACCEPT.to_owned(), ACCEPT_HTML.to_owned());
    headers.insert(
        HEADER_CONTENT_TYPE.to_owned(),
        CONTENT_TYPE_FORM.to_owned(),
    );
    if let Some(token) = csrf_token {
        headers.insert(HEADER_CSRF_TOKEN.to_owned(), token.to_owned());
    }
    headers
}

fn base_headers(config: &BadgeApiConfig, session_id: &str) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert(
        HEADER_COOKIE.to_owned(),
        session_cookie(&config.cookie_name, session_id),
    );

    let ua = match config.user_agent.as_deref() {
        Some(explicit) if !explicit.trim().is_empty() => explicit.trim().to_owned(),
        _ => default_user_agent(),
    };
    headers.insert(HEADER_USER_AGENT.to_owned(), ua);

    headers
}

/// `badge-modify/<version>`.
pub fn default_user_agent() -> String {
    format!("badge-modify/{}", env!("CARGO_PKG_VERSION"))
}
