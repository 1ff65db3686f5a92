use reqwest::header::{HeaderMap, SET_COOKIE};

/// Session identifier to use for the request after the one that produced
/// `headers`.
///
/// Rails may rotate the session cookie on any authenticated request,
/// including the edit-page read, so the value from `Set-Cookie` supersedes
/// `current`. A response without `Set-Cookie`, or one that only sets other
/// cookies, keeps `current` and logs a warning. Given
/// `Set-Cookie: _BadgeApp_session=VALUE; path=/; HttpOnly` this returns
/// `VALUE`.
pub fn next_session_id(headers: &HeaderMap, cookie_name: &str, current: &str) -> String {
    let mut set_cookies = headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .peekable();

    if set_cookies.peek().is_none() {
        tracing::warn!("no session cookie update in response");
        return current.to_owned();
    }

    let expected_prefix = format!("{cookie_name}=");
    match set_cookies.find_map(|value| value.strip_prefix(expected_prefix.as_str())) {
        Some(leftover) => session_value(leftover).to_owned(),
        None => {
            tracing::warn!(cookie = cookie_name, "response set a different cookie");
            current.to_owned()
        }
    }
}

fn session_value(leftover: &str) -> &str {
    leftover.split(';').next().unwrap_or(leftover)
}
