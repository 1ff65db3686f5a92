//! Security-token scraping from a rendered edit page.
//!
//! BadgeApp renders two independent anti-forgery values into every edit form:
//! a hidden `authenticity_token` input and a `csrf-token` meta tag. Both are
//! pulled out with fixed patterns that assume the exact attribute text Rails
//! emits. That assumption lives only in this module; callers go through
//! [`TokenExtractor`] so the matching strategy can change without touching
//! them.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Hidden form field carrying the per-form authenticity token.
pub const AUTH_TOKEN_HTML_PATTERN: &str =
    r#"<input type="hidden" name="authenticity_token" value="([^"]+)""#;

/// Page metadata carrying the CSRF token sent back as a request header.
pub const CSRF_TOKEN_HTML_PATTERN: &str = r#"<meta name="csrf-token" content="([^"]+)""#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Authenticity,
    Csrf,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authenticity => "authenticity_token",
            Self::Csrf => "csrf_token",
        }
    }
}

/// Strategy for locating a token in raw HTML.
///
/// Implementations return the first match and `None` when the page does not
/// contain the token. They never fail the caller.
pub trait TokenExtractor: fmt::Debug + Send + Sync {
    fn extract(&self, html: &str, kind: TokenKind) -> Option<String>;
}

/// Regex-backed extractor; the default for every client.
#[derive(Debug, Clone)]
pub struct RegexTokenExtractor {
    authenticity: Regex,
    csrf: Regex,
}

impl RegexTokenExtractor {
    /// Build an extractor from custom patterns. Each pattern must have one
    /// capture group holding the token value.
    pub fn new(authenticity_pattern: &str, csrf_pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            authenticity: Regex::new(authenticity_pattern)?,
            csrf: Regex::new(csrf_pattern)?,
        })
    }

    fn pattern(&self, kind: TokenKind) -> &Regex {
        match kind {
            TokenKind::Authenticity => &self.authenticity,
            TokenKind::Csrf => &self.csrf,
        }
    }
}

impl Default for RegexTokenExtractor {
    fn default() -> Self {
        Self {
            authenticity: auth_token_regex().clone(),
            csrf: csrf_token_regex().clone(),
        }
    }
}

impl TokenExtractor for RegexTokenExtractor {
    fn extract(&self, html: &str, kind: TokenKind) -> Option<String> {
        let token = find_token(html, self.pattern(kind));
        if token.is_none() {
            tracing::warn!(token = kind.as_str(), "failed to find token in page");
        }
        token
    }
}

/// First capture of `pattern` in `html`, if any.
pub fn find_token(html: &str, pattern: &Regex) -> Option<String> {
    pattern
        .captures(html)
        .and_then(|captures| captures.get(1))
        .map(|value| value.as_str().to_owned())
}

fn auth_token_regex() -> &'static Regex {
    static CACHED: OnceLock<Regex> = OnceLock::new();
    CACHED.get_or_init(|| {
        Regex::new(AUTH_TOKEN_HTML_PATTERN).expect("authenticity token regex must compile")
    })
}

fn csrf_token_regex() -> &'static Regex {
    static CACHED: OnceLock<Regex> = OnceLock::new();
    CACHED.get_or_init(|| Regex::new(CSRF_TOKEN_HTML_PATTERN).expect("csrf token regex must compile"))
}
