use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BadgeApiError {
    #[error("a session cookie value is required")]
    MissingSessionId,

    #[error("a base URL is required")]
    MissingBaseUrl,

    #[error("invalid base URL '{url}': {message}")]
    InvalidBaseUrl { url: String, message: String },

    #[error("invalid value for header {name}")]
    InvalidHeaderValue { name: String },

    #[error("invalid field updates: {0}")]
    InvalidFieldUpdates(String),

    #[error("tokens were rendered for project {found} but the write targets project {expected}")]
    TokenScopeMismatch { expected: u64, found: u64 },

    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: StatusCode, url: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error while {operation} at {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BadgeApiError {
    #[must_use]
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    #[must_use]
    pub fn invalid_header(name: impl Into<String>) -> Self {
        Self::InvalidHeaderValue { name: name.into() }
    }
}
