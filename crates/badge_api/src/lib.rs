//! Authenticated mutation client for BadgeApp project entries.
//!
//! BadgeApp exposes no write API on its JSON endpoints, so updates are made
//! the way a browser makes them: render the project's edit form, lift the
//! per-form security tokens out of the HTML, then submit a form-encoded
//! `PATCH` to the HTML endpoint carrying those tokens and the (possibly
//! rotated) session cookie.
//!
//! Most callers only need [`write_to_project`] or
//! [`BadgeApiClient::write_to_project`]. The lower-level steps are public as
//! [`BadgeApiClient::get_project_tokens`] and [`BadgeApiClient::patch_project`].
//!
//! The crate holds no credentials and keeps no global state: the session
//! identifier is threaded explicitly through every call.

pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod headers;
pub mod outcome;
pub mod projects;
pub mod session;
pub mod tokens;
pub mod url;

pub use client::{write_to_project, BadgeApiClient, ProjectTokens};
pub use config::{BadgeApiConfig, Environment};
pub use error::BadgeApiError;
pub use form::FieldUpdates;
pub use outcome::{classify_submission, MutationOutcome, SubmissionResponse};
pub use projects::{count_projects_with_language, DownloadOptions};
pub use session::next_session_id;
pub use tokens::{RegexTokenExtractor, TokenExtractor, TokenKind};
pub use crate::url::{
    normalize_base_url, DEFAULT_COOKIE_NAME, LOCAL_BASE_URL, PRODUCTION_BASE_URL, STAGING_BASE_URL,
};
