use std::collections::BTreeMap;
use std::sync::Arc;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, LOCATION};
use reqwest::redirect::Policy;
use reqwest::Method;
use url::Url;

use crate::config::BadgeApiConfig;
use crate::error::BadgeApiError;
use crate::form::{encode_project_form, FieldUpdates};
use crate::headers::{build_read_headers, build_write_headers};
use crate::outcome::{classify_submission, MutationOutcome, SubmissionResponse};
use crate::session::next_session_id;
use crate::tokens::{RegexTokenExtractor, TokenExtractor, TokenKind};
use crate::url::{edit_url, normalize_base_url, project_url};

/// Tokens scraped from one project's edit page, plus the session identifier
/// to present alongside them.
///
/// The set is only valid for the project it was rendered for and for a
/// single submission, so it can only be built by reading an edit page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectTokens {
    project_id: u64,
    authenticity_token: Option<String>,
    csrf_token: Option<String>,
    session_id: String,
}

impl ProjectTokens {
    /// No tokens: the edit page was not viewable with this session.
    pub fn denied(project_id: u64, session_id: impl Into<String>) -> Self {
        Self {
            project_id,
            authenticity_token: None,
            csrf_token: None,
            session_id: session_id.into(),
        }
    }

    #[doc(hidden)]
    pub fn from_parts(
        project_id: u64,
        authenticity_token: Option<String>,
        csrf_token: Option<String>,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            project_id,
            authenticity_token,
            csrf_token,
            session_id: session_id.into(),
        }
    }

    pub fn project_id(&self) -> u64 {
        self.project_id
    }

    pub fn authenticity_token(&self) -> Option<&str> {
        self.authenticity_token.as_deref()
    }

    pub fn csrf_token(&self) -> Option<&str> {
        self.csrf_token.as_deref()
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn is_denied(&self) -> bool {
        self.authenticity_token.is_none() && self.csrf_token.is_none()
    }
}

/// Blocking BadgeApp client. Redirects are never followed on the edit and
/// write requests: the write protocol reads them as its success signal.
#[derive(Debug)]
pub struct BadgeApiClient {
    http: Client,
    /// Follows redirects; only used for the public read-only download.
    download_http: Client,
    config: BadgeApiConfig,
    extractor: Arc<dyn TokenExtractor>,
}

impl BadgeApiClient {
    pub fn new(config: BadgeApiConfig) -> Result<Self, BadgeApiError> {
        let mut config = config;
        config.base_url =
            normalize_base_url(&config.base_url).ok_or(BadgeApiError::MissingBaseUrl)?;
        Url::parse(&config.base_url).map_err(|error| BadgeApiError::InvalidBaseUrl {
            url: config.base_url.clone(),
            message: error.to_string(),
        })?;

        let http = http_client(&config, Policy::none())?;
        let download_http = http_client(&config, Policy::default())?;

        Ok(Self {
            http,
            download_http,
            config,
            extractor: Arc::new(RegexTokenExtractor::default()),
        })
    }

    /// Replace the token scraping strategy.
    pub fn with_token_extractor(mut self, extractor: impl TokenExtractor + 'static) -> Self {
        self.extractor = Arc::new(extractor);
        self
    }

    pub fn config(&self) -> &BadgeApiConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub(crate) fn download_http(&self) -> &Client {
        &self.download_http
    }

    pub fn edit_url(&self, project_id: u64) -> String {
        edit_url(&self.config.base_url, project_id)
    }

    pub fn project_url(&self, project_id: u64) -> String {
        project_url(&self.config.base_url, project_id)
    }

    /// Read the project's edit form and collect what a write needs.
    ///
    /// Being redirected away or getting a non-success status means the
    /// session may not edit this project; that comes back as
    /// [`ProjectTokens::denied`], not as an error. Transport failures are
    /// errors.
    pub fn get_project_tokens(
        &self,
        project_id: u64,
        session_id: &str,
    ) -> Result<ProjectTokens, BadgeApiError> {
        if session_id.trim().is_empty() {
            return Err(BadgeApiError::MissingSessionId);
        }

        let url = parse_endpoint(&self.edit_url(project_id))?;
        let headers = header_map(build_read_headers(&self.config, session_id))?;

        tracing::debug!(project_id, %url, "requesting edit page");
        let response = self.http.get(url.clone()).headers(headers).send()?;

        let status = response.status();
        let redirected = response.url() != &url;
        if redirected || !status.is_success() {
            tracing::error!(
                project_id,
                status = status.as_u16(),
                "did not have permission to view edit page"
            );
            return Ok(ProjectTokens::denied(project_id, session_id));
        }

        let session_id = next_session_id(response.headers(), &self.config.cookie_name, session_id);
        let html = response.text()?;

        Ok(ProjectTokens {
            project_id,
            authenticity_token: self.extractor.extract(&html, TokenKind::Authenticity),
            csrf_token: self.extractor.extract(&html, TokenKind::Csrf),
            session_id,
        })
    }

    /// Submit `updates` through the project's HTML form endpoint.
    ///
    /// Consumes `tokens`: they are bound to the form render that produced
    /// them and must come from the same `project_id`.
    pub fn patch_project(
        &self,
        project_id: u64,
        updates: &FieldUpdates,
        tokens: ProjectTokens,
    ) -> Result<MutationOutcome, BadgeApiError> {
        if tokens.project_id != project_id {
            return Err(BadgeApiError::TokenScopeMismatch {
                expected: project_id,
                found: tokens.project_id,
            });
        }

        let url = parse_endpoint(&self.project_url(project_id))?;
        let headers = header_map(build_write_headers(
            &self.config,
            &tokens.session_id,
            tokens.csrf_token.as_deref(),
        ))?;
        let body = encode_project_form(updates, tokens.authenticity_token.as_deref());

        tracing::debug!(project_id, %url, fields = updates.len(), "submitting project form");
        let response = self
            .http
            .request(Method::PATCH, url.clone())
            .headers(headers)
            .body(body)
            .send()?;

        let status = response.status();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok());
        let submission = classify_submission(&url, status, location);

        match &submission {
            SubmissionResponse::RedirectedToSelf => {
                tracing::info!(project_id, "project updated");
            }
            SubmissionResponse::Unconfirmed { status } => {
                tracing::warn!(
                    project_id,
                    status = status.as_u16(),
                    "expected a redirect after the update; there may be an invalid key or value"
                );
            }
            SubmissionResponse::Rejected { status, location } => {
                tracing::error!(
                    project_id,
                    status = status.as_u16(),
                    location = location.as_deref().unwrap_or(""),
                    "unexpected response to project update"
                );
            }
        }

        Ok(submission.outcome())
    }

    /// Fetch tokens for `project_id` then submit `updates` with them and the
    /// rotated session identifier. The write is skipped when the edit page
    /// was not viewable.
    pub fn mutate_project(
        &self,
        project_id: u64,
        updates: &FieldUpdates,
        session_id: &str,
    ) -> Result<MutationOutcome, BadgeApiError> {
        let tokens = self.get_project_tokens(project_id, session_id)?;
        if tokens.is_denied() {
            return Ok(MutationOutcome::PermissionDenied);
        }
        self.patch_project(project_id, updates, tokens)
    }

    /// Write `updates` to project `project_id`; `true` when the server
    /// accepted it.
    pub fn write_to_project(
        &self,
        project_id: u64,
        updates: &FieldUpdates,
        session_id: &str,
    ) -> Result<bool, BadgeApiError> {
        self.mutate_project(project_id, updates, session_id)
            .map(|outcome| outcome.is_success())
    }
}

/// Write `updates` to project `project_id` at `base_url` using the
/// `_BadgeApp_session` value `session_id`.
///
/// `base_url` is the site root, e.g. `http://localhost:3000/`.
pub fn write_to_project(
    base_url: &str,
    project_id: u64,
    updates: &FieldUpdates,
    session_id: &str,
) -> Result<bool, BadgeApiError> {
    BadgeApiClient::new(BadgeApiConfig::new(base_url))?.write_to_project(
        project_id,
        updates,
        session_id,
    )
}

fn http_client(config: &BadgeApiConfig, redirect: Policy) -> Result<Client, BadgeApiError> {
    let mut builder = Client::builder().redirect(redirect);
    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

fn parse_endpoint(url: &str) -> Result<Url, BadgeApiError> {
    Url::parse(url).map_err(|error| BadgeApiError::InvalidBaseUrl {
        url: url.to_owned(),
        message: error.to_string(),
    })
}

fn header_map(headers: BTreeMap<String, String>) -> Result<HeaderMap, BadgeApiError> {
    let mut out = HeaderMap::new();
    for (key, value) in headers {
        out.insert(
            HeaderName::from_bytes(key.as_bytes())
                .map_err(|_| BadgeApiError::invalid_header(key.as_str()))?,
            HeaderValue::from_str(&value).map_err(|_| BadgeApiError::invalid_header(key.as_str()))?,
        );
    }
    Ok(out)
}
