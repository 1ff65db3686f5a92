use std::time::Duration;

use crate::url::{DEFAULT_COOKIE_NAME, LOCAL_BASE_URL, PRODUCTION_BASE_URL, STAGING_BASE_URL};

/// Named BadgeApp deployments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Staging,
    Production,
}

impl Environment {
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Local => LOCAL_BASE_URL,
            Self::Staging => STAGING_BASE_URL,
            Self::Production => PRODUCTION_BASE_URL,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }
}

/// Transport configuration for BadgeApp requests.
///
/// The session identifier is deliberately absent: it rotates per request and
/// is passed through each call instead of living here.
#[derive(Debug, Clone)]
pub struct BadgeApiConfig {
    /// Base URL; normalized to end in `/` when the client is built.
    pub base_url: String,
    /// Session cookie name sent on requests and looked for in `Set-Cookie`.
    pub cookie_name: String,
    /// Optional `User-Agent` override.
    pub user_agent: Option<String>,
    /// Optional per-request timeout. Unset means the transport default.
    pub timeout: Option<Duration>,
}

impl Default for BadgeApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            user_agent: None,
            timeout: None,
        }
    }
}

impl BadgeApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn for_environment(environment: Environment) -> Self {
        Self::new(environment.base_url())
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_cookie_name(mut self, cookie_name: impl Into<String>) -> Self {
        self.cookie_name = cookie_name.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
