//! Read-only download of the public, paged project listing.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use std::thread;
use std::time::Duration;

use regex::Regex;
use reqwest::header::ACCEPT;
use serde_json::Value;

use crate::client::BadgeApiClient;
use crate::error::BadgeApiError;
use crate::url::projects_page_url;

/// Pause between page requests to stay clear of rate limits.
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct DownloadOptions {
    pub page_delay: Duration,
    /// Stop after this many pages even if more remain.
    pub max_pages: Option<u32>,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            page_delay: DEFAULT_PAGE_DELAY,
            max_pages: None,
        }
    }
}

impl DownloadOptions {
    pub fn with_page_delay(mut self, page_delay: Duration) -> Self {
        self.page_delay = page_delay;
        self
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = Some(max_pages);
        self
    }
}

impl BadgeApiClient {
    /// Download every page of `projects.json`, starting at page 1 and
    /// stopping at the first empty page. The whole set is held in memory.
    pub fn fetch_projects(&self, options: &DownloadOptions) -> Result<Vec<Value>, BadgeApiError> {
        let mut projects = Vec::new();
        let mut page = 1;

        loop {
            let url = projects_page_url(self.base_url(), page);
            let response = self
                .download_http()
                .get(&url)
                .header(ACCEPT, "application/json")
                .send()?;
            let status = response.status();
            if !status.is_success() {
                return Err(BadgeApiError::Status { status, url });
            }

            let page_data: Vec<Value> = serde_json::from_str(&response.text()?)?;
            tracing::info!(page, count = page_data.len(), "retrieved project page");
            if page_data.is_empty() {
                break;
            }
            projects.extend(page_data);

            if options.max_pages.is_some_and(|max| page >= max) {
                break;
            }
            page += 1;
            thread::sleep(options.page_delay);
        }

        Ok(projects)
    }

    /// Projects from `cache_path` when it exists, otherwise downloaded and
    /// saved there. Delete the file to force a fresh download.
    pub fn load_projects(
        &self,
        cache_path: &Path,
        options: &DownloadOptions,
    ) -> Result<Vec<Value>, BadgeApiError> {
        if cache_path.exists() {
            tracing::info!(path = %cache_path.display(), "loading cached projects");
            let text = fs::read_to_string(cache_path)
                .map_err(|error| BadgeApiError::io("reading cache", cache_path, error))?;
            return Ok(serde_json::from_str(&text)?);
        }

        tracing::info!("retrieving projects");
        let projects = self.fetch_projects(options)?;
        tracing::info!(path = %cache_path.display(), "saving projects");
        let text = serde_json::to_string(&projects)?;
        fs::write(cache_path, text)
            .map_err(|error| BadgeApiError::io("writing cache", cache_path, error))?;
        Ok(projects)
    }
}

/// Number of projects whose `implementation_languages` list names `language`.
pub fn count_projects_with_language(projects: &[Value], language: &str) -> usize {
    projects
        .iter()
        .filter_map(|project| project.get("implementation_languages")?.as_str())
        .filter(|languages| {
            language_separator()
                .split(languages)
                .any(|candidate| candidate == language)
        })
        .count()
}

fn language_separator() -> &'static Regex {
    static CACHED: OnceLock<Regex> = OnceLock::new();
    CACHED.get_or_init(|| Regex::new(r" *, *").expect("language separator regex must compile"))
}
