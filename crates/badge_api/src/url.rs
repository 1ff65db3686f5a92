/// Local development server.
pub const LOCAL_BASE_URL: &str = "http://localhost:3000/";
/// Staging deployment.
pub const STAGING_BASE_URL: &str = "https://staging.bestpractices.coreinfrastructure.org/";
/// Production deployment. Writes here change real project entries.
pub const PRODUCTION_BASE_URL: &str = "https://bestpractices.coreinfrastructure.org/";

/// Name of the Rails session cookie, used both outgoing and in `Set-Cookie`.
pub const DEFAULT_COOKIE_NAME: &str = "_BadgeApp_session";

/// Normalize a base URL so it ends in exactly one `/`.
///
/// Returns `None` for blank input; the caller decides whether that is fatal.
pub fn normalize_base_url(input: &str) -> Option<String> {
    let trimmed = input.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    Some(format!("{trimmed}/"))
}

/// HTML edit form for a project: `{base}en/projects/{id}/edit`.
pub fn edit_url(base_url: &str, project_id: u64) -> String {
    format!("{base_url}en/projects/{project_id}/edit")
}

/// HTML form endpoint a project edit is submitted to: `{base}en/projects/{id}`.
///
/// The `.json` variant of this resource rejects writes.
pub fn project_url(base_url: &str, project_id: u64) -> String {
    format!("{base_url}en/projects/{project_id}")
}

/// One page of the public project listing: `{base}projects.json?page={page}`.
pub fn projects_page_url(base_url: &str, page: u32) -> String {
    format!("{base_url}projects.json?page={page}")
}
