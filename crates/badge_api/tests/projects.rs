mod support;

use std::fs;
use std::time::Duration;

use badge_api::{
    count_projects_with_language, BadgeApiClient, BadgeApiConfig, BadgeApiError, DownloadOptions,
};
use pretty_assertions::assert_eq;
use serde_json::json;

use support::{ScriptedResponse, ScriptedServer};

fn fast() -> DownloadOptions {
    DownloadOptions::default().with_page_delay(Duration::ZERO)
}

fn client_for(server: &ScriptedServer) -> BadgeApiClient {
    BadgeApiClient::new(BadgeApiConfig::new(&server.base_url)).expect("client")
}

#[test]
fn pages_are_fetched_until_an_empty_page() {
    let server = ScriptedServer::start(|_| {
        vec![
            ScriptedResponse::json(200, r#"[{"id":1},{"id":2}]"#),
            ScriptedResponse::json(200, r#"[{"id":3}]"#),
            ScriptedResponse::json(200, "[]"),
        ]
    });

    let projects = client_for(&server).fetch_projects(&fast()).expect("download");
    assert_eq!(projects, vec![json!({"id":1}), json!({"id":2}), json!({"id":3})]);

    let paths: Vec<_> = server.requests().into_iter().map(|r| r.path).collect();
    assert_eq!(
        paths,
        vec![
            "/projects.json?page=1",
            "/projects.json?page=2",
            "/projects.json?page=3"
        ]
    );
}

#[test]
fn max_pages_bounds_the_download() {
    let server = ScriptedServer::start(|_| {
        vec![
            ScriptedResponse::json(200, r#"[{"id":1}]"#),
            ScriptedResponse::json(200, r#"[{"id":2}]"#),
        ]
    });

    let projects = client_for(&server)
        .fetch_projects(&fast().with_max_pages(1))
        .expect("download");
    assert_eq!(projects, vec![json!({"id":1})]);
    assert_eq!(server.requests().len(), 1);
}

#[test]
fn download_follows_redirects() {
    let server = ScriptedServer::start(|base| {
        vec![
            ScriptedResponse::redirect(301, format!("{base}en/projects.json?page=1")),
            ScriptedResponse::json(200, "[]"),
        ]
    });

    let projects = client_for(&server).fetch_projects(&fast()).expect("download");
    assert!(projects.is_empty());

    let paths: Vec<_> = server.requests().into_iter().map(|r| r.path).collect();
    assert_eq!(paths, vec!["/projects.json?page=1", "/en/projects.json?page=1"]);
}

#[test]
fn error_page_stops_the_download() {
    let server = ScriptedServer::start(|_| vec![ScriptedResponse::json(503, "{}")]);

    let result = client_for(&server).fetch_projects(&fast());
    assert!(matches!(result, Err(BadgeApiError::Status { .. })));
}

#[test]
fn download_is_cached_and_reused() {
    let dir = tempfile::tempdir().expect("temp dir");
    let cache = dir.path().join("projects.json");
    let server = ScriptedServer::start(|_| {
        vec![
            ScriptedResponse::json(200, r#"[{"id":1,"implementation_languages":"R, C"}]"#),
            ScriptedResponse::json(200, "[]"),
        ]
    });
    let client = client_for(&server);

    let downloaded = client.load_projects(&cache, &fast()).expect("download");
    assert_eq!(server.requests().len(), 2);
    assert!(cache.exists());

    let cached = client.load_projects(&cache, &fast()).expect("cached");
    assert_eq!(server.requests().len(), 2);
    assert_eq!(cached, downloaded);
    assert_eq!(count_projects_with_language(&cached, "R"), 1);
}

#[test]
fn unreadable_cache_is_reported() {
    let dir = tempfile::tempdir().expect("temp dir");
    let cache = dir.path().join("projects.json");
    fs::write(&cache, "not json").expect("write cache");
    let server = ScriptedServer::start(|_| Vec::new());

    let result = client_for(&server).load_projects(&cache, &fast());
    assert!(matches!(result, Err(BadgeApiError::Json(_))));
    assert!(server.requests().is_empty());
}
