//! Helpers shared by the integration tests: a mock GitHub API and fixture builders.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use chrono::{DateTime, Duration, SecondsFormat, TimeZone, Utc};
use gitpulse::config::Config;
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const OWNER: &str = "acme";
pub const REPO: &str = "widgets";

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 30, 12, 0, 0).unwrap()
}

pub fn days_ago(days: i64) -> String {
    (now() - Duration::days(days)).to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Configuration pointing at `server` with no request spacing and no tooling probes.
pub fn test_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.github_api_url = server.uri();
    config.min_request_interval = core::time::Duration::ZERO;
    config.backoff_base = core::time::Duration::from_millis(1);
    config.detect_tooling = false;
    config.llm.endpoint = String::new();
    config
}

pub fn commit_json(sha: &str, email: &str, days: i64, message: &str) -> Value {
    json!({
        "sha": sha,
        "html_url": format!("https://github.com/{OWNER}/{REPO}/commit/{sha}"),
        "commit": {
            "author": { "name": email.split('@').next().unwrap(), "email": email, "date": days_ago(days) },
            "committer": { "name": "GitHub", "email": "noreply@github.com", "date": days_ago(days) },
            "message": message
        },
        "author": null,
        "parents": [{ "sha": "0000000" }]
    })
}

pub fn pull_json(number: u64, title: &str, merged_days_ago: Option<i64>) -> Value {
    json!({
        "number": number,
        "title": title,
        "user": { "login": "ann" },
        "merged_at": merged_days_ago.map(days_ago),
        "head": { "ref": format!("feature/{number}") },
        "html_url": format!("https://github.com/{OWNER}/{REPO}/pull/{number}")
    })
}

pub fn repo_path(suffix: &str) -> String {
    format!("/repos/{OWNER}/{REPO}{suffix}")
}

pub async fn mount_repository(server: &MockServer, default_branch: &str) {
    Mock::given(method("GET"))
        .and(path(repo_path("")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "default_branch": default_branch })))
        .mount(server)
        .await;
}

pub async fn mount_branches(server: &MockServer, names: &[&str]) {
    let body: Vec<Value> = names.iter().map(|name| json!({ "name": name })).collect();
    Mock::given(method("GET"))
        .and(path(repo_path("/branches")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub async fn mount_commits(server: &MockServer, branch: &str, commits: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(repo_path("/commits")))
        .and(query_param("sha", branch))
        .respond_with(ResponseTemplate::new(200).set_body_json(commits))
        .mount(server)
        .await;
}

pub async fn mount_pulls(server: &MockServer, pulls: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(repo_path("/pulls")))
        .and(query_param("state", "closed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pulls))
        .mount(server)
        .await;
}

/// A small repository: two branches sharing one commit, and two merged pull requests.
pub async fn mount_small_repository(server: &MockServer) {
    mount_repository(server, "main").await;
    mount_branches(server, &["main", "feature/login"]).await;
    mount_commits(
        server,
        "main",
        vec![
            commit_json("a1", "ann@example.com", 1, "feat: add login page"),
            commit_json("b2", "bob@example.com", 2, "Fix memory leak in parser"),
            commit_json("c3", "ann@example.com", 20, "Initial import"),
        ],
    )
    .await;
    mount_commits(
        server,
        "feature/login",
        vec![
            commit_json("d4", "cy@example.com", 1, "Add login form tests"),
            commit_json("a1", "ann@example.com", 1, "feat: add login page"),
        ],
    )
    .await;
    mount_pulls(
        server,
        vec![
            pull_json(7, "feat(auth): add login page", Some(1)),
            pull_json(8, "Closed without merging", None),
        ],
    )
    .await;
}
