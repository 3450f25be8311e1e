//! CI/CD tooling detection by probing for well-known configuration files.

use crate::facts::RequestTracker;
use crate::facts::github::GitHubClient;
use crate::facts::repo_spec::RepoSpec;
use futures::future::join_all;

const LOG_TARGET: &str = "tooling";

/// Paths probed on the default branch and the tool each one indicates.
pub const TOOLING_PROBES: &[(&str, &str)] = &[
    (".github/workflows", "GitHub Actions"),
    (".gitlab-ci.yml", "GitLab CI"),
    (".circleci/config.yml", "CircleCI"),
    (".travis.yml", "Travis CI"),
    ("Jenkinsfile", "Jenkins"),
    ("azure-pipelines.yml", "Azure Pipelines"),
    ("Dockerfile", "Docker"),
    (".github/dependabot.yml", "Dependabot"),
    ("renovate.json", "Renovate"),
];

/// Probe every known path concurrently and return the tools found, in table order.
///
/// A failed probe, whatever the reason, counts as "not present".
pub async fn detect_tooling(client: &GitHubClient, repo: &RepoSpec, branch: &str, tracker: &RequestTracker) -> Vec<String> {
    let probes = TOOLING_PROBES.iter().map(|(path, tool)| async move {
        let endpoint = format!("repos/{}/{}/contents/{path}", repo.owner(), repo.repo());
        tracker.add_request("contents");
        let found = client
            .request::<serde_json::Value>(&endpoint, &[("ref", branch.to_string())])
            .await
            .is_ok();
        tracker.complete_request("contents");

        log::debug!(target: LOG_TARGET, "Probe '{path}' for {repo}: {}", if found { "present" } else { "absent" });
        found.then_some(*tool)
    });

    let mut tools: Vec<String> = Vec::new();
    for tool in join_all(probes).await.into_iter().flatten() {
        if !tools.iter().any(|t| t == tool) {
            tools.push(tool.to_string());
        }
    }
    tools
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::clock::SystemClock;
    use crate::facts::github::{ClientSettings, RateLimitState};
    use core::time::Duration;
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_detects_present_files_and_treats_failures_as_absent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/demo/contents/.github/workflows"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "name": "ci.yml" }])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/demo/contents/Dockerfile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "Dockerfile" })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/demo/contents/Jenkinsfile"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })))
            .mount(&server)
            .await;

        let settings = ClientSettings {
            api_url: server.uri(),
            token: None,
            min_request_interval: Duration::ZERO,
            rate_limit_low_water: 10,
            max_attempts: 1,
            backoff_base: Duration::from_millis(1),
            request_timeout: Duration::from_secs(5),
        };
        let client = GitHubClient::new(settings, Arc::new(RateLimitState::new()), Arc::new(SystemClock)).unwrap();
        let tracker = RequestTracker::new();

        let tools = detect_tooling(&client, &RepoSpec::new("octo", "demo"), "main", &tracker).await;
        assert_eq!(tools, vec!["GitHub Actions", "Docker"]);
        assert_eq!(tracker.issued_counts().get("contents"), Some(&(TOOLING_PROBES.len() as u64)));
    }
}
