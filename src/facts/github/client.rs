use super::{GitHubError, LOG_TARGET, RateLimitState};
use anyhow::Context;
use crate::config::Config;
use crate::facts::clock::Clock;
use chrono::{DateTime, Utc};
use core::time::Duration;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, RETRY_AFTER, USER_AGENT};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;

const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";
const RATE_LIMIT_RESET: &str = "x-ratelimit-reset";

/// Knobs governing how the client talks to GitHub.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub api_url: String,
    pub token: Option<String>,
    pub min_request_interval: Duration,
    pub rate_limit_low_water: u64,
    pub max_attempts: u32,
    pub backoff_base: Duration,
    pub request_timeout: Duration,
}

impl ClientSettings {
    #[must_use]
    pub fn from_config(config: &Config, token: Option<String>) -> Self {
        Self {
            api_url: config.github_api_url.clone(),
            token,
            min_request_interval: config.min_request_interval,
            rate_limit_low_water: config.rate_limit_low_water,
            max_attempts: config.max_attempts,
            backoff_base: config.backoff_base,
            request_timeout: config.request_timeout,
        }
    }
}

/// Authenticated GitHub REST client with request spacing, rate-limit tracking, and retries.
///
/// Clones share the same connection pool and the same [`RateLimitState`].
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    settings: Arc<ClientSettings>,
    rate_limit: Arc<RateLimitState>,
    clock: Arc<dyn Clock>,
}

impl GitHubClient {
    pub fn new(settings: ClientSettings, rate_limit: Arc<RateLimitState>, clock: Arc<dyn Clock>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .context("building the GitHub HTTP client")?;

        Ok(Self {
            http,
            settings: Arc::new(settings),
            rate_limit,
            clock,
        })
    }

    /// Fail fast if the process-wide throttle is engaged.
    pub fn ensure_not_throttled(&self) -> Result<(), GitHubError> {
        self.rate_limit.check(self.clock.now())
    }

    /// Issue a GET against `path` (relative to the API root) and decode the JSON body.
    ///
    /// Statuses 403 and 429 are retried after the server's `Retry-After` or an exponential backoff,
    /// as are transport failures. Any other non-success status fails immediately.
    pub async fn request<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T, GitHubError> {
        let url = self.endpoint(path);
        let max_attempts = self.settings.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            self.ensure_not_throttled()?;

            let wait = self.rate_limit.reserve_slot(self.settings.min_request_interval);
            if !wait.is_zero() {
                tokio::time::sleep(wait).await;
            }

            let start_time = Instant::now();
            let response = match self.send(&url, params).await {
                Ok(response) => response,
                Err(e) => {
                    if attempt + 1 < max_attempts {
                        let delay = self.backoff(attempt);
                        log::warn!(target: LOG_TARGET, "Request to '{path}' failed ({e}), retrying in {:.1}s", delay.as_secs_f64());
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(GitHubError::Transport(e));
                }
            };

            self.observe_rate_limit(response.headers());

            let status = response.status();
            if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
                let delay = retry_after(response.headers()).unwrap_or_else(|| self.backoff(attempt));
                if attempt + 1 < max_attempts {
                    log::warn!(
                        target: LOG_TARGET,
                        "GitHub answered {status} for '{path}' (attempt {}/{max_attempts}), waiting {:.1}s",
                        attempt + 1,
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    continue;
                }
                return Err(GitHubError::RateLimited {
                    retry_after: delay.as_secs().max(1),
                });
            }

            if !status.is_success() {
                let message = upstream_message(response, status).await;
                log::debug!(target: LOG_TARGET, "GitHub answered {status} for '{path}': {message}");
                return Err(GitHubError::Upstream {
                    status: status.as_u16(),
                    message,
                });
            }

            log::debug!(target: LOG_TARGET, "GET '{path}' completed in {:.3}s", start_time.elapsed().as_secs_f64());

            return response.json::<T>().await.map_err(|source| GitHubError::Decode {
                endpoint: path.to_string(),
                source,
            });
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.settings.api_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    async fn send(&self, url: &str, params: &[(&str, String)]) -> Result<reqwest::Response, reqwest::Error> {
        let mut request = self
            .http
            .get(url)
            .query(params)
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, concat!("gitpulse/", env!("CARGO_PKG_VERSION")))
            .header("X-GitHub-Api-Version", "2022-11-28");

        if let Some(token) = &self.settings.token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        request.send().await
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.settings.backoff_base.saturating_mul(1u32 << attempt.min(16))
    }

    fn observe_rate_limit(&self, headers: &HeaderMap) {
        let remaining = header_u64(headers, RATE_LIMIT_REMAINING);
        let reset_at = header_u64(headers, RATE_LIMIT_RESET)
            .and_then(|secs| i64::try_from(secs).ok())
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));

        self.rate_limit
            .observe(remaining, reset_at, self.settings.rate_limit_low_water, self.clock.now());
    }
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}

fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    header_u64(headers, RETRY_AFTER.as_str()).map(Duration::from_secs)
}

async fn upstream_message(response: reqwest::Response, status: StatusCode) -> String {
    let fallback = status.canonical_reason().unwrap_or("request failed").to_string();
    match response.json::<super::api_types::ErrorBodyDto>().await {
        Ok(body) if !body.message.is_empty() => body.message,
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::clock::SystemClock;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer, token: Option<&str>) -> GitHubClient {
        let settings = ClientSettings {
            api_url: server.uri(),
            token: token.map(ToString::to_string),
            min_request_interval: Duration::ZERO,
            rate_limit_low_water: 10,
            max_attempts: 3,
            backoff_base: Duration::from_millis(1),
            request_timeout: Duration::from_secs(5),
        };
        GitHubClient::new(settings, Arc::new(RateLimitState::new()), Arc::new(SystemClock)).unwrap()
    }

    #[tokio::test]
    async fn test_request_decodes_json_and_sends_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/demo"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "default_branch": "main" })))
            .expect(1)
            .mount(&server)
            .await;

        let repo: crate::facts::github::RepositoryDto = client(&server, Some("secret")).request("repos/octo/demo", &[]).await.unwrap();
        assert_eq!(repo.default_branch, "main");
    }

    #[tokio::test]
    async fn test_request_passes_query_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/demo/commits"))
            .and(query_param("sha", "main"))
            .and(query_param("per_page", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let commits: Vec<serde_json::Value> = client(&server, None)
            .request("repos/octo/demo/commits", &[("sha", "main".to_string()), ("per_page", "100".to_string())])
            .await
            .unwrap();
        assert!(commits.is_empty());
    }

    #[tokio::test]
    async fn test_not_found_fails_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server, None)
            .request::<serde_json::Value>("repos/octo/missing", &[])
            .await
            .unwrap_err();
        match err {
            GitHubError::Upstream { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Not Found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rate_limited_is_retried_then_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/demo"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/demo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "default_branch": "trunk" })))
            .expect(1)
            .mount(&server)
            .await;

        let repo: crate::facts::github::RepositoryDto = client(&server, None).request("repos/octo/demo", &[]).await.unwrap();
        assert_eq!(repo.default_branch, "trunk");
    }

    #[tokio::test]
    async fn test_retry_ceiling_yields_rate_limit_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/demo"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "message": "secondary rate limit" })))
            .expect(3)
            .mount(&server)
            .await;

        let err = client(&server, None)
            .request::<serde_json::Value>("repos/octo/demo", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, GitHubError::RateLimited { retry_after: 1 }), "{err:?}");
    }

    #[tokio::test]
    async fn test_low_remaining_throttles_later_requests() {
        let server = MockServer::start().await;
        let reset = Utc::now().timestamp() + 120;
        Mock::given(method("GET"))
            .and(path("/repos/octo/demo"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("x-ratelimit-remaining", "3")
                    .insert_header("x-ratelimit-reset", reset.to_string().as_str())
                    .set_body_json(json!({ "default_branch": "main" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server, None);
        let _: serde_json::Value = client.request("repos/octo/demo", &[]).await.unwrap();
        assert!(client.ensure_not_throttled().is_err());

        let err = client.request::<serde_json::Value>("repos/octo/demo", &[]).await.unwrap_err();
        match err {
            GitHubError::RateLimited { retry_after } => assert!(retry_after > 100 && retry_after <= 120),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_transport_failure_is_retried_then_propagated() {
        // Bind then release a port so nothing is listening on it.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let uri = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let settings = ClientSettings {
            api_url: uri,
            token: None,
            min_request_interval: Duration::ZERO,
            rate_limit_low_water: 10,
            max_attempts: 2,
            backoff_base: Duration::from_millis(1),
            request_timeout: Duration::from_secs(2),
        };
        let client = GitHubClient::new(settings, Arc::new(RateLimitState::new()), Arc::new(SystemClock)).unwrap();

        let err = client.request::<serde_json::Value>("repos/octo/demo", &[]).await.unwrap_err();
        assert!(matches!(err, GitHubError::Transport(_)), "{err:?}");
    }

    #[test]
    fn test_backoff_doubles_per_attempt() {
        let settings = ClientSettings {
            api_url: "https://api.github.com".to_string(),
            token: None,
            min_request_interval: Duration::ZERO,
            rate_limit_low_water: 10,
            max_attempts: 3,
            backoff_base: Duration::from_secs(1),
            request_timeout: Duration::from_secs(5),
        };
        let client = GitHubClient::new(settings, Arc::new(RateLimitState::new()), Arc::new(SystemClock)).unwrap();
        assert_eq!(client.backoff(0), Duration::from_secs(1));
        assert_eq!(client.backoff(1), Duration::from_secs(2));
        assert_eq!(client.backoff(2), Duration::from_secs(4));
    }
}
