use crate::analysis::{AnalysisResult, AnalyzeError, build_result};
use crate::config::Config;
use crate::facts::github::{ClientSettings, GitHubClient, RateLimitState};
use crate::facts::{CacheResult, Clock, RepoSpec, RepositoryFetcher, RequestTracker, ResponseCache, TimeRange};
use crate::reports::{ExecutiveSummarizer, build_prompt};
use std::sync::Arc;
use std::time::Instant;

const LOG_TARGET: &str = "analysis";

/// Cached analyses are keyed by repository and window; GitHub names are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    owner: String,
    repo: String,
    time_range: TimeRange,
}

impl CacheKey {
    fn new(repo: &RepoSpec, time_range: TimeRange) -> Self {
        Self {
            owner: repo.owner().to_lowercase(),
            repo: repo.repo().to_lowercase(),
            time_range,
        }
    }
}

/// Everything an analysis needs, created once per process and shared by every request.
#[derive(Debug)]
pub struct AnalysisContext {
    config: Config,
    client: GitHubClient,
    cache: ResponseCache<CacheKey, Arc<AnalysisResult>>,
    clock: Arc<dyn Clock>,
    summarizer: Option<ExecutiveSummarizer>,
}

impl AnalysisContext {
    pub fn new(
        config: Config,
        token: Option<String>,
        clock: Arc<dyn Clock>,
        summarizer: Option<ExecutiveSummarizer>,
    ) -> anyhow::Result<Self> {
        let settings = ClientSettings::from_config(&config, token);
        let client = GitHubClient::new(settings, Arc::new(RateLimitState::new()), Arc::clone(&clock))?;
        let cache = ResponseCache::new(config.cache_ttl, Arc::clone(&clock));

        Ok(Self {
            config,
            client,
            cache,
            clock,
            summarizer,
        })
    }

    /// Analyzes the repository at `repo_url` over `time_range`.
    ///
    /// Served from the cache when a fresh result exists. While the process is rate limited, uncached
    /// requests fail immediately without contacting GitHub.
    pub async fn analyze(
        &self,
        repo_url: &str,
        time_range: TimeRange,
        tracker: RequestTracker,
    ) -> Result<Arc<AnalysisResult>, AnalyzeError> {
        let repo = RepoSpec::parse_url(repo_url)?;
        let key = CacheKey::new(&repo, time_range);

        if let CacheResult::Hit(result) = self.cache.get(&key) {
            log::info!(target: LOG_TARGET, "Serving cached analysis of {repo} over '{time_range}'");
            return Ok(result);
        }

        let start_time = Instant::now();
        let fetcher = RepositoryFetcher::new(&self.client, &self.config, self.clock.as_ref(), tracker);
        let snapshot = fetcher.fetch(&repo, time_range).await?;

        let executive_summary = match &self.summarizer {
            Some(summarizer) => {
                let prompt = build_prompt(
                    &repo.to_string(),
                    time_range,
                    snapshot.window_commits(),
                    &snapshot.commit_details,
                    self.config.detail_commit_limit,
                );
                summarizer.summarize(&prompt).await
            }
            None => None,
        };

        let result = Arc::new(build_result(snapshot, executive_summary, self.clock.now()));
        self.cache.set(key, Arc::clone(&result));

        log::info!(
            target: LOG_TARGET,
            "Analyzed {repo} over '{time_range}' in {:.3}s: {} commit(s), {} branch(es)",
            start_time.elapsed().as_secs_f64(),
            result.stats.total_commits,
            result.stats.branches_analyzed
        );

        Ok(result)
    }
}
