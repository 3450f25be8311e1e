//! Optional executive summary written by an OpenAI-compatible chat completion endpoint.
//!
//! Any failure here degrades to "no executive summary"; it never fails an analysis.

use crate::config::LlmConfig;
use crate::facts::{Commit, CommitDetail, TimeRange};
use anyhow::Context;
use core::fmt::Write;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;
use url::Url;

const LOG_TARGET: &str = "summary";

/// Environment variable holding the API key for the summary endpoint.
pub const LLM_API_KEY_ENV: &str = "OPENAI_API_KEY";

const SYSTEM_PROMPT: &str = "You are an engineering manager writing a brief executive summary of recent work in a \
software repository. Write two or three short paragraphs in plain English for a non-technical audience. Focus on \
what changed and why it matters. Do not list commit hashes.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Builds the user prompt from the most recent commits and their truncated diffs.
#[must_use]
pub fn build_prompt<'a>(
    repository: &str,
    time_range: TimeRange,
    commits: impl IntoIterator<Item = &'a Commit>,
    details: &HashMap<String, CommitDetail>,
    limit: usize,
) -> String {
    let mut prompt = format!("Repository: {repository}\nWindow: {time_range}\n\nRecent commits:\n");

    for commit in commits.into_iter().take(limit) {
        let _ = writeln!(prompt, "\n- {} by {}: {}", commit.short_sha, commit.author_name, commit.subject);
        if let Some(detail) = details.get(&commit.sha) {
            let _ = writeln!(prompt, "  (+{} / -{})", detail.additions, detail.deletions);
            if !detail.diff.is_empty() {
                let _ = writeln!(prompt, "```diff\n{}\n```", detail.diff);
            }
        }
    }

    prompt
}

#[derive(Debug, Clone)]
pub struct ExecutiveSummarizer {
    http: reqwest::Client,
    endpoint: Url,
    model: String,
    max_tokens: u32,
    api_key: String,
}

impl ExecutiveSummarizer {
    pub fn new(config: &LlmConfig, api_key: impl Into<String>) -> anyhow::Result<Self> {
        let endpoint = Url::parse(&config.endpoint).with_context(|| format!("parsing summary endpoint '{}'", config.endpoint))?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("building the summary HTTP client")?;

        Ok(Self {
            http,
            endpoint,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            api_key: api_key.into(),
        })
    }

    /// Creates a summarizer when an endpoint is configured and an API key is present in the environment.
    pub fn from_env(config: &LlmConfig) -> anyhow::Result<Option<Self>> {
        if config.endpoint.is_empty() {
            return Ok(None);
        }

        match std::env::var(LLM_API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Self::new(config, key.trim()).map(Some),
            _ => {
                log::debug!(target: LOG_TARGET, "{LLM_API_KEY_ENV} not set, executive summaries disabled");
                Ok(None)
            }
        }
    }

    /// Asks the endpoint to summarize `prompt`, returning `None` on any failure.
    pub async fn summarize(&self, prompt: &str) -> Option<String> {
        let start_time = Instant::now();
        let request = ChatRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let result = self.request(&request).await;
        match result {
            Ok(Some(text)) => {
                log::debug!(target: LOG_TARGET, "Executive summary generated in {:.3}s", start_time.elapsed().as_secs_f64());
                Some(text)
            }
            Ok(None) => {
                log::warn!(target: LOG_TARGET, "Summary endpoint returned no content");
                None
            }
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Could not generate executive summary: {e:#}");
                None
            }
        }
    }

    async fn request(&self, request: &ChatRequest<'_>) -> anyhow::Result<Option<String>> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .context("sending summary request")?
            .error_for_status()
            .context("summary endpoint returned an error status")?;

        let body: ChatResponse = response.json().await.context("decoding summary response")?;
        Ok(body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty()))
    }
}
