//! Job search providers — the only place postings enter the system.
//!
//! The matcher talks to `Arc<dyn JobSearchProvider>`. `HttpJobSearchProvider`
//! calls a job-board API; `StaticJobSearchProvider` serves an in-memory
//! listing (empty when no provider is configured).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

use crate::jobs::models::JobPosting;
use crate::jobs::params::SearchParameters;

const REQUEST_TIMEOUT_SECS: u64 = 30;
/// Retries after the first attempt, so at most four requests per query.
pub const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum JobSearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Job search API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Job search gave up after {retries} retries: {last_error}")]
    Exhausted { retries: u32, last_error: String },
}

#[async_trait]
pub trait JobSearchProvider: Send + Sync {
    async fn search(
        &self,
        query: &str,
        params: &SearchParameters,
    ) -> Result<Vec<JobPosting>, JobSearchError>;

    /// Label reported in search metadata.
    fn name(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// HttpJobSearchProvider
// ────────────────────────────────────────────────────────────────────────────

/// Calls `GET {base_url}?q=&location=&min_salary=&remote=` and decodes a JSON
/// array of postings. Retries 429, 5xx and transport errors up to
/// `MAX_RETRIES` times with exponential backoff; other 4xx fail at once.
#[derive(Clone)]
pub struct HttpJobSearchProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpJobSearchProvider {
    pub fn new(base_url: String, api_key: Option<String>) -> Result<Self, JobSearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    fn query_pairs(query: &str, params: &SearchParameters) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("q", query.to_string()),
            ("min_salary", format!("{:.0}", params.target_salary_min)),
            ("remote", params.remote_preference.to_string()),
        ];
        if let Some(location) = params.locations.first() {
            pairs.push(("location", location.clone()));
        }
        pairs
    }
}

#[async_trait]
impl JobSearchProvider for HttpJobSearchProvider {
    async fn search(
        &self,
        query: &str,
        params: &SearchParameters,
    ) -> Result<Vec<JobPosting>, JobSearchError> {
        let pairs = Self::query_pairs(query, params);
        let mut last_error: Option<JobSearchError> = None;

        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 500ms, 1s, 2s
                let delay = Duration::from_millis(500 * (1 << (attempt - 1)));
                warn!(
                    "Job search attempt {} for '{}' failed, retrying after {}ms...",
                    attempt,
                    query,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let mut request = self.client.get(&self.base_url).query(&pairs);
            if let Some(key) = &self.api_key {
                request = request.bearer_auth(key);
            }

            let response = match request.send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(JobSearchError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                last_error = Some(JobSearchError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(JobSearchError::Api {
                    status: status.as_u16(),
                    message: body,
                });
            }

            let postings: Vec<JobPosting> = response.json().await?;
            debug!("Job search '{}' returned {} postings", query, postings.len());
            return Ok(postings);
        }

        Err(JobSearchError::Exhausted {
            retries: MAX_RETRIES,
            last_error: last_error.map(|e| e.to_string()).unwrap_or_default(),
        })
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// StaticJobSearchProvider
// ────────────────────────────────────────────────────────────────────────────

/// Words in a query that say nothing about the role itself.
const QUALIFIER_WORDS: &[&str] = &[
    "junior", "entry", "level", "senior", "lead", "director", "head", "of", "ii",
];

/// Serves postings whose title shares a role word with the query.
#[derive(Debug, Clone, Default)]
pub struct StaticJobSearchProvider {
    postings: Vec<JobPosting>,
}

impl StaticJobSearchProvider {
    pub fn new(postings: Vec<JobPosting>) -> Self {
        Self { postings }
    }
}

#[async_trait]
impl JobSearchProvider for StaticJobSearchProvider {
    async fn search(
        &self,
        query: &str,
        _params: &SearchParameters,
    ) -> Result<Vec<JobPosting>, JobSearchError> {
        let query_lower = query.to_lowercase();
        let role_words: Vec<&str> = query_lower
            .split_whitespace()
            .filter(|w| !QUALIFIER_WORDS.contains(w))
            .collect();

        Ok(self
            .postings
            .iter()
            .filter(|job| {
                let title = job.title.to_lowercase();
                role_words
                    .iter()
                    .any(|w| title.split_whitespace().any(|t| t == *w))
            })
            .cloned()
            .collect())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
