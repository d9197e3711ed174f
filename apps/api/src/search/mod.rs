//! Job search client, the only module that talks to the job-search provider (SerpApi Google Jobs).
//!
//! Results come back as loosely-typed `RawJob`s; `normalize` turns them into `JobRecord`s.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod apply_link;
pub mod normalize;

const SEARCH_ENGINE: &str = "google_jobs";
const SEARCH_LANGUAGE: &str = "en";

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("SERPAPI_KEY not set")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Search API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// A single apply option attached to a search result.
#[derive(Debug, Clone, Default)]
pub struct ApplyOption {
    pub link: Option<String>,
}

/// A job result as the provider returns it. Every field may be missing.
#[derive(Debug, Clone, Default)]
pub struct RawJob {
    pub title: Option<String>,
    pub company_name: Option<String>,
    pub location: Option<String>,
    pub via: Option<String>,
    pub description: Option<String>,
    pub job_id: Option<String>,
    pub share_link: Option<String>,
    pub apply_options: Option<Vec<ApplyOption>>,
}

impl RawJob {
    /// Reads a result object field by field. Numbers are accepted where strings are expected;
    /// any other wrong-typed field is treated as missing. `None` if `value` is not an object.
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_object()?;

        let apply_options = value
            .get("apply_options")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .map(|opt| ApplyOption {
                        link: string_field(opt, "link"),
                    })
                    .collect()
            });

        Some(RawJob {
            title: string_field(value, "title"),
            company_name: string_field(value, "company_name"),
            location: string_field(value, "location"),
            via: string_field(value, "via"),
            description: string_field(value, "description"),
            job_id: string_field(value, "job_id"),
            share_link: string_field(value, "share_link"),
            apply_options,
        })
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    jobs_results: Value,
    /// SerpApi reports "no results" as a 200 with an `error` string.
    #[serde(default)]
    error: Value,
}

impl SearchResponse {
    fn into_jobs(self) -> Vec<RawJob> {
        let Value::Array(results) = self.jobs_results else {
            return vec![];
        };
        let received = results.len();
        let jobs: Vec<RawJob> = results.iter().filter_map(RawJob::from_value).collect();
        if jobs.len() < received {
            warn!("Skipped {} non-object search results", received - jobs.len());
        }
        jobs
    }
}

/// Pluggable job search backend. Carried in `AppState` as `Arc<dyn JobSearch>`.
#[async_trait]
pub trait JobSearch: Send + Sync {
    /// Returns the provider's results for a domain/location query, in received order.
    async fn search(&self, domain: &str, location: &str) -> Result<Vec<RawJob>, SearchError>;
}

/// Free-text query sent to the provider. Biased toward entry-level postings.
pub fn build_query(domain: &str, location: &str) -> String {
    format!("fresher {domain} in {location}")
}

#[derive(Clone)]
pub struct SerpApiClient {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
}

impl SerpApiClient {
    pub fn new(
        api_key: Option<String>,
        endpoint: String,
        timeout: Duration,
    ) -> Result<Self, SearchError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            endpoint,
        })
    }
}

#[async_trait]
impl JobSearch for SerpApiClient {
    async fn search(&self, domain: &str, location: &str) -> Result<Vec<RawJob>, SearchError> {
        let api_key = self.api_key.as_deref().ok_or(SearchError::MissingApiKey)?;
        let query = build_query(domain, location);
        info!("Searching jobs: q='{query}' location='{location}'");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("engine", SEARCH_ENGINE),
                ("q", query.as_str()),
                ("location", location),
                ("api_key", api_key),
                ("hl", SEARCH_LANGUAGE),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: SearchResponse = response.json().await?;
        if let Some(message) = body.error.as_str() {
            debug!("Search API reported: {message}");
        }
        Ok(body.into_jobs())
    }
}
