//! Normalization and deduplication of raw search results.

use std::collections::HashSet;

use crate::models::job::JobRecord;
use crate::search::apply_link::pick_apply_link;
use crate::search::RawJob;

const DEFAULT_SOURCE: &str = "Google Jobs";
const MISSING: &str = "N/A";

/// Identity of a posting within one search response.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DedupKey {
    JobId(String),
    Composite {
        title: Option<String>,
        company: Option<String>,
        location: Option<String>,
    },
}

/// `job_id` when present and non-empty, otherwise (title, company, location) as received.
pub fn dedup_key(job: &RawJob) -> DedupKey {
    match job.job_id.as_deref() {
        Some(id) if !id.is_empty() => DedupKey::JobId(id.to_string()),
        _ => DedupKey::Composite {
            title: job.title.clone(),
            company: job.company_name.clone(),
            location: job.location.clone(),
        },
    }
}

/// Keeps the first occurrence of each dedup key, preserving received order.
pub fn dedup_jobs(jobs: Vec<RawJob>) -> Vec<RawJob> {
    let mut seen = HashSet::new();
    jobs.into_iter()
        .filter(|job| seen.insert(dedup_key(job)))
        .collect()
}

/// Maps a raw result onto the flat record shape, filling defaults and choosing the apply link.
pub fn normalize_job(job: &RawJob) -> JobRecord {
    let apply_link = pick_apply_link(
        job.apply_options.as_deref().unwrap_or(&[]),
        job.company_name.as_deref(),
        job.share_link.as_deref(),
    );

    JobRecord {
        source: or_default(&job.via, DEFAULT_SOURCE),
        title: or_default(&job.title, MISSING),
        company: or_default(&job.company_name, MISSING),
        job_id: job.job_id.clone().filter(|id| !id.is_empty()),
        location: or_default(&job.location, MISSING),
        description: or_default(&job.description, MISSING),
        share_link: job.share_link.clone().unwrap_or_default(),
        apply_link,
    }
}

/// Deduplicates then normalizes a full search response.
pub fn normalize_results(jobs: Vec<RawJob>) -> Vec<JobRecord> {
    dedup_jobs(jobs).iter().map(normalize_job).collect()
}

fn or_default(value: &Option<String>, default: &str) -> String {
    value.clone().unwrap_or_else(|| default.to_string())
}
