use serde::{Deserialize, Serialize};

/// A normalized job posting, as written to and read back from the hand-off store.
///
/// Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub source: String,
    pub title: String,
    pub company: String,
    pub job_id: Option<String>,
    pub location: String,
    pub description: String,
    pub share_link: String,
    pub apply_link: String,
}

/// One analyzed job returned to the caller. Not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub company: String,
    pub title: String,
    pub location: String,
    pub link: String,
    pub cover_letter: String,
}

/// Body of a successful match request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    pub domain: String,
    pub location: String,
    pub matched_jobs: Vec<MatchResult>,
}
