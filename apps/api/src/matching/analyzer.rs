//! Generation stage: read the hand-off store and write a cover letter for each top job.

use bytes::Bytes;
use tracing::{error, info, warn};

use crate::llm_client::prompts::build_cover_letter_prompt;
use crate::llm_client::TextGenerator;
use crate::models::job::{JobRecord, MatchResult};
use crate::resume::extract_resume_text;
use crate::search::apply_link::PLACEHOLDER_LINK;
use crate::store::JobStore;

/// Only the first jobs in the store are analyzed; generation calls run one at a time.
pub const MAX_ANALYZED_JOBS: usize = 5;

const GOOGLE_JOBS_LINK_PREFIX: &str =
    "https://www.google.com/search?q=jobs&ibp=htl;jobs#htivrt=jobs&htidocid=";

/// Produces one `MatchResult` per analyzed job.
///
/// Returns an empty list when the generator is not configured, the résumé has no readable
/// text, or the store cannot be read. A failed generation skips that job only.
pub async fn run_analyzer(
    generator: &dyn TextGenerator,
    resume: Bytes,
    store: &JobStore,
) -> Vec<MatchResult> {
    info!("Starting analyzer...");

    if !generator.available() {
        warn!("GEMINI_API_KEY not set");
        return vec![];
    }

    let resume_text = match extract_resume_text(resume).await {
        Ok(text) if !text.is_empty() => text,
        Ok(_) => {
            warn!("Resume contains no extractable text");
            return vec![];
        }
        Err(e) => {
            error!("{e}");
            return vec![];
        }
    };

    let jobs = match store.read().await {
        Ok(jobs) => jobs,
        Err(e) => {
            error!("Analyzer could not read {}: {e}", store.path().display());
            return vec![];
        }
    };

    let total = jobs.len().min(MAX_ANALYZED_JOBS);
    let mut matched_jobs = Vec::with_capacity(total);

    for (idx, job) in jobs.into_iter().take(MAX_ANALYZED_JOBS).enumerate() {
        info!("Analyzing job {}/{}: {}...", idx + 1, total, job.title);

        let prompt =
            build_cover_letter_prompt(&job.title, &job.company, &resume_text, &job.description);

        match generator.generate(&prompt).await {
            Ok(cover_letter) => {
                info!("  -> Cover letter generated for {}.", job.company);
                matched_jobs.push(MatchResult {
                    link: resolve_link(&job),
                    company: job.company,
                    title: job.title,
                    location: job.location,
                    cover_letter,
                });
            }
            Err(e) => {
                warn!("Generation failed for {}: {e}", job.company);
            }
        }
    }

    info!("Analyzer finished. Found {} matches.", matched_jobs.len());
    matched_jobs
}

/// Outbound link for a match: the chosen apply link, else the share link, else a Google Jobs
/// deep link built from the job id, else the placeholder.
pub fn resolve_link(job: &JobRecord) -> String {
    if !job.apply_link.is_empty() && job.apply_link != PLACEHOLDER_LINK {
        return job.apply_link.clone();
    }
    if !job.share_link.is_empty() {
        return job.share_link.clone();
    }
    match job.job_id.as_deref() {
        Some(id) if !id.is_empty() => format!("{GOOGLE_JOBS_LINK_PREFIX}{id}"),
        _ => PLACEHOLDER_LINK.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::llm_client::LlmError;

    /// Echoes a canned letter, failing for one company, and records every prompt.
    struct ScriptedGenerator {
        fail_for: Option<&'static str>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn new(fail_for: Option<&'static str>) -> Self {
            Self {
                fail_for,
                prompts: Mutex::new(vec![]),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        fn available(&self) -> bool {
            true
        }

        async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            if let Some(company) = self.fail_for {
                if prompt.contains(&format!("at \"{company}\"")) {
                    return Err(LlmError::EmptyContent);
                }
            }
            Ok("Dear Hiring Manager, ... Sincerely, Jane Doe".to_string())
        }
    }

    struct Unavailable;

    #[async_trait]
    impl TextGenerator for Unavailable {
        fn available(&self) -> bool {
            false
        }

        async fn generate(&self, _: &str) -> Result<String, LlmError> {
            Err(LlmError::MissingApiKey)
        }
    }

    fn record(company: &str) -> JobRecord {
        JobRecord {
            source: "Google Jobs".to_string(),
            title: "Backend Engineer".to_string(),
            company: company.to_string(),
            job_id: Some(format!("{company}-id")),
            location: "Austin, TX".to_string(),
            description: format!("Work on {company} services"),
            share_link: String::new(),
            apply_link: format!("https://{company}.example/apply"),
        }
    }

    async fn store_with(records: &[JobRecord]) -> (tempfile::TempDir, JobStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = JobStore::create_in(dir.path()).await.unwrap();
        store.write(records).await.unwrap();
        (dir, store)
    }

    fn resume() -> Bytes {
        Bytes::from_static(b"Jane Doe\nRust engineer, 3 years of axum")
    }

    #[tokio::test]
    async fn test_only_first_five_jobs_analyzed() {
        let records: Vec<_> = (0..7).map(|i| record(&format!("co{i}"))).collect();
        let (_dir, store) = store_with(&records).await;
        let generator = ScriptedGenerator::new(None);

        let matches = run_analyzer(&generator, resume(), &store).await;
        assert_eq!(matches.len(), MAX_ANALYZED_JOBS);
        assert_eq!(generator.prompts.lock().unwrap().len(), MAX_ANALYZED_JOBS);
        assert_eq!(matches[0].company, "co0");
        assert_eq!(matches[4].company, "co4");
    }

    #[tokio::test]
    async fn test_failed_generation_skips_job() {
        let (_dir, store) =
            store_with(&[record("acme"), record("initech"), record("globex")]).await;
        let generator = ScriptedGenerator::new(Some("initech"));

        let matches = run_analyzer(&generator, resume(), &store).await;
        let companies: Vec<_> = matches.iter().map(|m| m.company.as_str()).collect();
        assert_eq!(companies, vec!["acme", "globex"]);
    }

    #[tokio::test]
    async fn test_prompt_carries_resume_and_description() {
        let (_dir, store) = store_with(&[record("acme")]).await;
        let generator = ScriptedGenerator::new(None);

        run_analyzer(&generator, resume(), &store).await;
        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].contains("Jane Doe\nRust engineer"));
        assert!(prompts[0].contains("Work on acme services"));
    }

    #[tokio::test]
    async fn test_unavailable_generator_returns_empty() {
        let (_dir, store) = store_with(&[record("acme")]).await;
        assert!(run_analyzer(&Unavailable, resume(), &store).await.is_empty());
    }

    #[tokio::test]
    async fn test_blank_resume_returns_empty() {
        let (_dir, store) = store_with(&[record("acme")]).await;
        let generator = ScriptedGenerator::new(None);
        let matches = run_analyzer(&generator, Bytes::from_static(b"  \n "), &store).await;
        assert!(matches.is_empty());
        assert!(generator.prompts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_resolve_link_prefers_apply_link() {
        assert_eq!(resolve_link(&record("acme")), "https://acme.example/apply");
    }

    #[test]
    fn test_resolve_link_placeholder_falls_back_to_share_link() {
        let job = JobRecord {
            apply_link: "#".to_string(),
            share_link: "https://share.example/1".to_string(),
            ..record("acme")
        };
        assert_eq!(resolve_link(&job), "https://share.example/1");
    }

    #[test]
    fn test_resolve_link_builds_google_jobs_link_from_id() {
        let job = JobRecord {
            apply_link: String::new(),
            ..record("acme")
        };
        assert_eq!(
            resolve_link(&job),
            "https://www.google.com/search?q=jobs&ibp=htl;jobs#htivrt=jobs&htidocid=acme-id"
        );
    }

    #[test]
    fn test_resolve_link_placeholder_when_nothing_known() {
        let job = JobRecord {
            apply_link: "#".to_string(),
            job_id: None,
            ..record("acme")
        };
        assert_eq!(resolve_link(&job), "#");
    }
}
