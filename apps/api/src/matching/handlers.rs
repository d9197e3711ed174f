//! Axum route handlers for the match pipeline.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::analyzer::run_analyzer;
use crate::matching::scraper::run_scraper;
use crate::models::job::MatchResponse;
use crate::state::AppState;
use crate::store::JobStore;

const NO_RESUME_MESSAGE: &str = "No resume file selected.";
const MISSING_FIELDS_MESSAGE: &str = "Please upload a resume and enter both domain and location.";
const NO_JOBS_MESSAGE: &str =
    "Could not find any jobs for the specified domain/location. Please try another one.";

struct ResumeUpload {
    file_name: String,
    data: Bytes,
}

#[derive(Default)]
struct MatchForm {
    resume: Option<ResumeUpload>,
    domain: String,
    location: String,
}

/// Collects the `resume` file and the `domain`/`location` text fields. Unknown fields are
/// drained and ignored.
async fn read_match_form(mut multipart: Multipart) -> Result<MatchForm, AppError> {
    let mut form = MatchForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await?;
                form.resume = Some(ResumeUpload { file_name, data });
            }
            "domain" => form.domain = field.text().await?.trim().to_string(),
            "location" => form.location = field.text().await?.trim().to_string(),
            _ => {
                field.bytes().await?;
            }
        }
    }

    Ok(form)
}

/// POST /process, POST /api/v1/match
///
/// Multipart: `resume` (PDF or text file), `domain`, `location`.
/// Searches jobs, then writes a cover letter for each of the top results.
#[tracing::instrument(skip_all, fields(run_id = %Uuid::new_v4()))]
pub async fn handle_match(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<MatchResponse>, AppError> {
    let form = read_match_form(multipart).await?;

    let resume = form
        .resume
        .ok_or_else(|| AppError::Validation(NO_RESUME_MESSAGE.to_string()))?;
    if resume.file_name.is_empty() || form.domain.is_empty() || form.location.is_empty() {
        return Err(AppError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
    }

    info!(
        "Match request: domain='{}' location='{}' resume='{}' ({} bytes)",
        form.domain,
        form.location,
        resume.file_name,
        resume.data.len()
    );

    let store = JobStore::create_in(&state.config.work_dir)
        .await
        .map_err(|e| AppError::Internal(anyhow::Error::new(e).context("creating job store")))?;

    if !run_scraper(state.search.as_ref(), &store, &form.domain, &form.location).await {
        return Err(AppError::Validation(NO_JOBS_MESSAGE.to_string()));
    }

    let matched_jobs = run_analyzer(state.generator.as_ref(), resume.data, &store).await;

    Ok(Json(MatchResponse {
        domain: form.domain,
        location: form.location,
        matched_jobs,
    }))
}
