//! Search stage: query the job-search backend, normalize, and write the hand-off store.

use tracing::{error, info, warn};

use crate::search::normalize::normalize_results;
use crate::search::{JobSearch, SearchError};
use crate::store::JobStore;

/// Runs one search and persists the deduplicated records to `store`.
///
/// Returns `false` when the search backend is not configured, the call fails, no jobs come
/// back, or the store cannot be written.
pub async fn run_scraper(
    search: &dyn JobSearch,
    store: &JobStore,
    domain: &str,
    location: &str,
) -> bool {
    info!("Starting scraper for: '{domain}' in '{location}'");

    let jobs = match search.search(domain, location).await {
        Ok(jobs) => jobs,
        Err(SearchError::MissingApiKey) => {
            warn!("SERPAPI_KEY not set");
            return false;
        }
        Err(e) => {
            error!("Scraper error for location {location}: {e}");
            return false;
        }
    };

    if jobs.is_empty() {
        warn!("Scraper found no jobs in this domain/location.");
        return false;
    }

    let received = jobs.len();
    let records = normalize_results(jobs);

    if let Err(e) = store.write(&records).await {
        error!("Failed to write job store {}: {e}", store.path().display());
        return false;
    }

    info!(
        "Scraper finished. Saved {} jobs ({} received) to {}",
        records.len(),
        received,
        store.path().display()
    );
    true
}
