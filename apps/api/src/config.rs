use std::path::PathBuf;

use anyhow::{Context, Result};

pub const DEFAULT_SERPAPI_ENDPOINT: &str = "https://serpapi.com/search.json";
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// The hosted frontend plus the origins it is served from during local development.
const DEFAULT_CORS_ORIGINS: &str = "https://bhanu-konka.github.io,\
    http://localhost:5500,http://127.0.0.1:5500,http://localhost:3000";

/// Application configuration loaded from environment variables.
///
/// API keys are optional: a missing key does not stop the server, it makes the
/// corresponding pipeline stage report no results.
#[derive(Debug, Clone)]
pub struct Config {
    pub serpapi_key: Option<String>,
    pub serpapi_endpoint: String,
    pub search_timeout_secs: u64,
    pub gemini_api_key: Option<String>,
    pub gemini_endpoint: String,
    pub cors_allowed_origins: Vec<String>,
    pub max_upload_bytes: usize,
    /// Directory for per-request job hand-off files.
    pub work_dir: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            serpapi_key: optional_env("SERPAPI_KEY"),
            serpapi_endpoint: std::env::var("SERPAPI_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_SERPAPI_ENDPOINT.to_string()),
            search_timeout_secs: parse_env("SEARCH_TIMEOUT_SECS", 30)?,
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            gemini_endpoint: std::env::var("GEMINI_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_GEMINI_ENDPOINT.to_string()),
            cors_allowed_origins: split_origins(
                &std::env::var("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string()),
            ),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            work_dir: std::env::var("WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| std::env::temp_dir()),
            port: parse_env("PORT", 5000)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Treats unset and blank variables the same way.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: '{raw}'")),
        Err(_) => Ok(default),
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_origins_trims_and_skips_blanks() {
        let origins = split_origins(" https://a.example , ,http://localhost:3000,");
        assert_eq!(origins, vec!["https://a.example", "http://localhost:3000"]);
    }

    #[test]
    fn test_default_origins_include_hosted_frontend() {
        let origins = split_origins(DEFAULT_CORS_ORIGINS);
        assert_eq!(origins.len(), 4);
        assert_eq!(origins[0], "https://bhanu-konka.github.io");
        assert!(origins.contains(&"http://localhost:3000".to_string()));
    }

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        let port: u16 = parse_env("JOBMATCH_TEST_UNSET_PORT", 5000).unwrap();
        assert_eq!(port, 5000);
    }
}
