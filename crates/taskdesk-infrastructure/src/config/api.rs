use anyhow::{Context, Result};
use url::Url;

use super::TimeoutConfig;
use crate::http::RetryConfig;

pub const DEFAULT_API_BASE_URL: &str = "https://epilbackend.onrender.com/api";

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "TASKDESK_API_URL";

/// Where and how to reach the portal REST API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    base_url: Url,
    pub timeouts: TimeoutConfig,
    pub retry: RetryConfig,
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut url = Url::parse(base_url.trim())
            .with_context(|| format!("Invalid API base URL: {}", base_url))?;

        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            anyhow::bail!("API base URL must be an http(s) URL: {}", base_url);
        }

        // `Url::join` replaces the last segment unless the path ends in '/'
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(Self {
            base_url: url,
            timeouts: TimeoutConfig::global().clone(),
            retry: RetryConfig::default(),
        })
    }

    /// Resolve the base URL from `TASKDESK_API_URL`, falling back to
    /// `override_url` and then the production default.
    pub fn from_env(override_url: Option<&str>) -> Result<Self> {
        let from_env = std::env::var(API_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty());

        let base_url = from_env
            .as_deref()
            .or(override_url)
            .unwrap_or(DEFAULT_API_BASE_URL);

        Self::new(base_url)
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeouts(mut self, timeouts: TimeoutConfig) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Join a relative API path onto the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .with_context(|| format!("Invalid API path: {}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_keeps_api_prefix() {
        let config = ApiConfig::new("https://example.com/api").unwrap();
        assert_eq!(
            config.endpoint("/checklist/").unwrap().as_str(),
            "https://example.com/api/checklist/"
        );
        assert_eq!(
            config.endpoint("auth/login").unwrap().as_str(),
            "https://example.com/api/auth/login"
        );
    }

    #[test]
    fn test_new_starts_from_global_timeouts() {
        let config = ApiConfig::new("https://example.com/api").unwrap();
        let global = TimeoutConfig::global();
        assert_eq!(config.timeouts.http_request, global.http_request);
        assert_eq!(config.timeouts.connect, global.connect);
        assert_eq!(global.http_request, std::time::Duration::from_secs(30));
    }

    #[test]
    fn test_trailing_slash_is_not_doubled() {
        let config = ApiConfig::new("http://localhost:8080/api/").unwrap();
        assert_eq!(config.base_url().as_str(), "http://localhost:8080/api/");
    }

    #[test]
    fn test_rejects_non_http_urls() {
        assert!(ApiConfig::new("ftp://example.com/api").is_err());
        assert!(ApiConfig::new("mailto:ops@example.com").is_err());
        assert!(ApiConfig::new("not a url").is_err());
    }

    #[test]
    fn test_default_points_at_production() {
        let config = ApiConfig::new(DEFAULT_API_BASE_URL).unwrap();
        assert_eq!(
            config.base_url().as_str(),
            format!("{}/", DEFAULT_API_BASE_URL)
        );
    }
}
