use anyhow::{ensure, Context, Result};
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_PAGE_SIZE: u8 = 10;
pub const MAX_PAGE_SIZE: u8 = 100;

/// Settings for talking to the listing service
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Base URL the listing and barangay endpoints hang off
    pub api_url: Url,
    /// Listings requested per page
    pub page_size: u8,
    /// Per-request timeout; `None` keeps the transport default
    pub request_timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout: None,
            user_agent: format!("housing-search/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl SearchConfig {
    /// Build a config from raw values, checking each one
    pub fn new(api_url: &str, page_size: u8, timeout_secs: Option<u64>) -> Result<Self> {
        let api_url = Url::parse(api_url)
            .with_context(|| format!("Invalid listing API URL: {}", api_url))?;
        ensure!(
            matches!(api_url.scheme(), "http" | "https"),
            "Listing API URL must be http or https, got {}",
            api_url.scheme()
        );
        ensure!(
            (1..=MAX_PAGE_SIZE).contains(&page_size),
            "Page size must be between 1 and {}, got {}",
            MAX_PAGE_SIZE,
            page_size
        );

        Ok(Self {
            api_url,
            page_size,
            request_timeout: timeout_secs.map(Duration::from_secs),
            ..Self::default()
        })
    }

    /// Absolute URL for an endpoint below the API base
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let mut base = self.api_url.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        base.join(path.trim_start_matches('/'))
            .with_context(|| format!("Failed to build endpoint URL for {}", path))
    }
}
