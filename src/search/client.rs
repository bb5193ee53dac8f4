use crate::config::SearchConfig;
use crate::models::Page;
use crate::search::source::ListingSource;
use crate::search::types::FilterCriteria;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

const SEARCH_PATH: &str = "accommodation/search";
const BARANGAYS_PATH: &str = "accommodation/barangays";

/// Listing source backed by the STALS HTTP API
pub struct HttpListingClient {
    client: Client,
    config: SearchConfig,
}

#[derive(Debug, Deserialize)]
struct BarangayEntry {
    barangay: Option<String>,
}

impl HttpListingClient {
    /// Create a client for the API described by `config`
    pub fn new(config: SearchConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}

#[async_trait]
impl ListingSource for HttpListingClient {
    async fn fetch_page(&self, criteria: &FilterCriteria) -> Result<Page> {
        let url = self.config.endpoint(SEARCH_PATH)?;
        debug!(url = %url.as_str(), cursor = ?criteria.cursor, "Fetching listing page");

        let response = self
            .client
            .post(url)
            .json(criteria)
            .send()
            .await
            .context("Failed to reach listing endpoint")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "Listing endpoint returned an error");
            anyhow::bail!("Listing endpoint error ({}): {}", status, body);
        }

        let page: Page = response
            .json()
            .await
            .context("Failed to parse listing page")?;

        debug!(
            items = page.items.len(),
            has_more = page.has_more(),
            "Received listing page"
        );
        Ok(page)
    }

    async fn fetch_barangays(&self) -> Result<Vec<String>> {
        let url = self.config.endpoint(BARANGAYS_PATH)?;
        debug!(url = %url.as_str(), "Fetching barangays");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to reach barangay endpoint")?;

        if !response.status().is_success() {
            warn!("Barangay endpoint returned status: {}", response.status());
            anyhow::bail!("Failed to fetch barangays: {}", response.status());
        }

        let entries: Vec<BarangayEntry> = response
            .json()
            .await
            .context("Failed to parse barangay list")?;

        let barangays: Vec<String> = entries
            .into_iter()
            .filter_map(|entry| entry.barangay)
            .filter(|name| !name.trim().is_empty())
            .collect();

        info!("Loaded {} barangays", barangays.len());
        Ok(barangays)
    }

    fn source_name(&self) -> &'static str {
        "STALS API"
    }
}
