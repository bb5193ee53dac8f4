use crate::models::Page;
use crate::search::types::FilterCriteria;
use anyhow::Result;
use async_trait::async_trait;

/// Remote side of the search view.
/// Implemented over HTTP in production and by in-memory fakes in tests.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch the page of listings `criteria.cursor` points at
    async fn fetch_page(&self, criteria: &FilterCriteria) -> Result<Page>;

    /// Barangay names known to the listing service, in service order
    async fn fetch_barangays(&self) -> Result<Vec<String>>;

    /// Get the name of the listing source
    fn source_name(&self) -> &'static str;
}
