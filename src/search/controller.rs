use crate::error::SearchError;
use crate::export::{derive_export, ExportDocument};
use crate::models::AccumulatedResult;
use crate::search::driver::{Completion, FetchTicket, ListStatus, PaginationDriver, Progress};
use crate::search::reducer::{FilterReducer, Restart};
use crate::search::source::ListingSource;
use crate::search::suggestions::BarangaySuggestions;
use crate::search::types::{FilterCriteria, FormValues, QuickFilter};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// What a fetch-triggering call ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A page was appended to the loaded listings
    Loaded { items: usize, has_more: bool },
    /// Nothing was requested: a request is in flight or nothing is left
    Skipped,
    /// The response arrived after a restart and was dropped
    Stale,
}

/// Point-in-time copy of everything the view renders
#[derive(Debug, Clone)]
pub struct ViewSnapshot {
    pub criteria: FilterCriteria,
    pub accumulated: AccumulatedResult,
    pub status: ListStatus,
    pub progress: Progress,
    pub fetching: bool,
    pub unfetched_changes: bool,
    pub notice: Option<String>,
}

#[derive(Debug, Default)]
struct ViewState {
    filters: FilterReducer,
    driver: PaginationDriver,
    barangays: Option<BarangaySuggestions>,
}

/// Search view state plus the listing source it pulls pages from.
///
/// Cloning yields another handle onto the same view. State is only locked
/// between awaits, so a slow request never blocks the other operations.
#[derive(Clone)]
pub struct SearchController {
    source: Arc<dyn ListingSource>,
    state: Arc<Mutex<ViewState>>,
}

impl SearchController {
    pub fn new(source: Arc<dyn ListingSource>, criteria: FilterCriteria) -> Self {
        Self {
            source,
            state: Arc::new(Mutex::new(ViewState {
                filters: FilterReducer::new(criteria),
                ..ViewState::default()
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Validate and apply the search form, then load its first page.
    /// A rejected form changes nothing and sends no request.
    pub async fn submit(&self, form: FormValues) -> Result<FetchOutcome, SearchError> {
        let Restart = self.lock().filters.apply_form_submit(&form)?;
        self.refetch().await
    }

    /// Apply a sidebar selection without fetching
    pub fn quick_filter(&self, filter: QuickFilter) {
        debug!(?filter, "Quick filter selected");
        self.lock().filters.apply_quick_filter(filter);
    }

    /// Pick a barangay and reload, as clicking a suggestion does
    pub async fn choose_location(&self, barangay: &str) -> Result<FetchOutcome, SearchError> {
        let barangay = barangay.trim();
        self.quick_filter(QuickFilter::Location(
            (!barangay.is_empty()).then(|| barangay.to_string()),
        ));
        self.refetch().await
    }

    /// Throw away loaded pages and fetch the first page for the current criteria
    pub async fn refetch(&self) -> Result<FetchOutcome, SearchError> {
        let (ticket, criteria) = {
            let mut state = self.lock();
            state.filters.mark_fetched();
            let ticket = state.driver.restart();
            let criteria = state.filters.criteria().at_cursor(None);
            (ticket, criteria)
        };
        self.run(ticket, criteria).await
    }

    /// Fetch the next page if there is one and nothing is in flight
    pub async fn load_more(&self) -> Result<FetchOutcome, SearchError> {
        let (ticket, criteria) = {
            let mut state = self.lock();
            let Some(ticket) = state.driver.load_more() else {
                return Ok(FetchOutcome::Skipped);
            };
            let criteria = state
                .filters
                .criteria()
                .at_cursor(ticket.cursor().map(str::to_string));
            (ticket, criteria)
        };
        self.run(ticket, criteria).await
    }

    async fn run(&self, ticket: FetchTicket, criteria: FilterCriteria) -> Result<FetchOutcome, SearchError> {
        debug!(
            source = self.source.source_name(),
            session = ticket.session(),
            cursor = ?ticket.cursor(),
            "Requesting listings"
        );
        let result = self.source.fetch_page(&criteria).await;

        let completion = self.lock().driver.complete(&ticket, result);
        match completion {
            Completion::Applied { items, has_more } => Ok(FetchOutcome::Loaded { items, has_more }),
            Completion::Stale => Ok(FetchOutcome::Stale),
            Completion::Failed { message } => Err(SearchError::Fetch { message }),
        }
    }

    /// Barangay names for the location box, fetched on first use only
    pub async fn barangay_suggestions(&self) -> Result<BarangaySuggestions, SearchError> {
        let cached = self.lock().barangays.clone();
        if let Some(cached) = cached {
            return Ok(cached);
        }

        let entries = self.source.fetch_barangays().await.map_err(|e| {
            let message = format!("{:#}", e);
            warn!(error = %message, "Failed to load barangays");
            SearchError::Fetch { message }
        })?;

        let suggestions = BarangaySuggestions::new(entries);
        let mut state = self.lock();
        Ok(state.barangays.get_or_insert(suggestions).clone())
    }

    /// Export document for the listings loaded right now
    pub fn export(&self) -> ExportDocument {
        let state = self.lock();
        let document = derive_export(state.filters.criteria(), state.driver.accumulated());
        info!(rows = document.rows.len(), "Export derived");
        document
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        let state = self.lock();
        ViewSnapshot {
            criteria: state.filters.criteria().clone(),
            accumulated: state.driver.accumulated().clone(),
            status: state.driver.list_status(),
            progress: state.driver.progress().clone(),
            fetching: state.driver.is_fetching(),
            unfetched_changes: state.filters.has_unfetched_changes(),
            notice: state.driver.last_error().map(str::to_string),
        }
    }
}
