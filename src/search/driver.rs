//! Fetch/accumulate cycle for the cursor-paginated listing endpoint.
//!
//! The driver never performs I/O. It hands out a [`FetchTicket`] whenever a
//! request should go out and is told about the result through
//! [`PaginationDriver::complete`]. Only the ticket occupying the single
//! in-flight slot may change the accumulation; anything else belongs to a
//! superseded session or a coalesced duplicate and is dropped.

use crate::models::{AccumulatedResult, Page};
use std::fmt::Display;
use tracing::{debug, info, warn};

/// Whether a request is outstanding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    Idle,
    Fetching,
}

/// How far through the result set the current session has got
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// No page has arrived for this session yet
    NotStarted,
    /// The last page carried this cursor
    HasMore(String),
    /// The last page had no cursor
    Exhausted,
}

/// What the list surface should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStatus {
    /// Nothing requested yet, or the first request failed
    NotLoaded,
    /// Waiting for the first page of a session
    Loading,
    /// Listings to show, possibly with more to load
    Results,
    /// The endpoint has nothing matching the criteria
    NoResults,
    /// The pages loaded so far were empty but the endpoint has more
    EmptySoFar,
}

/// Identity of one issued request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    session: u64,
    request: u64,
    cursor: Option<String>,
}

impl FetchTicket {
    pub fn session(&self) -> u64 {
        self.session
    }

    /// Cursor the request should be sent with
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }
}

/// Result of feeding a response back into the driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The page was appended
    Applied { items: usize, has_more: bool },
    /// The request failed; accumulation and progress untouched
    Failed { message: String },
    /// The ticket is no longer the in-flight request
    Stale,
}

#[derive(Debug, Clone)]
pub struct PaginationDriver {
    accumulated: AccumulatedResult,
    progress: Progress,
    in_flight: Option<FetchTicket>,
    session: u64,
    next_request: u64,
    last_error: Option<String>,
}

impl Default for PaginationDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl PaginationDriver {
    pub fn new() -> Self {
        Self {
            accumulated: AccumulatedResult::new(),
            progress: Progress::NotStarted,
            in_flight: None,
            session: 0,
            next_request: 0,
            last_error: None,
        }
    }

    pub fn state(&self) -> FetchState {
        if self.in_flight.is_some() {
            FetchState::Fetching
        } else {
            FetchState::Idle
        }
    }

    pub fn is_fetching(&self) -> bool {
        self.state() == FetchState::Fetching
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn has_more(&self) -> bool {
        matches!(self.progress, Progress::HasMore(_))
    }

    pub fn accumulated(&self) -> &AccumulatedResult {
        &self.accumulated
    }

    /// Retriable notice left by the last failed request of this session
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn list_status(&self) -> ListStatus {
        if !self.accumulated.is_empty() {
            return ListStatus::Results;
        }
        match (&self.progress, self.state()) {
            (Progress::Exhausted, _) => ListStatus::NoResults,
            (_, FetchState::Fetching) => ListStatus::Loading,
            (Progress::HasMore(_), FetchState::Idle) => ListStatus::EmptySoFar,
            (Progress::NotStarted, FetchState::Idle) => ListStatus::NotLoaded,
        }
    }

    /// Drop everything loaded so far and ask for the first page again.
    ///
    /// Valid from any state. A request still in flight from the previous
    /// session is not aborted, its response will just be ignored.
    pub fn restart(&mut self) -> FetchTicket {
        if let Some(previous) = &self.in_flight {
            debug!(session = previous.session, "Superseding in-flight request");
        }
        self.session += 1;
        self.accumulated.clear();
        self.progress = Progress::NotStarted;
        self.last_error = None;
        info!(session = self.session, "Restarting pagination");
        self.issue(None)
    }

    /// Ask for the page after the last one loaded.
    ///
    /// Returns `None` while a request is in flight or when there is nothing
    /// more to load, so spurious calls are harmless.
    pub fn load_more(&mut self) -> Option<FetchTicket> {
        if self.is_fetching() {
            debug!("Load more ignored, request already in flight");
            return None;
        }
        match &self.progress {
            Progress::HasMore(cursor) => {
                let cursor = cursor.clone();
                Some(self.issue(Some(cursor)))
            }
            Progress::NotStarted | Progress::Exhausted => {
                debug!(progress = ?self.progress, "Load more ignored, nothing to load");
                None
            }
        }
    }

    /// Feed the outcome of a ticket's request back in
    pub fn complete<E: Display>(&mut self, ticket: &FetchTicket, result: Result<Page, E>) -> Completion {
        if self.in_flight.as_ref() != Some(ticket) {
            debug!(
                session = ticket.session,
                current = self.session,
                "Discarding stale response"
            );
            return Completion::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(page) => {
                let items = page.items.len();
                self.progress = match &page.next_cursor {
                    Some(cursor) => Progress::HasMore(cursor.clone()),
                    None => Progress::Exhausted,
                };
                self.last_error = None;
                self.accumulated.push(page);
                let has_more = self.has_more();
                debug!(
                    session = self.session,
                    items,
                    total = self.accumulated.item_count(),
                    has_more,
                    "Page appended"
                );
                Completion::Applied { items, has_more }
            }
            Err(e) => {
                let message = format!("{:#}", e);
                warn!(session = self.session, error = %message, "Listing request failed");
                self.last_error = Some(message.clone());
                Completion::Failed { message }
            }
        }
    }

    fn issue(&mut self, cursor: Option<String>) -> FetchTicket {
        self.next_request += 1;
        let ticket = FetchTicket {
            session: self.session,
            request: self.next_request,
            cursor,
        };
        self.in_flight = Some(ticket.clone());
        ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Listing;
    use proptest::prelude::*;

    fn listing(id: &str) -> Listing {
        Listing {
            id: id.to_string(),
            name: format!("Listing {}", id),
            address: None,
            price: 1500.0,
            location: "Los Banos".into(),
            barangay: None,
            landlord: "usr_1".into(),
            contact_number: "09123456789".into(),
            num_of_rooms: 2,
            tags: vec![],
        }
    }

    fn page(ids: &[&str], next: Option<&str>) -> Page {
        Page {
            items: ids.iter().map(|id| listing(id)).collect(),
            next_cursor: next.map(str::to_string),
        }
    }

    fn ok(page: Page) -> Result<Page, String> {
        Ok(page)
    }

    fn ids(driver: &PaginationDriver) -> Vec<String> {
        driver.accumulated().items().map(|l| l.id.clone()).collect()
    }

    #[test]
    fn two_pages_then_exhausted() {
        let mut driver = PaginationDriver::new();

        let first = driver.restart();
        assert_eq!(first.cursor(), None);
        assert_eq!(driver.list_status(), ListStatus::Loading);
        assert_eq!(
            driver.complete(&first, ok(page(&["1", "2"], Some("a")))),
            Completion::Applied { items: 2, has_more: true }
        );

        let second = driver.load_more().expect("more pages available");
        assert_eq!(second.cursor(), Some("a"));
        driver.complete(&second, ok(page(&["3"], None)));

        assert_eq!(ids(&driver), ["1", "2", "3"]);
        assert_eq!(driver.progress(), &Progress::Exhausted);
        assert_eq!(driver.load_more(), None);
        assert_eq!(driver.accumulated().pages().len(), 2);
    }

    #[test]
    fn load_more_coalesces_while_fetching() {
        let mut driver = PaginationDriver::new();
        let first = driver.restart();
        driver.complete(&first, ok(page(&["1"], Some("a"))));

        let next = driver.load_more().unwrap();
        assert_eq!(driver.load_more(), None);
        assert_eq!(driver.state(), FetchState::Fetching);

        driver.complete(&next, ok(page(&["2"], Some("b"))));
        assert_eq!(ids(&driver), ["1", "2"]);
    }

    #[test]
    fn load_more_before_first_page_is_ignored() {
        let mut driver = PaginationDriver::new();
        assert_eq!(driver.load_more(), None);
        assert_eq!(driver.list_status(), ListStatus::NotLoaded);
    }

    #[test]
    fn restart_discards_superseded_response() {
        let mut driver = PaginationDriver::new();
        let old = driver.restart();
        let new = driver.restart();
        assert_ne!(old.session(), new.session());

        assert_eq!(driver.complete(&old, ok(page(&["old"], Some("x")))), Completion::Stale);
        assert!(driver.accumulated().is_empty());
        assert!(driver.is_fetching());

        driver.complete(&new, ok(page(&["new"], None)));
        assert_eq!(ids(&driver), ["new"]);
    }

    #[test]
    fn superseded_failure_is_not_surfaced() {
        let mut driver = PaginationDriver::new();
        let old = driver.restart();
        let new = driver.restart();

        assert_eq!(driver.complete(&old, Err::<Page, _>("timed out")), Completion::Stale);
        assert_eq!(driver.last_error(), None);
        assert!(driver.is_fetching());
        assert_eq!(driver.list_status(), ListStatus::Loading);

        driver.complete(&new, ok(page(&["new"], None)));
        assert_eq!(ids(&driver), ["new"]);
        assert_eq!(driver.last_error(), None);
    }

    #[test]
    fn restart_mid_load_more_drops_late_page() {
        let mut driver = PaginationDriver::new();
        let first = driver.restart();
        driver.complete(&first, ok(page(&["1"], Some("a"))));
        let more = driver.load_more().unwrap();

        let fresh = driver.restart();
        driver.complete(&fresh, ok(page(&["fresh"], None)));
        assert_eq!(driver.complete(&more, ok(page(&["late"], None))), Completion::Stale);

        assert_eq!(ids(&driver), ["fresh"]);
    }

    #[test]
    fn failure_keeps_accumulation_and_cursor() {
        let mut driver = PaginationDriver::new();
        let first = driver.restart();
        driver.complete(&first, ok(page(&["1"], Some("a"))));

        let more = driver.load_more().unwrap();
        let completion = driver.complete(&more, Err::<Page, _>("connection reset"));

        assert_eq!(
            completion,
            Completion::Failed { message: "connection reset".into() }
        );
        assert_eq!(driver.state(), FetchState::Idle);
        assert_eq!(driver.progress(), &Progress::HasMore("a".into()));
        assert_eq!(driver.last_error(), Some("connection reset"));
        assert_eq!(ids(&driver), ["1"]);

        let retry = driver.load_more().unwrap();
        assert_eq!(retry.cursor(), Some("a"));
        driver.complete(&retry, ok(page(&["2"], None)));
        assert_eq!(driver.last_error(), None);
        assert_eq!(ids(&driver), ["1", "2"]);
    }

    #[test]
    fn empty_exhausted_result_is_no_results() {
        let mut driver = PaginationDriver::new();
        let first = driver.restart();
        driver.complete(&first, ok(page(&[], None)));
        assert_eq!(driver.list_status(), ListStatus::NoResults);
    }

    #[test]
    fn empty_page_with_cursor_is_not_results() {
        let mut driver = PaginationDriver::new();
        let first = driver.restart();
        driver.complete(&first, ok(page(&[], Some("x"))));
        assert_eq!(driver.list_status(), ListStatus::EmptySoFar);

        let more = driver.load_more().unwrap();
        assert_eq!(driver.list_status(), ListStatus::Loading);
        driver.complete(&more, ok(page(&["1"], None)));
        assert_eq!(driver.list_status(), ListStatus::Results);
    }

    #[test]
    fn completing_twice_is_stale() {
        let mut driver = PaginationDriver::new();
        let first = driver.restart();
        driver.complete(&first, ok(page(&["1"], Some("a"))));
        assert_eq!(driver.complete(&first, ok(page(&["dup"], None))), Completion::Stale);
        assert_eq!(ids(&driver), ["1"]);
    }

    proptest! {
        #[test]
        fn load_more_without_more_is_a_no_op(
            sizes in proptest::collection::vec(0usize..5, 1..6),
            calls in 1usize..20,
        ) {
            let mut driver = PaginationDriver::new();
            let mut ticket = driver.restart();
            for (i, size) in sizes.iter().enumerate() {
                let last = i + 1 == sizes.len();
                let ids: Vec<String> = (0..*size).map(|n| format!("{}-{}", i, n)).collect();
                let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
                let cursor = format!("c{}", i);
                driver.complete(&ticket, ok(page(&refs, (!last).then_some(cursor.as_str()))));
                if !last {
                    ticket = driver.load_more().unwrap();
                }
            }

            let before = driver.accumulated().clone();
            for _ in 0..calls {
                prop_assert!(driver.load_more().is_none());
            }
            prop_assert_eq!(driver.accumulated(), &before);
            prop_assert_eq!(driver.state(), FetchState::Idle);
        }
    }
}
