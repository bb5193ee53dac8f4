pub mod client;
pub mod controller;
pub mod driver;
pub mod reducer;
pub mod source;
pub mod suggestions;
pub mod types;

pub use client::HttpListingClient;
pub use controller::{FetchOutcome, SearchController, ViewSnapshot};
pub use driver::{FetchState, ListStatus, PaginationDriver, Progress};
pub use reducer::FilterReducer;
pub use source::ListingSource;
pub use suggestions::{BarangaySuggestions, Suggestion};
pub use types::{FilterCriteria, FormValues, PriceRange, QuickFilter, TypeChoice};
