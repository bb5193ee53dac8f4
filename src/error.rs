//! Error taxonomy for the search view.
//!
//! Validation failures are reported per field and never touch the current
//! criteria. Fetch failures are retriable: loaded pages and the cursor stay
//! as they were. An empty result set and a superseded response are not
//! errors at all, see [`crate::search::ListStatus`] and
//! [`crate::search::FetchOutcome`].

use std::fmt;
use thiserror::Error;

/// Search form field a validation message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Address,
    Location,
    Barangay,
    Landlord,
    Type,
    PriceMin,
    PriceMax,
    PageSize,
    QuickFilter,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Name => "name",
            Field::Address => "address",
            Field::Location => "location",
            Field::Barangay => "barangay",
            Field::Landlord => "landlord",
            Field::Type => "type",
            Field::PriceMin => "price_min",
            Field::PriceMax => "price_max",
            Field::PageSize => "limit",
            Field::QuickFilter => "quick_filter",
        };
        f.write_str(name)
    }
}

/// One inline message attached to a form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// Every field-level problem found in one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", summarize(.errors))]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: Field, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: Field, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Messages for a single field, in the order they were found
    pub fn for_field(&self, field: Field) -> impl Iterator<Item = &str> {
        self.errors
            .iter()
            .filter(move |e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// `Ok(())` when nothing was recorded
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Errors surfaced to whoever drives the search view.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The submitted filter form was rejected; criteria unchanged.
    #[error("Invalid search filters: {0}")]
    Validation(#[from] ValidationErrors),

    /// The listing endpoint could not be reached or answered badly.
    ///
    /// Loaded listings and the cursor are preserved, so calling
    /// `load_more` or `refetch` again resumes where this left off.
    #[error("Failed to fetch listings: {message}")]
    Fetch { message: String },
}

impl SearchError {
    pub fn is_retriable(&self) -> bool {
        matches!(self, SearchError::Fetch { .. })
    }
}
