//! Tabular export of the listings currently loaded in the search view.
//!
//! [`derive_export`] only structures the document: a title, a summary of
//! the active filters, one row per loaded listing and footer metadata for
//! page numbering. Turning it into a PDF is the renderer's job.

use crate::models::{AccumulatedResult, Listing};
use crate::search::FilterCriteria;
use serde::Serialize;

pub const EXPORT_TITLE: &str = "STALS";
pub const ALL_LOCATIONS: &str = "All Locations";
pub const ALL_TYPES: &str = "All Types";
/// Data rows that fit on one printed page
pub const ROWS_PER_PAGE: usize = 25;

pub const FILTER_COLUMNS: [&str; 2] = ["Filter", "Value"];
pub const LISTING_COLUMNS: [&str; 5] = ["Name", "Address", "Landlord", "Contact", "Rooms"];

/// One `Filter | Value` line of the summary table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub label: &'static str,
    pub value: String,
}

/// One listing in the data table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub name: String,
    pub address: String,
    pub landlord: String,
    pub contact: String,
    pub rooms: u32,
}

impl ExportRow {
    fn from_listing(listing: &Listing) -> Self {
        Self {
            name: listing.name.clone(),
            address: listing.address.clone().unwrap_or_default(),
            landlord: listing.landlord.clone(),
            contact: listing.contact_number.clone(),
            rooms: listing.num_of_rooms,
        }
    }

    /// Cell values in [`LISTING_COLUMNS`] order
    pub fn cells(&self) -> [String; 5] {
        [
            self.name.clone(),
            self.address.clone(),
            self.landlord.clone(),
            self.contact.clone(),
            self.rooms.to_string(),
        ]
    }
}

/// Page numbering derived from the row count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Footer {
    pub total_rows: usize,
    pub rows_per_page: usize,
    pub page_count: usize,
}

impl Footer {
    fn for_rows(total_rows: usize) -> Self {
        Self {
            total_rows,
            rows_per_page: ROWS_PER_PAGE,
            page_count: total_rows.div_ceil(ROWS_PER_PAGE).max(1),
        }
    }

    /// "Page N of M" for a 1-based page number
    pub fn label(&self, page: usize) -> String {
        format!("Page {} of {}", page, self.page_count)
    }

    pub fn labels(&self) -> Vec<String> {
        (1..=self.page_count).map(|page| self.label(page)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportDocument {
    pub title: &'static str,
    pub filter_columns: [&'static str; 2],
    pub filters: Vec<SummaryRow>,
    pub columns: [&'static str; 5],
    pub rows: Vec<ExportRow>,
    pub footer: Footer,
}

/// Build the export for whatever is loaded right now.
///
/// Only accumulated listings are included, not the full remote result set.
pub fn derive_export(criteria: &FilterCriteria, accumulated: &AccumulatedResult) -> ExportDocument {
    let rows: Vec<ExportRow> = accumulated.items().map(ExportRow::from_listing).collect();

    ExportDocument {
        title: EXPORT_TITLE,
        filter_columns: FILTER_COLUMNS,
        filters: filter_summary(criteria),
        columns: LISTING_COLUMNS,
        footer: Footer::for_rows(rows.len()),
        rows,
    }
}

fn filter_summary(criteria: &FilterCriteria) -> Vec<SummaryRow> {
    let location = criteria
        .barangay
        .clone()
        .unwrap_or_else(|| ALL_LOCATIONS.to_string());

    let types = if criteria.types.is_empty() {
        ALL_TYPES.to_string()
    } else {
        criteria
            .types
            .iter()
            .map(|kind| kind.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    vec![
        SummaryRow { label: "Location", value: location },
        SummaryRow { label: "Type", value: types },
        SummaryRow {
            label: "Price Range",
            value: price_range_label(criteria.price_min, criteria.price_max),
        },
    ]
}

/// Peso range text; empty when neither bound is set
pub fn price_range_label(min: Option<u32>, max: Option<u32>) -> String {
    match (min, max) {
        (None, None) => String::new(),
        (None, Some(max)) => format!("Up to P{}", max),
        (Some(min), None) => format!("P{} and above", min),
        (Some(min), Some(max)) => format!("P{} - P{}", min, max),
    }
}
