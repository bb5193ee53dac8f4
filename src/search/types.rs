use crate::config::DEFAULT_PAGE_SIZE;
use crate::error::{Field, ValidationErrors};
use crate::models::AccommodationType;
use serde::{Deserialize, Serialize};

/// Current search intent, sent as-is to the listing endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barangay: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landlord: Option<String>,
    /// Empty means every type
    #[serde(rename = "typeArray", default)]
    pub types: Vec<AccommodationType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_min: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_max: Option<u32>,
    #[serde(rename = "limit")]
    pub page_size: u8,
    /// Absent means the first page
    pub cursor: Option<String>,
    #[serde(default)]
    pub is_archived: bool,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            name: None,
            address: None,
            location: None,
            barangay: None,
            landlord: None,
            types: Vec::new(),
            price_min: None,
            price_max: None,
            page_size: DEFAULT_PAGE_SIZE,
            cursor: None,
            is_archived: false,
        }
    }
}

impl FilterCriteria {
    pub fn with_page_size(page_size: u8) -> Self {
        Self {
            page_size,
            ..Self::default()
        }
    }

    /// Copy of these criteria pointing at another page
    pub fn at_cursor(&self, cursor: Option<String>) -> Self {
        Self {
            cursor,
            ..self.clone()
        }
    }
}

/// Raw values from the search form, before validation.
///
/// `None` leaves the matching criteria field as it is. An empty string
/// clears an optional text filter, except for `name` which must not be blank
/// and is removed with `clear_name` instead.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FormValues {
    pub name: Option<String>,
    /// Drop the current name filter
    #[serde(default)]
    pub clear_name: bool,
    pub address: Option<String>,
    pub location: Option<String>,
    pub barangay: Option<String>,
    pub landlord: Option<String>,
    #[serde(rename = "typeArray")]
    pub types: Option<Vec<String>>,
    pub price_min: Option<i64>,
    pub price_max: Option<i64>,
    #[serde(rename = "limit")]
    pub page_size: Option<i64>,
}

/// Sidebar type selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeChoice {
    All,
    Only(AccommodationType),
}

/// Fixed price brackets offered in the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceRange {
    All,
    Below1000,
    OneToTwo,
    TwoToThree,
    ThreeToFour,
    AboveFour,
}

impl PriceRange {
    pub const ALL: [PriceRange; 6] = [
        Self::All,
        Self::Below1000,
        Self::OneToTwo,
        Self::TwoToThree,
        Self::ThreeToFour,
        Self::AboveFour,
    ];

    /// `(price_min, price_max)` this bracket selects
    pub fn bounds(&self) -> (Option<u32>, Option<u32>) {
        match self {
            Self::All => (None, None),
            Self::Below1000 => (None, Some(1000)),
            Self::OneToTwo => (Some(1001), Some(2000)),
            Self::TwoToThree => (Some(2001), Some(3000)),
            Self::ThreeToFour => (Some(3001), Some(4000)),
            Self::AboveFour => (Some(4001), None),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Below1000 => "below-1000",
            Self::OneToTwo => "one-to-two",
            Self::TwoToThree => "two-to-three",
            Self::ThreeToFour => "three-to-four",
            Self::AboveFour => "above-four",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Below1000 => "Under ₱ 1001",
            Self::OneToTwo => "₱ 1001 – ₱ 2000",
            Self::TwoToThree => "₱ 2001 – ₱ 3000",
            Self::ThreeToFour => "₱ 3001 – ₱ 4000",
            Self::AboveFour => "Above ₱ 4001",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|range| range.as_str() == value.trim())
    }
}

/// A sidebar selection that replaces one group of criteria fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuickFilter {
    Type(TypeChoice),
    PriceRange(PriceRange),
    /// Barangay picked from the suggestion list; `None` means all locations
    Location(Option<String>),
}

impl QuickFilter {
    /// Parse a `(kind, value)` pair as emitted by the sidebar controls
    pub fn parse(kind: &str, value: &str) -> Result<Self, ValidationErrors> {
        match kind.trim() {
            "type" => {
                if value.trim().eq_ignore_ascii_case("all") {
                    return Ok(Self::Type(TypeChoice::All));
                }
                value
                    .parse::<AccommodationType>()
                    .map(|kind| Self::Type(TypeChoice::Only(kind)))
                    .map_err(|e| ValidationErrors::single(Field::Type, e.to_string()))
            }
            "price_range" => PriceRange::parse(value)
                .map(Self::PriceRange)
                .ok_or_else(|| {
                    ValidationErrors::single(
                        Field::QuickFilter,
                        format!("unknown price range '{}'", value),
                    )
                }),
            "location" => {
                let value = value.trim();
                Ok(Self::Location((!value.is_empty()).then(|| value.to_string())))
            }
            other => Err(ValidationErrors::single(
                Field::QuickFilter,
                format!("unknown quick filter '{}'", other),
            )),
        }
    }
}
