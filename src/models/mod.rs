use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of accommodation a listing is registered as
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccommodationType {
    Apartment,
    Bedspacer,
    Dormitory,
    Hotel,
    // The listing service spells it this way
    #[serde(rename = "TRANSCIENT", alias = "TRANSIENT")]
    Transient,
}

impl AccommodationType {
    pub const ALL: [AccommodationType; 5] = [
        Self::Apartment,
        Self::Bedspacer,
        Self::Dormitory,
        Self::Hotel,
        Self::Transient,
    ];

    /// Name used on the wire and in export summaries
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Apartment => "APARTMENT",
            Self::Bedspacer => "BEDSPACER",
            Self::Dormitory => "DORMITORY",
            Self::Hotel => "HOTEL",
            Self::Transient => "TRANSCIENT",
        }
    }

    /// Human readable label for sidebars
    pub fn label(&self) -> &'static str {
        match self {
            Self::Apartment => "Apartment",
            Self::Bedspacer => "Bedspacer",
            Self::Dormitory => "Dormitory",
            Self::Hotel => "Hotel",
            Self::Transient => "Transient",
        }
    }
}

impl fmt::Display for AccommodationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a type name is outside the closed set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAccommodationType(pub String);

impl fmt::Display for UnknownAccommodationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown accommodation type '{}'", self.0)
    }
}

impl std::error::Error for UnknownAccommodationType {}

impl FromStr for AccommodationType {
    type Err = UnknownAccommodationType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "APARTMENT" => Ok(Self::Apartment),
            "BEDSPACER" => Ok(Self::Bedspacer),
            "DORMITORY" => Ok(Self::Dormitory),
            "HOTEL" => Ok(Self::Hotel),
            "TRANSCIENT" | "TRANSIENT" => Ok(Self::Transient),
            _ => Err(UnknownAccommodationType(s.to_string())),
        }
    }
}

/// Accommodation record as returned by the listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub barangay: Option<String>,
    #[serde(default)]
    pub landlord: String,
    #[serde(default)]
    pub contact_number: String,
    #[serde(default)]
    pub num_of_rooms: u32,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// One batch of listings from the paginated endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub items: Vec<Listing>,
    /// Absent once the end of the result set is reached
    #[serde(default)]
    pub next_cursor: Option<String>,
}

impl Page {
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }
}

/// Pages loaded for the current filter session, oldest fetch first
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct AccumulatedResult {
    pages: Vec<Page>,
}

impl AccumulatedResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Every loaded listing in load order
    pub fn items(&self) -> impl Iterator<Item = &Listing> {
        self.pages.iter().flat_map(|page| page.items.iter())
    }

    pub fn item_count(&self) -> usize {
        self.pages.iter().map(|page| page.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }

    pub(crate) fn push(&mut self, page: Page) {
        self.pages.push(page);
    }

    pub(crate) fn clear(&mut self) {
        self.pages.clear();
    }
}

impl FromIterator<Page> for AccumulatedResult {
    fn from_iter<I: IntoIterator<Item = Page>>(iter: I) -> Self {
        Self {
            pages: iter.into_iter().collect(),
        }
    }
}
