use crate::config::MAX_PAGE_SIZE;
use crate::error::{Field, ValidationErrors};
use crate::models::AccommodationType;
use crate::search::types::{FilterCriteria, FormValues, QuickFilter, TypeChoice};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^[\w\s'"-]*[\w'"-][\w\s'"-]*$"#).expect("name pattern compiles")
});

/// Returned when criteria changed in a way that needs a fresh first page
#[must_use = "the pagination driver has to be restarted"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Restart;

/// Owns the filter criteria and the only two ways of changing them
#[derive(Debug, Clone)]
pub struct FilterReducer {
    criteria: FilterCriteria,
    changed_since_fetch: bool,
}

impl Default for FilterReducer {
    fn default() -> Self {
        Self::new(FilterCriteria::default())
    }
}

impl FilterReducer {
    pub fn new(criteria: FilterCriteria) -> Self {
        Self {
            criteria,
            changed_since_fetch: false,
        }
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Whether quick filters changed the criteria since the last restart
    pub fn has_unfetched_changes(&self) -> bool {
        self.changed_since_fetch
    }

    pub(crate) fn mark_fetched(&mut self) {
        self.changed_since_fetch = false;
    }

    /// Merge a submitted search form into the criteria.
    ///
    /// On success the cursor goes back to the first page and the caller must
    /// restart pagination. On failure nothing changes.
    pub fn apply_form_submit(&mut self, form: &FormValues) -> Result<Restart, ValidationErrors> {
        let merged = merge_form(&self.criteria, form)?;
        debug!(?merged, "Search form accepted");
        self.criteria = merged;
        self.changed_since_fetch = true;
        Ok(Restart)
    }

    /// Replace the criteria fields a sidebar control owns.
    ///
    /// Never asks for a refetch, so several clicks in a row cost nothing
    /// until the caller refetches explicitly.
    pub fn apply_quick_filter(&mut self, filter: QuickFilter) {
        match filter {
            QuickFilter::Type(TypeChoice::All) => self.criteria.types.clear(),
            QuickFilter::Type(TypeChoice::Only(kind)) => self.criteria.types = vec![kind],
            QuickFilter::PriceRange(range) => {
                let (min, max) = range.bounds();
                self.criteria.price_min = min;
                self.criteria.price_max = max;
            }
            QuickFilter::Location(barangay) => self.criteria.barangay = barangay,
        }
        self.changed_since_fetch = true;
    }
}

fn merge_form(current: &FilterCriteria, form: &FormValues) -> Result<FilterCriteria, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let mut merged = current.clone();

    if form.clear_name {
        if form.name.is_some() {
            errors.add(Field::Name, "Cannot set and clear the name in one search");
        }
        merged.name = None;
    } else if let Some(name) = &form.name {
        let name = name.trim();
        if name.is_empty() {
            errors.add(Field::Name, "Must not be empty");
        } else if !NAME_PATTERN.is_match(name) {
            errors.add(
                Field::Name,
                "Accommodation Name must only contain alphanumerics, apostrophes, double quotes, hyphens and spaces.",
            );
        } else {
            merged.name = Some(name.to_string());
        }
    }

    merge_text(&mut merged.address, form.address.as_deref());
    merge_text(&mut merged.location, form.location.as_deref());
    merge_text(&mut merged.barangay, form.barangay.as_deref());
    merge_text(&mut merged.landlord, form.landlord.as_deref());

    if let Some(types) = &form.types {
        let mut parsed: Vec<AccommodationType> = Vec::with_capacity(types.len());
        for raw in types {
            match raw.parse::<AccommodationType>() {
                Ok(kind) if !parsed.contains(&kind) => parsed.push(kind),
                Ok(_) => {}
                Err(e) => errors.add(Field::Type, e.to_string()),
            }
        }
        merged.types = parsed;
    }

    if let Some(min) = form.price_min {
        match price(min) {
            Some(min) => merged.price_min = Some(min),
            None => errors.add(Field::PriceMin, "Price must be a non-negative number"),
        }
    }
    if let Some(max) = form.price_max {
        match price(max) {
            Some(max) => merged.price_max = Some(max),
            None => errors.add(Field::PriceMax, "Price must be a non-negative number"),
        }
    }
    if let (Some(min), Some(max)) = (merged.price_min, merged.price_max) {
        if min > max {
            errors.add(Field::PriceMin, format!("Minimum price P{} is above maximum price P{}", min, max));
        }
    }

    if let Some(size) = form.page_size {
        match u8::try_from(size) {
            Ok(size) if (1..=MAX_PAGE_SIZE).contains(&size) => merged.page_size = size,
            _ => errors.add(
                Field::PageSize,
                format!("Limit must be between 1 and {}", MAX_PAGE_SIZE),
            ),
        }
    }

    merged.cursor = None;
    errors.into_result().map(|()| merged)
}

fn merge_text(target: &mut Option<String>, submitted: Option<&str>) {
    if let Some(value) = submitted {
        let value = value.trim();
        *target = (!value.is_empty()).then(|| value.to_string());
    }
}

fn price(value: i64) -> Option<u32> {
    u32::try_from(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::types::PriceRange;

    fn submit(reducer: &mut FilterReducer, form: FormValues) -> Result<Restart, ValidationErrors> {
        reducer.apply_form_submit(&form)
    }

    #[test]
    fn submit_merges_fields_and_resets_cursor() {
        let mut reducer = FilterReducer::new(FilterCriteria {
            barangay: Some("Batong Malake".into()),
            cursor: Some("acc_40".into()),
            ..FilterCriteria::default()
        });

        let restart = submit(
            &mut reducer,
            FormValues {
                name: Some("  Sunrise Dorm ".into()),
                types: Some(vec!["dormitory".into()]),
                ..FormValues::default()
            },
        );

        assert_eq!(restart, Ok(Restart));
        let criteria = reducer.criteria();
        assert_eq!(criteria.name.as_deref(), Some("Sunrise Dorm"));
        assert_eq!(criteria.barangay.as_deref(), Some("Batong Malake"));
        assert_eq!(criteria.types, vec![AccommodationType::Dormitory]);
        assert_eq!(criteria.cursor, None);
    }

    #[test]
    fn blank_name_is_rejected_without_touching_state() {
        let mut reducer = FilterReducer::default();
        let before = reducer.criteria().clone();

        let err = submit(
            &mut reducer,
            FormValues {
                name: Some("   ".into()),
                price_min: Some(500),
                ..FormValues::default()
            },
        )
        .unwrap_err();

        assert_eq!(err.for_field(Field::Name).collect::<Vec<_>>(), ["Must not be empty"]);
        assert_eq!(reducer.criteria(), &before);
        assert!(!reducer.has_unfetched_changes());
    }

    #[test]
    fn name_filter_can_be_cleared_but_not_blanked() {
        let mut reducer = FilterReducer::default();
        let _ = submit(
            &mut reducer,
            FormValues {
                name: Some("Sunrise".into()),
                ..FormValues::default()
            },
        )
        .unwrap();

        assert!(submit(
            &mut reducer,
            FormValues {
                name: Some(String::new()),
                ..FormValues::default()
            },
        )
        .is_err());
        let _ = submit(&mut reducer, FormValues::default()).unwrap();
        assert_eq!(reducer.criteria().name.as_deref(), Some("Sunrise"));

        let err = submit(
            &mut reducer,
            FormValues {
                name: Some("Other".into()),
                clear_name: true,
                ..FormValues::default()
            },
        )
        .unwrap_err();
        assert_eq!(err.for_field(Field::Name).count(), 1);
        assert_eq!(reducer.criteria().name.as_deref(), Some("Sunrise"));

        let restart = submit(
            &mut reducer,
            FormValues {
                clear_name: true,
                ..FormValues::default()
            },
        );
        assert_eq!(restart, Ok(Restart));
        assert_eq!(reducer.criteria().name, None);
    }

    #[test]
    fn name_with_symbols_is_rejected() {
        let mut reducer = FilterReducer::default();
        let err = submit(
            &mut reducer,
            FormValues {
                name: Some("dorm; DROP TABLE".into()),
                ..FormValues::default()
            },
        )
        .unwrap_err();
        assert_eq!(err.for_field(Field::Name).count(), 1);
    }

    #[test]
    fn inverted_price_bounds_are_rejected() {
        let mut reducer = FilterReducer::default();
        let err = submit(
            &mut reducer,
            FormValues {
                price_min: Some(3000),
                price_max: Some(1000),
                ..FormValues::default()
            },
        )
        .unwrap_err();
        assert_eq!(err.for_field(Field::PriceMin).count(), 1);
        assert_eq!(reducer.criteria().price_min, None);
    }

    #[test]
    fn inverted_bounds_checked_against_existing_criteria() {
        let mut reducer = FilterReducer::default();
        reducer.apply_quick_filter(QuickFilter::PriceRange(PriceRange::Below1000));

        let result = submit(
            &mut reducer,
            FormValues {
                price_min: Some(2000),
                ..FormValues::default()
            },
        );
        assert!(result.is_err());
        assert_eq!(reducer.criteria().price_max, Some(1000));
    }

    #[test]
    fn negative_price_and_bad_limit_are_reported_per_field() {
        let mut reducer = FilterReducer::default();
        let err = submit(
            &mut reducer,
            FormValues {
                price_max: Some(-1),
                page_size: Some(250),
                types: Some(vec!["CASTLE".into()]),
                ..FormValues::default()
            },
        )
        .unwrap_err();
        assert_eq!(err.for_field(Field::PriceMax).count(), 1);
        assert_eq!(err.for_field(Field::PageSize).count(), 1);
        assert_eq!(err.for_field(Field::Type).count(), 1);
    }

    #[test]
    fn empty_text_clears_optional_filter() {
        let mut reducer = FilterReducer::new(FilterCriteria {
            landlord: Some("usr_1".into()),
            ..FilterCriteria::default()
        });
        let _ = submit(
            &mut reducer,
            FormValues {
                landlord: Some(String::new()),
                ..FormValues::default()
            },
        )
        .unwrap();
        assert_eq!(reducer.criteria().landlord, None);
    }

    #[test]
    fn quick_filters_replace_only_their_fields() {
        let mut reducer = FilterReducer::new(FilterCriteria {
            name: Some("dorm".into()),
            barangay: Some("Anos".into()),
            ..FilterCriteria::default()
        });

        reducer.apply_quick_filter(QuickFilter::Type(TypeChoice::Only(AccommodationType::Hotel)));
        reducer.apply_quick_filter(QuickFilter::PriceRange(PriceRange::AboveFour));

        let criteria = reducer.criteria();
        assert_eq!(criteria.types, vec![AccommodationType::Hotel]);
        assert_eq!((criteria.price_min, criteria.price_max), (Some(4001), None));
        assert_eq!(criteria.name.as_deref(), Some("dorm"));
        assert_eq!(criteria.barangay.as_deref(), Some("Anos"));
        assert!(reducer.has_unfetched_changes());

        reducer.apply_quick_filter(QuickFilter::Type(TypeChoice::All));
        reducer.apply_quick_filter(QuickFilter::Location(None));
        assert!(reducer.criteria().types.is_empty());
        assert_eq!(reducer.criteria().barangay, None);
    }
}
