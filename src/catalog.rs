//! Car-model catalog queries.
//!
//! Read-only views over [`CommissionDataSource::car_models`]: a filtered,
//! sorted listing and a lookup by id.  Inactive models are listed like any
//! other.

use crate::error::SourceError;
use crate::models::CarModel;
use crate::source::CommissionDataSource;
use serde::Deserialize;
use std::cmp::Ordering;

/// Filter and ordering for a catalog listing.
///
/// `model_name` and `model_code` match case-insensitive substrings; empty
/// values are ignored.  Unknown `sort_by` values fall back to the
/// manufacturing date, and the order is descending unless
/// `sort_descending` is `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarModelSearch {
    pub model_name: Option<String>,
    pub model_code: Option<String>,
    pub sort_by: Option<String>,
    pub sort_descending: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    DateOfManufacturing,
    SortOrder,
}

impl CarModelSearch {
    pub fn sort_key(&self) -> SortKey {
        match self.sort_by.as_deref() {
            Some("SortOrder") => SortKey::SortOrder,
            _ => SortKey::DateOfManufacturing,
        }
    }

    pub fn descending(&self) -> bool {
        self.sort_descending.unwrap_or(true)
    }

    pub fn matches(&self, model: &CarModel) -> bool {
        contains_ignore_case(&model.model_name, self.model_name.as_deref())
            && contains_ignore_case(&model.model_code, self.model_code.as_deref())
    }

    /// Filters and orders `models`.  The sort is stable, so ties keep the
    /// catalog order.
    pub fn apply(&self, models: Vec<CarModel>) -> Vec<CarModel> {
        let key = self.sort_key();
        let mut selected: Vec<CarModel> = models
            .into_iter()
            .filter(|model| self.matches(model))
            .collect();
        selected.sort_by(|a, b| {
            let ordering = compare(key, a, b);
            if self.descending() {
                ordering.reverse()
            } else {
                ordering
            }
        });
        selected
    }
}

fn compare(key: SortKey, a: &CarModel, b: &CarModel) -> Ordering {
    match key {
        SortKey::DateOfManufacturing => a.date_of_manufacturing.cmp(&b.date_of_manufacturing),
        SortKey::SortOrder => a.sort_order.cmp(&b.sort_order),
    }
}

fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(needle) if !needle.is_empty() => haystack
            .to_lowercase()
            .contains(&needle.to_lowercase()),
        _ => true,
    }
}

/// Lists the catalog entries selected by `search`.
pub fn list_car_models<S>(
    source: &S,
    search: &CarModelSearch,
) -> Result<Vec<CarModel>, SourceError>
where
    S: CommissionDataSource + ?Sized,
{
    Ok(search.apply(source.car_models()?))
}

/// Looks up one catalog entry by id.
pub fn find_car_model<S>(source: &S, id: i64) -> Result<Option<CarModel>, SourceError>
where
    S: CommissionDataSource + ?Sized,
{
    Ok(source.car_models()?.into_iter().find(|model| model.id == id))
}
