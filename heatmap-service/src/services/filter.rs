//! Case-insensitive substring filtering over hazard records.
//!
//! Severity is not a filter dimension.

use crate::models::HazardRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Value that disables a filter dimension.
pub const ALL: &str = "all";

/// One filter dimension as sent by the map client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum FieldFilter {
    #[default]
    All,
    /// Normalized needle: lowercased, hyphens turned into spaces so slugs
    /// like `site-a` match `Site A`.
    Contains(String),
}

impl FieldFilter {
    pub fn contains(value: &str) -> Self {
        FieldFilter::Contains(value.to_lowercase().replace('-', " "))
    }

    pub fn is_all(&self) -> bool {
        matches!(self, FieldFilter::All)
    }

    pub fn matches(&self, field: &str) -> bool {
        match self {
            FieldFilter::All => true,
            FieldFilter::Contains(needle) => field.to_lowercase().contains(needle.as_str()),
        }
    }
}

impl From<String> for FieldFilter {
    fn from(value: String) -> Self {
        if value == ALL {
            FieldFilter::All
        } else {
            FieldFilter::contains(&value)
        }
    }
}

/// Conjunction of the four filter dimensions. Missing dimensions mean `all`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HazardFilters {
    pub site: FieldFilter,
    pub area: FieldFilter,
    pub shift: FieldFilter,
    pub category: FieldFilter,
}

type FieldAccessor = fn(&HazardRecord) -> &str;

fn site(record: &HazardRecord) -> &str {
    &record.site
}

fn area(record: &HazardRecord) -> &str {
    &record.area
}

fn shift(record: &HazardRecord) -> &str {
    &record.shift
}

fn category(record: &HazardRecord) -> &str {
    &record.category
}

impl HazardFilters {
    pub fn is_unfiltered(&self) -> bool {
        self.dimensions().iter().all(|(filter, _)| filter.is_all())
    }

    /// Dimensions in application order.
    fn dimensions(&self) -> [(&FieldFilter, FieldAccessor); 4] {
        [
            (&self.site, site as FieldAccessor),
            (&self.area, area),
            (&self.shift, shift),
            (&self.category, category),
        ]
    }

    /// Keep matching records, preserving their relative order.
    pub fn apply(&self, mut records: Vec<HazardRecord>) -> Vec<HazardRecord> {
        for (filter, field) in self.dimensions() {
            if !filter.is_all() {
                records.retain(|record| filter.matches(field(record)));
            }
        }
        records
    }
}

/// Distinct values per dimension, for building filter pickers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub sites: Vec<String>,
    pub areas: Vec<String>,
    pub shifts: Vec<String>,
    pub categories: Vec<String>,
}

impl FilterOptions {
    pub fn from_records(records: &[HazardRecord]) -> Self {
        fn distinct(records: &[HazardRecord], field: FieldAccessor) -> Vec<String> {
            records
                .iter()
                .map(|r| field(r).to_string())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        }

        Self {
            sites: distinct(records, site),
            areas: distinct(records, area),
            shifts: distinct(records, shift),
            categories: distinct(records, category),
        }
    }
}
