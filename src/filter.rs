//! Generic vs brand projection over search results
//!
//! A pure view over the current result set, recomputed per request; it
//! never mutates session state.

use crate::registry::ProductRecord;
use serde::Deserialize;

/// Display filter over a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductFilter {
    #[default]
    All,
    Generic,
    Brand,
}

/// Generic products carry the "EFG" marker in their registered name.
fn is_generic(record: &ProductRecord) -> bool {
    record.name.to_uppercase().contains("EFG")
}

impl ProductFilter {
    pub fn apply<'a>(self, records: &'a [ProductRecord]) -> Vec<&'a ProductRecord> {
        records
            .iter()
            .filter(|r| match self {
                ProductFilter::All => true,
                ProductFilter::Generic => is_generic(r),
                ProductFilter::Brand => !is_generic(r),
            })
            .collect()
    }
}
