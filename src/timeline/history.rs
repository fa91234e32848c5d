//! Cross-version running totals per category
//!
//! Built up while the reducer walks the window in version order, and used to
//! backfill categories that did not run in a later version.

use std::collections::BTreeMap;

use super::models::{Breakdown, TestRunRecord};

/// Cumulative contribution of one category across processed versions
///
/// Keys are `None` for runs where the dimension did not apply, so that such
/// runs still count toward the category total.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTotals {
    pub by_platform: BTreeMap<Option<String>, Breakdown>,
    pub by_priority: BTreeMap<Option<String>, Breakdown>,
}

impl CategoryTotals {
    /// Total of the category, summed over its platform breakdowns
    pub fn total(&self) -> Breakdown {
        self.by_platform.values().copied().sum()
    }

    /// Platform breakdowns for applicable platforms only
    pub fn platforms(&self) -> impl Iterator<Item = (&str, Breakdown)> {
        applicable(&self.by_platform)
    }

    /// Priority breakdowns for applicable priorities only
    pub fn priorities(&self) -> impl Iterator<Item = (&str, Breakdown)> {
        applicable(&self.by_priority)
    }
}

fn applicable(
    map: &BTreeMap<Option<String>, Breakdown>,
) -> impl Iterator<Item = (&str, Breakdown)> {
    map.iter()
        .filter_map(|(key, breakdown)| key.as_deref().map(|k| (k, *breakdown)))
}

/// Running per-category history, scoped to one reduction
#[derive(Debug, Clone, Default)]
pub struct CategoryHistory {
    categories: BTreeMap<String, CategoryTotals>,
}

impl CategoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one record into its category's running totals
    pub fn record(&mut self, record: &TestRunRecord) {
        let contribution = record.breakdown();
        let totals = self.categories.entry(record.category.clone()).or_default();

        totals
            .by_platform
            .entry(record.platform.clone())
            .or_default()
            .add(contribution);
        totals
            .by_priority
            .entry(record.priority.clone())
            .or_default()
            .add(contribution);
    }

    /// Every category seen so far, in sorted order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn totals(&self, category: &str) -> Option<&CategoryTotals> {
        self.categories.get(category)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CategoryTotals)> {
        self.categories.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
