//! Groups test-run records by version label

use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use super::models::{dimension_value, TestRunRecord};
use crate::error::{Error, Result};

/// Records grouped by version label
///
/// Iteration follows plain lexicographic order of the labels, which is the
/// chronological order used by the reducer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VersionGroups {
    groups: BTreeMap<String, Vec<TestRunRecord>>,
}

impl VersionGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: TestRunRecord) {
        self.groups
            .entry(record.version.clone())
            .or_default()
            .push(record);
    }

    /// Distinct version labels in sorted order
    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn get(&self, version: &str) -> Option<&[TestRunRecord]> {
        self.groups.get(version).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[TestRunRecord])> {
        self.groups
            .iter()
            .map(|(version, records)| (version.as_str(), records.as_slice()))
    }

    /// Number of distinct versions
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn record_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// All records, version by version
    pub fn flatten(&self) -> Vec<TestRunRecord> {
        self.groups.values().flatten().cloned().collect()
    }
}

impl FromIterator<TestRunRecord> for VersionGroups {
    fn from_iter<I: IntoIterator<Item = TestRunRecord>>(iter: I) -> Self {
        let mut groups = Self::new();
        for record in iter {
            groups.insert(record);
        }
        groups
    }
}

/// Group typed records by their version label
pub fn collect<I>(records: I) -> VersionGroups
where
    I: IntoIterator<Item = TestRunRecord>,
{
    records.into_iter().collect()
}

/// Group raw documents from a record source
///
/// Documents with unusable counts or no category are dropped and processing
/// continues. A document without a version label cannot be grouped at all and
/// fails the whole call.
pub fn collect_raw(documents: &[Value]) -> Result<VersionGroups> {
    let mut groups = VersionGroups::new();
    let mut dropped = 0usize;

    for (index, document) in documents.iter().enumerate() {
        match parse_document(index, document)? {
            Some(record) => groups.insert(record),
            None => {
                warn!("Dropping malformed test-run record {}: {}", index, document);
                dropped += 1;
            }
        }
    }

    debug!(
        "Collected {} records into {} versions ({} dropped)",
        groups.record_count(),
        groups.len(),
        dropped
    );

    Ok(groups)
}

/// Version label of a raw document, canonical or legacy shape
pub fn document_version(document: &Value) -> Option<&str> {
    document
        .get("version")
        .or_else(|| document.get("build"))
        .and_then(Value::as_str)
        .filter(|v| !v.is_empty())
}

/// Parse one document, `Ok(None)` when it is malformed but groupable.
fn parse_document(index: usize, document: &Value) -> Result<Option<TestRunRecord>> {
    let version = document_version(document).ok_or(Error::MissingVersion { index })?;

    let Some(category) = string_field(document, &["category", "component"]) else {
        return Ok(None);
    };

    let Some((passed, failed)) = counts(document) else {
        return Ok(None);
    };

    Ok(Some(TestRunRecord {
        version: version.to_string(),
        passed,
        failed,
        category,
        platform: string_field(document, &["platform", "os"])
            .as_deref()
            .and_then(dimension_value),
        priority: string_field(document, &["priority"])
            .as_deref()
            .and_then(dimension_value),
    }))
}

fn string_field(document: &Value, names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| document.get(*name).and_then(Value::as_str))
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// Passed/failed counts from either `passed`/`failed` or the legacy
/// `failCount`/`totalCount` pair.
fn counts(document: &Value) -> Option<(u64, u64)> {
    if let (Some(passed), Some(failed)) = (count(document, "passed"), count(document, "failed")) {
        return Some((passed, failed));
    }

    let failed = count(document, "failCount")?;
    let total = count(document, "totalCount")?;
    total.checked_sub(failed).map(|passed| (passed, failed))
}

/// Non-negative integral count; whole floats are accepted since document
/// stores commonly hand numbers back as doubles.
fn count(document: &Value, name: &str) -> Option<u64> {
    let value = document.get(name)?;
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
            .map(|f| f as u64)
    })
}
