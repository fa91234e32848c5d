//! Data models for test-run timelines

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw marker used by record producers for "not applicable" dimension values.
pub const NOT_APPLICABLE: &str = "N/A";

/// Aggregated result of one test-execution unit for one version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRunRecord {
    pub version: String,
    pub passed: u64,
    pub failed: u64,
    pub category: String,
    /// `None` when the platform does not apply to this run
    pub platform: Option<String>,
    /// `None` when the priority does not apply to this run
    pub priority: Option<String>,
}

impl TestRunRecord {
    pub fn new(
        version: impl Into<String>,
        passed: u64,
        failed: u64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            version: version.into(),
            passed,
            failed,
            category: category.into(),
            platform: None,
            priority: None,
        }
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        let platform: String = platform.into();
        self.platform = dimension_value(&platform);
        self
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        let priority: String = priority.into();
        self.priority = dimension_value(&priority);
        self
    }

    /// Contribution of this record as a breakdown
    pub fn breakdown(&self) -> Breakdown {
        Breakdown {
            passed: self.passed as f64,
            failed: self.failed as f64,
        }
    }
}

/// Map a raw dimension value to its typed form, treating the sentinel and the
/// empty string as "not applicable".
pub fn dimension_value(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == NOT_APPLICABLE {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Accumulated passed/failed counts for one dimension value
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub passed: f64,
    pub failed: f64,
}

impl Breakdown {
    pub fn new(passed: f64, failed: f64) -> Self {
        Self { passed, failed }
    }

    pub fn add(&mut self, other: Breakdown) {
        self.passed += other.passed;
        self.failed += other.failed;
    }

    /// Combined counts of `self` and `other`
    pub fn merge(self, other: Breakdown) -> Breakdown {
        Breakdown {
            passed: self.passed + other.passed,
            failed: self.failed + other.failed,
        }
    }

    pub fn total(&self) -> f64 {
        self.passed + self.failed
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0.0
    }
}

impl std::iter::Sum for Breakdown {
    fn sum<I: Iterator<Item = Breakdown>>(iter: I) -> Self {
        iter.fold(Breakdown::default(), Breakdown::merge)
    }
}

/// Dimension used for drill-down breakdowns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Category,
    Platform,
    Priority,
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Category => write!(f, "category"),
            Self::Platform => write!(f, "platform"),
            Self::Priority => write!(f, "priority"),
        }
    }
}

/// Passed/failed shares of a version's total, in percent
///
/// Both shares are non-negative and add up to 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelativeStats {
    #[serde(rename = "relPassed")]
    pub passed: f64,
    #[serde(rename = "relFailed")]
    pub failed: f64,
}

impl RelativeStats {
    /// Shares of `passed` and `failed`, or `None` when both are zero
    pub fn from_counts(passed: f64, failed: f64) -> Option<Self> {
        let total = passed + failed;
        if total == 0.0 {
            return None;
        }
        Some(Self {
            passed: 100.0 * passed / total,
            failed: 100.0 * failed / total,
        })
    }
}

/// Aggregated statistics for one version of the window
///
/// `relative` is `None` when nothing contributed to the version. Its fields
/// are flattened into the summary as `relPassed`/`relFailed` and omitted
/// entirely in that case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSummary {
    pub version: String,
    pub abs_passed: f64,
    /// Stored as a non-positive number so failures plot as mirrored bars
    pub abs_failed: f64,
    #[serde(flatten)]
    pub relative: Option<RelativeStats>,
    pub by_category: BTreeMap<String, Breakdown>,
    pub by_platform: BTreeMap<String, Breakdown>,
    pub by_priority: BTreeMap<String, Breakdown>,
}

impl VersionSummary {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..Default::default()
        }
    }

    /// Number of runs that contributed, directly or through backfill
    pub fn total(&self) -> f64 {
        self.abs_passed - self.abs_failed
    }

    pub fn has_data(&self) -> bool {
        self.relative.is_some()
    }

    pub fn rel_passed(&self) -> Option<f64> {
        self.relative.map(|r| r.passed)
    }

    pub fn rel_failed(&self) -> Option<f64> {
        self.relative.map(|r| r.failed)
    }

    /// Breakdown map for one dimension
    pub fn dimension(&self, dimension: Dimension) -> &BTreeMap<String, Breakdown> {
        match dimension {
            Dimension::Category => &self.by_category,
            Dimension::Platform => &self.by_platform,
            Dimension::Priority => &self.by_priority,
        }
    }
}
