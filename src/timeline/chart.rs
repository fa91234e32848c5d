//! Chart payloads consumed by the dashboard
//!
//! Timelines are rendered as two stacked series keyed "Passed" and "Failed",
//! each a list of `[version, value]` points. Drill-downs map a title-cased
//! dimension value to a two-slice pie.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::models::{Breakdown, Dimension, VersionSummary};

pub const PASSED: &str = "Passed";
pub const FAILED: &str = "Failed";

/// One named series of `[version, value]` points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series<V> {
    pub key: String,
    pub values: Vec<(String, V)>,
}

impl<V> Series<V> {
    fn from_summaries<F>(key: &str, summaries: &[VersionSummary], value: F) -> Self
    where
        F: Fn(&VersionSummary) -> V,
    {
        Self {
            key: key.to_string(),
            values: summaries
                .iter()
                .map(|s| (s.version.clone(), value(s)))
                .collect(),
        }
    }
}

/// One slice of a drill-down pie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slice {
    pub key: String,
    pub value: f64,
}

pub type BreakdownChart = BTreeMap<String, Vec<Slice>>;

/// Absolute counts; failures are non-positive
pub fn absolute_timeline(summaries: &[VersionSummary]) -> Vec<Series<f64>> {
    vec![
        Series::from_summaries(PASSED, summaries, |s| s.abs_passed),
        Series::from_summaries(FAILED, summaries, |s| s.abs_failed),
    ]
}

/// Percentages; versions without data keep their point with a `null` value
pub fn relative_timeline(summaries: &[VersionSummary]) -> Vec<Series<Option<f64>>> {
    vec![
        Series::from_summaries(PASSED, summaries, VersionSummary::rel_passed),
        Series::from_summaries(FAILED, summaries, VersionSummary::rel_failed),
    ]
}

/// Drill-down of one version along one dimension
///
/// Values that differ only by case share a title and are merged.
pub fn breakdown_chart(summary: &VersionSummary, dimension: Dimension) -> BreakdownChart {
    let mut merged: BTreeMap<String, Breakdown> = BTreeMap::new();
    for (value, breakdown) in summary.dimension(dimension) {
        merged.entry(title_case(value)).or_default().add(*breakdown);
    }

    merged
        .into_iter()
        .map(|(title, breakdown)| {
            let slices = vec![
                Slice {
                    key: PASSED.to_string(),
                    value: breakdown.passed,
                },
                Slice {
                    key: FAILED.to_string(),
                    value: breakdown.failed,
                },
            ];
            (title, slices)
        })
        .collect()
}

/// Lowercase, then capitalize the first letter of every word
pub fn title_case(raw: &str) -> String {
    let mut titled = String::with_capacity(raw.len());
    let mut word_start = true;

    for ch in raw.chars() {
        if word_start {
            titled.extend(ch.to_uppercase());
        } else {
            titled.extend(ch.to_lowercase());
        }
        word_start = is_word_separator(ch);
    }

    titled
}

/// ASCII characters other than letters, digits and `_` end a word. Outside
/// ASCII only whitespace does, so non-ASCII punctuation stays inside a word.
fn is_word_separator(ch: char) -> bool {
    if ch.is_ascii() {
        return !(ch.is_ascii_alphanumeric() || ch == '_');
    }
    ch.is_whitespace()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::models::RelativeStats;
    use serde_json::json;

    fn summary(version: &str, passed: f64, failed: f64) -> VersionSummary {
        let mut summary = VersionSummary::new(version);
        summary.abs_passed = passed;
        summary.abs_failed = -failed;
        summary.relative = RelativeStats::from_counts(passed, failed);
        summary
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("CENTOS"), "Centos");
        assert_eq!(title_case("windows server"), "Windows Server");
        assert_eq!(title_case("win-64"), "Win-64");
        assert_eq!(title_case("P0"), "P0");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_title_case_non_ascii_separators() {
        // en dash and middle dot do not start a new word
        assert_eq!(title_case("WIN\u{2013}SERVER"), "Win\u{2013}server");
        assert_eq!(title_case("RHEL\u{00B7}EIGHT"), "Rhel\u{00B7}eight");
        // non-breaking space does
        assert_eq!(title_case("MAC\u{00A0}OS"), "Mac\u{00A0}Os");
        assert_eq!(title_case("DÉBIAN ÉDITION"), "Débian Édition");
        assert_eq!(title_case("snake_case"), "Snake_case");
    }

    #[test]
    fn test_absolute_timeline_wire_format() {
        let summaries = vec![summary("1.0", 3.0, 1.0), summary("1.1", 4.0, 0.0)];

        let json = serde_json::to_value(absolute_timeline(&summaries)).unwrap();
        assert_eq!(
            json,
            json!([
                {"key": "Passed", "values": [["1.0", 3.0], ["1.1", 4.0]]},
                {"key": "Failed", "values": [["1.0", -1.0], ["1.1", 0.0]]}
            ])
        );
    }

    #[test]
    fn test_relative_timeline_keeps_versions_without_data() {
        let summaries = vec![summary("1.0", 3.0, 1.0), summary("1.1", 0.0, 0.0)];

        let json = serde_json::to_value(relative_timeline(&summaries)).unwrap();
        assert_eq!(json[0]["values"][0], json!(["1.0", 75.0]));
        assert_eq!(json[1]["values"][0], json!(["1.0", 25.0]));
        assert_eq!(json[0]["values"][1], json!(["1.1", null]));
    }

    #[test]
    fn test_breakdown_chart_title_cases_and_merges() {
        let mut summary = VersionSummary::new("1.0");
        summary
            .by_platform
            .insert("CENTOS".to_string(), Breakdown::new(3.0, 1.0));
        summary
            .by_platform
            .insert("centos".to_string(), Breakdown::new(1.0, 0.0));
        summary
            .by_platform
            .insert("WIN".to_string(), Breakdown::new(2.0, 2.0));

        let chart = breakdown_chart(&summary, Dimension::Platform);
        assert_eq!(chart.len(), 2);
        assert_eq!(
            serde_json::to_value(&chart["Centos"]).unwrap(),
            json!([{"key": "Passed", "value": 4.0}, {"key": "Failed", "value": 1.0}])
        );
        assert!(chart.contains_key("Win"));
    }
}
