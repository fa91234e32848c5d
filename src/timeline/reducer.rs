//! Windowed reduction of grouped records into per-version summaries
//!
//! Versions are ordered by plain string comparison, so "v10" sorts before
//! "v2". The trailing `window_size` versions are folded in that order while a
//! [`CategoryHistory`] is carried from one version to the next. Once a
//! version's own records are in, every category seen so far that did not run
//! in this version is backfilled with its cumulative historical total. Only
//! later versions are ever backfilled from earlier ones.

use tracing::{debug, trace};

use super::collector::VersionGroups;
use super::history::CategoryHistory;
use super::models::{RelativeStats, TestRunRecord, VersionSummary};

/// Reduce grouped records to at most `window_size` summaries in version order
pub fn reduce(groups: &VersionGroups, window_size: usize) -> Vec<VersionSummary> {
    let versions: Vec<&str> = groups.versions().collect();
    let window = trailing_window(&versions, window_size);

    debug!(
        "Reducing {} of {} versions (window size {})",
        window.len(),
        versions.len(),
        window_size
    );

    let (summaries, history) = window.iter().fold(
        (Vec::with_capacity(window.len()), CategoryHistory::new()),
        |(mut summaries, mut history), version| {
            let records = groups.get(version).unwrap_or_default();
            summaries.push(summarize_version(version, records, &mut history));
            (summaries, history)
        },
    );

    debug!(
        "Reduced {} versions covering {} categories",
        summaries.len(),
        history.len()
    );

    summaries
}

/// Last `window_size` entries of the sorted version list
fn trailing_window<'a>(versions: &'a [&'a str], window_size: usize) -> &'a [&'a str] {
    let start = versions.len().saturating_sub(window_size);
    &versions[start..]
}

/// Build one version's summary and advance the history past it
fn summarize_version(
    version: &str,
    records: &[TestRunRecord],
    history: &mut CategoryHistory,
) -> VersionSummary {
    let mut summary = VersionSummary::new(version);

    for record in records {
        accumulate(&mut summary, record);
        history.record(record);
    }

    backfill(&mut summary, history);
    compute_relative(&mut summary);

    summary
}

fn accumulate(summary: &mut VersionSummary, record: &TestRunRecord) {
    let contribution = record.breakdown();

    summary.abs_passed += contribution.passed;
    summary.abs_failed -= contribution.failed;

    summary
        .by_category
        .entry(record.category.clone())
        .or_default()
        .add(contribution);

    if let Some(platform) = &record.platform {
        summary
            .by_platform
            .entry(platform.clone())
            .or_default()
            .add(contribution);
    }

    if let Some(priority) = &record.priority {
        summary
            .by_priority
            .entry(priority.clone())
            .or_default()
            .add(contribution);
    }
}

/// Fill in every historical category absent from this version.
///
/// The cumulative total is used, not a delta, so a category missing from
/// several consecutive versions adds its full history to each of them.
fn backfill(summary: &mut VersionSummary, history: &CategoryHistory) {
    for (category, totals) in history.iter() {
        if summary.by_category.contains_key(category) {
            continue;
        }

        let total = totals.total();
        trace!(
            "Backfilling {} in {} with {} passed / {} failed",
            category,
            summary.version,
            total.passed,
            total.failed
        );

        summary.abs_passed += total.passed;
        summary.abs_failed -= total.failed;
        summary.by_category.insert(category.to_string(), total);

        for (platform, breakdown) in totals.platforms() {
            summary
                .by_platform
                .entry(platform.to_string())
                .or_default()
                .add(breakdown);
        }

        for (priority, breakdown) in totals.priorities() {
            summary
                .by_priority
                .entry(priority.to_string())
                .or_default()
                .add(breakdown);
        }
    }
}

/// Percentages of the version total; left unset when the total is zero.
fn compute_relative(summary: &mut VersionSummary) {
    summary.relative = RelativeStats::from_counts(summary.abs_passed, summary.abs_failed.abs());
}
