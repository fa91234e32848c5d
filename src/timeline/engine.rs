//! Timeline engine tying record collection to the windowed reducer

use serde_json::Value;
use tracing::{debug, info};

use super::chart::{self, BreakdownChart, Series};
use super::collector::collect_raw;
use super::models::{Dimension, VersionSummary};
use super::reducer::reduce;
use crate::error::{Error, Result};

/// Default number of trailing versions kept in a timeline
pub const DEFAULT_WINDOW_SIZE: usize = 40;

/// Stateless engine; every call works on its own snapshot of documents
#[derive(Debug, Clone, Copy)]
pub struct TimelineEngine {
    window_size: usize,
}

impl Default for TimelineEngine {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE)
    }
}

impl TimelineEngine {
    pub fn new(window_size: usize) -> Self {
        Self { window_size }
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Same engine with a different window
    pub fn with_window_size(self, window_size: usize) -> Self {
        Self { window_size }
    }

    /// Build the windowed timeline from raw documents
    pub fn timeline(&self, documents: &[Value]) -> Result<Vec<VersionSummary>> {
        let groups = collect_raw(documents)?;
        let summaries = reduce(&groups, self.window_size);

        info!(
            "Built timeline of {} versions from {} documents",
            summaries.len(),
            documents.len()
        );

        Ok(summaries)
    }

    pub fn absolute_timeline(&self, documents: &[Value]) -> Result<Vec<Series<f64>>> {
        Ok(chart::absolute_timeline(&self.timeline(documents)?))
    }

    pub fn relative_timeline(&self, documents: &[Value]) -> Result<Vec<Series<Option<f64>>>> {
        Ok(chart::relative_timeline(&self.timeline(documents)?))
    }

    /// Drill-down for one version of the window
    pub fn breakdown(
        &self,
        documents: &[Value],
        version: &str,
        dimension: Dimension,
    ) -> Result<BreakdownChart> {
        let summaries = self.timeline(documents)?;
        let summary = summaries
            .iter()
            .find(|s| s.version == version)
            .ok_or_else(|| Error::NotFound(format!("version {version} is not in the timeline")))?;

        debug!("Breaking down {} by {}", version, dimension);
        Ok(chart::breakdown_chart(summary, dimension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn documents() -> Vec<Value> {
        vec![
            json!({
                "version": "1.0", "passed": 5, "failed": 1,
                "category": "core", "platform": "linux", "priority": "high"
            }),
            json!({
                "version": "1.1", "passed": 3, "failed": 0,
                "category": "net", "platform": "mac", "priority": "low"
            }),
        ]
    }

    #[test]
    fn test_default_window() {
        assert_eq!(TimelineEngine::default().window_size(), 40);
        assert_eq!(TimelineEngine::default().with_window_size(3).window_size(), 3);
    }

    #[test]
    fn test_timeline_from_documents() {
        let summaries = TimelineEngine::default().timeline(&documents()).unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[1].abs_passed, 8.0);
    }

    #[test]
    fn test_breakdown_includes_backfilled_platforms() {
        let chart = TimelineEngine::default()
            .breakdown(&documents(), "1.1", Dimension::Platform)
            .unwrap();
        assert_eq!(chart.keys().collect::<Vec<_>>(), vec!["Linux", "Mac"]);
    }

    #[test]
    fn test_breakdown_unknown_version() {
        let err = TimelineEngine::new(1)
            .breakdown(&documents(), "1.0", Dimension::Priority)
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_missing_version_propagates() {
        let err = TimelineEngine::default()
            .timeline(&[json!({"passed": 1, "failed": 0, "category": "core"})])
            .unwrap_err();
        assert!(matches!(err, Error::MissingVersion { index: 0 }));
    }
}
