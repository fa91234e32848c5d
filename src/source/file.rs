//! JSON file record source

use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use super::{matches_release, RecordSource};
use crate::error::{Error, Result};

/// Reads documents from a JSON array file or a JSON-lines file
///
/// The file is re-read on every fetch so each request sees a fresh snapshot.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordSource for JsonFileSource {
    async fn fetch(&self, release: &str) -> Result<Vec<Value>> {
        let content = fs::read_to_string(&self.path).await.map_err(|e| {
            Error::Source(format!("failed to read {}: {}", self.path.display(), e))
        })?;

        let documents: Vec<Value> = parse_documents(&content)?
            .into_iter()
            .filter(|doc| matches_release(doc, release))
            .collect();

        debug!(
            "Loaded {} documents for release '{}' from {}",
            documents.len(),
            release,
            self.path.display()
        );

        Ok(documents)
    }

    fn name(&self) -> &str {
        "json-file"
    }
}

/// Parse a JSON array, or one JSON document per non-blank line
pub fn parse_documents(content: &str) -> Result<Vec<Value>> {
    let trimmed = content.trim_start();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if trimmed.starts_with('[') {
        return Ok(serde_json::from_str(trimmed)?);
    }

    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(Error::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_array_and_lines() {
        let array = parse_documents(r#"[{"version": "1"}, {"version": "2"}]"#).unwrap();
        assert_eq!(array.len(), 2);

        let lines = parse_documents("{\"version\": \"1\"}\n\n{\"version\": \"2\"}\n").unwrap();
        assert_eq!(lines.len(), 2);

        assert!(parse_documents("  \n").unwrap().is_empty());
        assert!(parse_documents("{not json").is_err());
    }

    #[tokio::test]
    async fn test_fetch_filters_by_release() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"[{{"version": "2.0.0-1", "passed": 1, "failed": 0, "category": "a"}},
                {{"version": "2.5.0-1", "passed": 1, "failed": 0, "category": "a"}}]"#
        )
        .unwrap();

        let source = JsonFileSource::new(file.path());
        assert_eq!(source.fetch("").await.unwrap().len(), 2);
        assert_eq!(source.fetch("2.5").await.unwrap().len(), 1);
        assert_eq!(source.name(), "json-file");
    }

    #[tokio::test]
    async fn test_missing_file_is_a_source_error() {
        let source = JsonFileSource::new("/nonexistent/records.json");
        let err = source.fetch("").await.unwrap_err();
        assert!(matches!(err, Error::Source(_)));
    }
}
