//! Common test utilities and helpers

#![allow(dead_code)]

use anyhow::Result;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test context builder for setting up test environments
pub struct TestContextBuilder {
    temp_dir: TempDir,
    documents: Vec<Value>,
    config: Option<String>,
    initial_files: Vec<(PathBuf, String)>,
}

impl TestContextBuilder {
    /// Create a new test context builder
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
            documents: Vec::new(),
            config: None,
            initial_files: Vec::new(),
        })
    }

    /// Add raw test-run documents written to `records.json`
    pub fn with_documents(mut self, documents: Vec<Value>) -> Self {
        self.documents.extend(documents);
        self
    }

    /// Write a `runboard.toml` with the given content
    pub fn with_config(mut self, content: &str) -> Self {
        self.config = Some(content.to_string());
        self
    }

    /// Add an initial file
    pub fn with_file(mut self, path: impl AsRef<Path>, content: &str) -> Self {
        self.initial_files
            .push((path.as_ref().to_path_buf(), content.to_string()));
        self
    }

    /// Build the test context
    pub fn build(self) -> Result<TestContext> {
        let path = self.temp_dir.path();

        fs::write(
            path.join("records.json"),
            serde_json::to_string_pretty(&self.documents)?,
        )?;

        if let Some(config) = self.config {
            fs::write(path.join("runboard.toml"), config)?;
        }

        for (file_path, content) in self.initial_files {
            let full_path = path.join(file_path);
            if let Some(parent) = full_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(full_path, content)?;
        }

        Ok(TestContext {
            temp_dir: self.temp_dir,
        })
    }
}

/// Test context that manages temporary directories and cleanup
pub struct TestContext {
    temp_dir: TempDir,
}

impl TestContext {
    /// Get the path to the test directory
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn records_path(&self) -> PathBuf {
        self.path().join("records.json")
    }
}

/// Canonical document
pub fn run(
    version: &str,
    passed: u64,
    failed: u64,
    category: &str,
    platform: &str,
    priority: &str,
) -> Value {
    json!({
        "version": version,
        "passed": passed,
        "failed": failed,
        "category": category,
        "platform": platform,
        "priority": priority,
    })
}

/// Three builds of release 2.0.0 plus one build of another release.
///
/// `VIEW` only runs in the first build and `XDCR` only in the last, and
/// `2.0.0-10` sorts before `2.0.0-9`.
pub fn release_documents() -> Vec<Value> {
    vec![
        run("2.0.0-10", 40, 2, "KV", "CENTOS", "P0"),
        run("2.0.0-10", 8, 0, "VIEW", "N/A", "P1"),
        run("2.0.0-11", 45, 0, "KV", "CENTOS", "P0"),
        run("2.0.0-11", 5, 5, "KV", "WIN", "N/A"),
        run("2.0.0-9", 30, 10, "KV", "CENTOS", "P0"),
        run("2.0.0-9", 10, 0, "XDCR", "UBUNTU", "P1"),
        run("2.5.0-1", 1, 1, "KV", "CENTOS", "P0"),
    ]
}
