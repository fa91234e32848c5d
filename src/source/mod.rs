//! Record sources feeding the timeline engine
//!
//! A source hands back every raw test-run document belonging to a release.
//! Order does not matter; the engine sorts by version itself.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::timeline::collector::document_version;

pub mod file;
pub mod memory;

pub use file::JsonFileSource;
pub use memory::MemorySource;

#[async_trait]
pub trait RecordSource: Send + Sync {
    /// All documents whose version label starts with `release`
    async fn fetch(&self, release: &str) -> Result<Vec<Value>>;

    fn name(&self) -> &str;
}

/// Release filter shared by sources without server-side filtering
///
/// Documents lacking a version label are kept so that the engine can report
/// them instead of having them vanish silently.
pub fn matches_release(document: &Value, release: &str) -> bool {
    release.is_empty()
        || document_version(document)
            .map(|version| version.starts_with(release))
            .unwrap_or(true)
}
