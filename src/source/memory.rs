//! In-memory record source for tests and embedding

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{matches_release, RecordSource};
use crate::error::Result;

/// In-memory record source
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: Arc<RwLock<Vec<Value>>>,
}

impl MemorySource {
    pub fn new(documents: Vec<Value>) -> Self {
        Self {
            documents: Arc::new(RwLock::new(documents)),
        }
    }

    pub async fn push(&self, document: Value) {
        self.documents.write().await.push(document);
    }
}

#[async_trait]
impl RecordSource for MemorySource {
    async fn fetch(&self, release: &str) -> Result<Vec<Value>> {
        let documents = self.documents.read().await;
        Ok(documents
            .iter()
            .filter(|doc| matches_release(doc, release))
            .cloned()
            .collect())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
