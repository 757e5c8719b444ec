//! In-process history store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::contract::{AnalysisRecord, AnalysisSummary};
use crate::error::StorageError;
use crate::traits::HistoryStore;

/// History kept in memory, lost on restart.
///
/// Records are kept newest first. Appends take the write lock, so
/// concurrent appends are serialized and readers never see a partial entry.
#[derive(Debug, Default)]
pub struct InMemoryHistory {
    records: RwLock<Vec<AnalysisRecord>>,
}

impl InMemoryHistory {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// True when no records are stored.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistory {
    async fn append(&self, record: &AnalysisRecord) -> Result<(), StorageError> {
        let mut records = self.records.write().await;
        // first slot not strictly newer, so equal dates put the later append first
        let at = records.partition_point(|r| r.summary.date > record.summary.date);
        records.insert(at, record.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<AnalysisSummary>, StorageError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .map(|r| r.summary.clone())
            .collect())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<AnalysisSummary>, StorageError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .take(limit)
            .map(|r| r.summary.clone())
            .collect())
    }

    async fn get(&self, id: &str) -> Result<Option<AnalysisRecord>, StorageError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .find(|r| r.summary.id == id)
            .cloned())
    }

    async fn clear(&self) -> Result<u64, StorageError> {
        let mut records = self.records.write().await;
        let removed = records.len() as u64;
        records.clear();
        Ok(removed)
    }

    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
