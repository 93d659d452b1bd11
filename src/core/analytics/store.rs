//! Usage record storage

use async_trait::async_trait;
use parking_lot::RwLock;

use super::types::{TimeRange, UsageRecord};
use crate::utils::error::Result;

/// Append-only sink for usage records
///
/// Implementations must accept concurrent appends and never expose a
/// partially written record to `query`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsageStore: Send + Sync {
    /// Persist one record
    async fn append(&self, record: UsageRecord) -> Result<()>;

    /// Records whose timestamp falls in `range`, oldest first
    async fn query(&self, range: TimeRange) -> Result<Vec<UsageRecord>>;
}

/// Process-local store
///
/// A query clones a snapshot under the read lock, so it sees every append
/// that completed before it started.
#[derive(Debug, Default)]
pub struct InMemoryUsageStore {
    records: RwLock<Vec<UsageRecord>>,
}

impl InMemoryUsageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// True when nothing is stored
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl UsageStore for InMemoryUsageStore {
    async fn append(&self, record: UsageRecord) -> Result<()> {
        self.records.write().push(record);
        Ok(())
    }

    async fn query(&self, range: TimeRange) -> Result<Vec<UsageRecord>> {
        let mut records: Vec<UsageRecord> = self
            .records
            .read()
            .iter()
            .filter(|record| range.contains(record.timestamp))
            .cloned()
            .collect();
        records.sort_by_key(|record| record.timestamp);
        Ok(records)
    }
}
