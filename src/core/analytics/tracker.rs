//! Usage tracking
//!
//! Recording never fails the caller: store errors are logged and dropped.

use std::sync::Arc;
use tracing::{debug, warn};

use super::aggregator::AnalyticsAggregator;
use super::store::{InMemoryUsageStore, UsageStore};
use super::types::{TimeRange, UsageRecord, UsageSummary};
use crate::utils::error::Result;

/// Records attempts and answers summary queries
#[derive(Clone)]
pub struct UsageTracker {
    store: Arc<dyn UsageStore>,
    aggregator: AnalyticsAggregator,
    enabled: bool,
}

impl UsageTracker {
    /// Tracker over a custom store
    pub fn new(store: Arc<dyn UsageStore>) -> Self {
        Self {
            store,
            aggregator: AnalyticsAggregator::new(),
            enabled: true,
        }
    }

    /// Tracker over a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryUsageStore::new()))
    }

    /// Tracker that records nothing
    pub fn disabled() -> Self {
        Self::in_memory().with_enabled(false)
    }

    /// Toggle recording (builder pattern)
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Whether records are kept
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Append a record, swallowing store failures
    pub async fn record(&self, record: UsageRecord) {
        if !self.enabled {
            return;
        }
        let model_id = record.model_id.clone();
        match self.store.append(record).await {
            Ok(()) => debug!("Recorded usage for {}", model_id),
            Err(e) => warn!("Failed to record usage for {}: {}", model_id, e),
        }
    }

    /// Records in `range`, oldest first
    pub async fn records(&self, range: TimeRange) -> Result<Vec<UsageRecord>> {
        self.store.query(range).await
    }

    /// Records for one model in `range`
    pub async fn records_for_model(
        &self,
        model_id: &str,
        range: TimeRange,
    ) -> Result<Vec<UsageRecord>> {
        let mut records = self.store.query(range).await?;
        records.retain(|record| record.model_id == model_id);
        Ok(records)
    }

    /// Aggregate over `range`
    pub async fn summarize(&self, range: TimeRange) -> Result<UsageSummary> {
        let records = self.store.query(range).await?;
        Ok(self.aggregator.summarize(&records))
    }

    /// Spend avoided in `range` versus `baseline` per request
    pub async fn savings(&self, range: TimeRange, baseline: f64) -> Result<f64> {
        let records = self.store.query(range).await?;
        Ok(self.aggregator.calculate_savings(&records, baseline))
    }
}

impl Default for UsageTracker {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl std::fmt::Debug for UsageTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsageTracker")
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}
