//! Usage analytics
//!
//! Every terminal attempt becomes a [`UsageRecord`] appended through the
//! [`UsageTracker`]; summaries are computed on demand from a snapshot.

mod aggregator;
mod store;
mod tracker;
mod types;


pub use aggregator::AnalyticsAggregator;
#[cfg(test)]
pub use store::MockUsageStore;
pub use store::{InMemoryUsageStore, UsageStore};
pub use tracker::UsageTracker;
pub use types::{LatencyPercentiles, ModelUsage, TimeRange, UsageRecord, UsageSummary};
