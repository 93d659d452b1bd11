//! Read-only calculations over usage records

use std::collections::HashMap;

use super::types::{LatencyPercentiles, ModelUsage, UsageRecord, UsageSummary};

/// Derives summaries from records
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticsAggregator;

impl AnalyticsAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Sum of cost across records
    pub fn total_cost(&self, records: &[UsageRecord]) -> f64 {
        records.iter().map(|r| r.cost).sum()
    }

    /// Spend avoided compared with paying `baseline` for every record
    ///
    /// Never negative; 0.0 for no records or a non-positive baseline.
    pub fn calculate_savings(&self, records: &[UsageRecord], baseline: f64) -> f64 {
        if records.is_empty() || baseline <= 0.0 {
            return 0.0;
        }
        let hypothetical = baseline * records.len() as f64;
        (hypothetical - self.total_cost(records)).max(0.0)
    }

    /// Records bucketed by model id
    pub fn group_by_model<'a>(
        &self,
        records: &'a [UsageRecord],
    ) -> HashMap<&'a str, Vec<&'a UsageRecord>> {
        let mut grouped: HashMap<&str, Vec<&UsageRecord>> = HashMap::new();
        for record in records {
            grouped.entry(record.model_id.as_str()).or_default().push(record);
        }
        grouped
    }

    /// p50/p95/p99 latency with linear interpolation
    pub fn latency_percentiles(&self, records: &[UsageRecord]) -> LatencyPercentiles {
        let mut values: Vec<f64> = records.iter().map(|r| r.latency_ms as f64).collect();
        values.sort_by(f64::total_cmp);
        LatencyPercentiles {
            p50: percentile(&values, 0.50),
            p95: percentile(&values, 0.95),
            p99: percentile(&values, 0.99),
        }
    }

    /// Full summary of `records`
    pub fn summarize(&self, records: &[UsageRecord]) -> UsageSummary {
        let total_requests = records.len() as u64;
        let failed_requests = records.iter().filter(|r| !r.success).count() as u64;
        let (distinct_requests, succeeded_requests) = request_outcomes(records);

        let per_model = self
            .group_by_model(records)
            .into_iter()
            .map(|(model_id, group)| (model_id.to_string(), model_usage(&group)))
            .collect();

        UsageSummary {
            total_cost: self.total_cost(records),
            total_requests,
            failed_requests,
            success_rate: ratio(total_requests - failed_requests, total_requests),
            distinct_requests,
            request_success_rate: ratio(succeeded_requests, distinct_requests),
            avg_latency_ms: mean(records.iter().map(|r| r.latency_ms as f64), records.len()),
            total_tokens: records.iter().map(|r| r.tokens).sum(),
            latency: self.latency_percentiles(records),
            per_model,
        }
    }
}

fn model_usage(group: &[&UsageRecord]) -> ModelUsage {
    let requests = group.len() as u64;
    let failed_requests = group.iter().filter(|r| !r.success).count() as u64;
    ModelUsage {
        requests,
        failed_requests,
        total_cost: group.iter().map(|r| r.cost).sum(),
        total_tokens: group.iter().map(|r| r.tokens).sum(),
        avg_latency_ms: mean(group.iter().map(|r| r.latency_ms as f64), group.len()),
        success_rate: ratio(requests - failed_requests, requests),
    }
}

// (distinct requests, requests with a success); untagged records stand alone
fn request_outcomes(records: &[UsageRecord]) -> (u64, u64) {
    let mut tagged: HashMap<&str, bool> = HashMap::new();
    let mut untagged = 0u64;
    let mut untagged_successes = 0u64;
    for record in records {
        match record.request_id.as_deref() {
            Some(id) => *tagged.entry(id).or_default() |= record.success,
            None => {
                untagged += 1;
                untagged_successes += u64::from(record.success);
            }
        }
    }
    let tagged_successes = tagged.values().filter(|succeeded| **succeeded).count() as u64;
    (
        tagged.len() as u64 + untagged,
        tagged_successes + untagged_successes,
    )
}

fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

fn mean(values: impl Iterator<Item = f64>, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        values.sum::<f64>() / count as f64
    }
}

// `sorted` must be ascending
fn percentile(sorted: &[f64], quantile: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let index = (sorted.len() - 1) as f64 * quantile;
    let lower = index.floor() as usize;
    let upper = (lower + 1).min(sorted.len() - 1);
    let weight = index - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}
