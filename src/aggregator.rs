//! Billing export aggregation
//!
//! The aggregator ties the pipeline together: it submits a usage query to
//! the data source, retrieves the result rows, classifies each row, runs
//! the matching estimator and folds the estimates into time-bucketed
//! results. The two upstream steps fail independently and are reported as
//! distinct error kinds so callers can tell a submission failure from a
//! retrieval failure end to end.

use crate::accumulator::accumulate;
use crate::classifier::{self, UsageClassification};
use crate::compute_estimator::ComputeEstimator;
use crate::emissions::EmissionsFactorTable;
use crate::error::{CarbonError, Result};
use crate::source::UsageDataSource;
use crate::storage_estimator::StorageEstimator;
use crate::types::{DateRange, EstimationResult, GroupDimension, TimeGranularity, UsageRow};
use futures::stream::{Stream, StreamExt};
use std::sync::Arc;
use tracing::{debug, info};

/// Counters describing one aggregation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationStats {
    /// Rows returned by the data source
    pub rows_seen: u64,
    /// Rows silently dropped as unclassifiable
    pub rows_dropped: u64,
}

/// Aggregates billing export rows into footprint estimates
pub struct BillingExportAggregator {
    data_source: Arc<dyn UsageDataSource>,
    compute: ComputeEstimator,
    ssd_storage: StorageEstimator,
    hdd_storage: StorageEstimator,
}

impl BillingExportAggregator {
    /// Create an aggregator over a data source and emissions factor table
    pub fn new(data_source: Arc<dyn UsageDataSource>, factors: Arc<EmissionsFactorTable>) -> Self {
        Self {
            data_source,
            compute: ComputeEstimator::new(factors.clone()),
            ssd_storage: StorageEstimator::ssd(factors.clone()),
            hdd_storage: StorageEstimator::hdd(factors),
        }
    }

    /// Fetch usage for the range and fold it into bucketed estimates
    pub async fn get_estimates(
        &self,
        range: DateRange,
        granularity: TimeGranularity,
        group_by: Option<GroupDimension>,
    ) -> Result<Vec<EstimationResult>> {
        let (results, _) = self
            .get_estimates_with_stats(range, granularity, group_by)
            .await?;
        Ok(results)
    }

    /// Like [`get_estimates`](Self::get_estimates), also reporting run counters
    pub async fn get_estimates_with_stats(
        &self,
        range: DateRange,
        granularity: TimeGranularity,
        group_by: Option<GroupDimension>,
    ) -> Result<(Vec<EstimationResult>, AggregationStats)> {
        if range.start > range.end {
            return Err(CarbonError::InvalidRequest(format!(
                "start date {} is after end date {}",
                range.start, range.end
            )));
        }

        debug!("Submitting usage query for {}", range);
        let job = self
            .data_source
            .submit_query(&range)
            .await
            .map_err(|e| CarbonError::QueryJobSubmission {
                reason: e.reason,
                location: e.location,
                message: e.message,
            })?;

        let result_set = job
            .results()
            .await
            .map_err(|e| CarbonError::QueryResultRetrieval {
                reason: e.reason,
                domain: e.domain,
                message: e.message,
            })?;

        if let Some(covered) = result_set.covered {
            if !covered.covers(&range) {
                return Err(CarbonError::PartialData(format!(
                    "requested {} but data only covers {}",
                    range, covered
                )));
            }
        }

        let (results, stats) = self
            .fold_rows(futures::stream::iter(result_set.rows), granularity, group_by)
            .await;

        info!(
            "Aggregated {} rows into {} result buckets ({} dropped)",
            stats.rows_seen,
            results.len(),
            stats.rows_dropped
        );
        Ok((results, stats))
    }

    /// Classify, estimate and accumulate a stream of usage rows
    async fn fold_rows(
        &self,
        rows: impl Stream<Item = UsageRow>,
        granularity: TimeGranularity,
        group_by: Option<GroupDimension>,
    ) -> (Vec<EstimationResult>, AggregationStats) {
        let mut results: Vec<EstimationResult> = Vec::new();
        let mut stats = AggregationStats::default();

        tokio::pin!(rows);
        while let Some(row) = rows.next().await {
            stats.rows_seen += 1;

            // Billing exports carry no measured utilization, so compute
            // estimates on this path always use the average CPU constant.
            let estimate = match classifier::classify(&row) {
                UsageClassification::Compute { vcpu_hours } => {
                    self.compute.estimate(&row, vcpu_hours, None)
                }
                UsageClassification::SsdStorage { terabyte_hours } => {
                    self.ssd_storage.estimate(&row, terabyte_hours)
                }
                UsageClassification::HddStorage { terabyte_hours } => {
                    self.hdd_storage.estimate(&row, terabyte_hours)
                }
                UsageClassification::Unclassified => {
                    stats.rows_dropped += 1;
                    debug!(
                        "Dropping unclassifiable row: type='{}' unit='{}'",
                        row.usage_type, row.usage_unit
                    );
                    continue;
                }
            };

            let group = group_by.map(|dimension| dimension.key_for(&estimate));
            accumulate(&mut results, row.timestamp, group, estimate, granularity);
        }

        (results, stats)
    }
}
