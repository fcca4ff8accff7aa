//! Estimate accumulation into time-bucketed results
//!
//! Folds per-row estimates into an ordered sequence of bucketed results.
//! Bucket lookup is by value equality of the truncated timestamp (plus the
//! optional secondary grouping key), never by reference. New buckets are
//! inserted at the position they are discovered during the input scan, so
//! the output sequence is in discovery order, not chronological order;
//! callers that need a sorted series apply [`sort_chronologically`] as an
//! explicit post-processing step.
//!
//! Accumulation appends, it does not deduplicate: folding the same estimate
//! twice produces two entries in the bucket. Given the same rows in the same
//! order, repeated runs produce an identical output sequence.

use crate::types::{EstimationResult, FootprintEstimate, TimeGranularity};
use chrono::NaiveDate;

/// Fold one estimate into the running bucketed sequence
///
/// `date` is the source row's timestamp; it is truncated to the bucket start
/// for the requested granularity. Estimates for an existing
/// `(bucket, group)` key are appended to that bucket's list; otherwise a new
/// result with a singleton list is pushed at the end of the sequence.
pub fn accumulate(
    results: &mut Vec<EstimationResult>,
    date: NaiveDate,
    group: Option<String>,
    estimate: FootprintEstimate,
    granularity: TimeGranularity,
) {
    let bucket = granularity.truncate(date);

    if let Some(existing) = results
        .iter_mut()
        .find(|r| r.timestamp == bucket && r.group == group)
    {
        existing.service_estimates.push(estimate);
    } else {
        results.push(EstimationResult {
            timestamp: bucket,
            group,
            service_estimates: vec![estimate],
        });
    }
}

/// Sort a result sequence by bucket start, then by grouping key
///
/// The accumulator itself preserves discovery order; chronological ordering
/// is an explicit caller decision.
pub fn sort_chronologically(results: &mut [EstimationResult]) {
    results.sort_by(|a, b| {
        a.timestamp
            .cmp(&b.timestamp)
            .then_with(|| a.group.cmp(&b.group))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CloudProvider, Region};

    fn estimate(service: &str, watt_hours: f64) -> FootprintEstimate {
        FootprintEstimate {
            watt_hours,
            co2e: watt_hours / 1000.0 * 0.4,
            uses_average_cpu_constant: true,
            cloud_provider: CloudProvider::Gcp,
            account_name: "acct".to_string(),
            service_name: service.to_string(),
            cost: 1.0,
            region: Region::new("us-east1"),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_same_bucket_appends() {
        let mut results = Vec::new();
        accumulate(
            &mut results,
            date(2024, 1, 15),
            None,
            estimate("App Engine", 1.0),
            TimeGranularity::Day,
        );
        accumulate(
            &mut results,
            date(2024, 1, 15),
            None,
            estimate("Cloud SQL", 2.0),
            TimeGranularity::Day,
        );

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].timestamp, date(2024, 1, 15));
        assert_eq!(results[0].service_estimates.len(), 2);
        // Arrival order preserved inside the bucket
        assert_eq!(results[0].service_estimates[0].service_name, "App Engine");
        assert_eq!(results[0].service_estimates[1].service_name, "Cloud SQL");
    }

    #[test]
    fn test_duplicate_estimate_is_not_deduplicated() {
        let mut results = Vec::new();
        for _ in 0..2 {
            accumulate(
                &mut results,
                date(2024, 1, 15),
                None,
                estimate("App Engine", 1.0),
                TimeGranularity::Day,
            );
        }

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].service_estimates.len(), 2);
    }

    #[test]
    fn test_month_truncation_merges_days() {
        let mut results = Vec::new();
        accumulate(
            &mut results,
            date(2024, 1, 3),
            None,
            estimate("a", 1.0),
            TimeGranularity::Month,
        );
        accumulate(
            &mut results,
            date(2024, 1, 28),
            None,
            estimate("b", 2.0),
            TimeGranularity::Month,
        );

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].timestamp, date(2024, 1, 1));
        assert_eq!(results[0].service_estimates.len(), 2);
    }

    #[test]
    fn test_discovery_order_is_preserved() {
        // Out-of-order input: later date arrives first
        let mut results = Vec::new();
        accumulate(
            &mut results,
            date(2024, 2, 10),
            None,
            estimate("a", 1.0),
            TimeGranularity::Day,
        );
        accumulate(
            &mut results,
            date(2024, 1, 5),
            None,
            estimate("b", 2.0),
            TimeGranularity::Day,
        );
        accumulate(
            &mut results,
            date(2024, 2, 10),
            None,
            estimate("c", 3.0),
            TimeGranularity::Day,
        );

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].timestamp, date(2024, 2, 10));
        assert_eq!(results[1].timestamp, date(2024, 1, 5));
        assert_eq!(results[0].service_estimates.len(), 2);

        sort_chronologically(&mut results);
        assert_eq!(results[0].timestamp, date(2024, 1, 5));
        assert_eq!(results[1].timestamp, date(2024, 2, 10));
    }

    #[test]
    fn test_group_key_splits_buckets() {
        let mut results = Vec::new();
        accumulate(
            &mut results,
            date(2024, 1, 15),
            Some("App Engine".to_string()),
            estimate("App Engine", 1.0),
            TimeGranularity::Day,
        );
        accumulate(
            &mut results,
            date(2024, 1, 15),
            Some("Cloud SQL".to_string()),
            estimate("Cloud SQL", 2.0),
            TimeGranularity::Day,
        );

        // Same day, different group keys: two results
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].group.as_deref(), Some("App Engine"));
        assert_eq!(results[1].group.as_deref(), Some("Cloud SQL"));
    }

    #[test]
    fn test_week_bucket_spans_days() {
        let mut results = Vec::new();
        // Wed 2024-01-10 and Fri 2024-01-12 share the week of Mon 2024-01-08
        accumulate(
            &mut results,
            date(2024, 1, 10),
            None,
            estimate("a", 1.0),
            TimeGranularity::Week,
        );
        accumulate(
            &mut results,
            date(2024, 1, 12),
            None,
            estimate("b", 2.0),
            TimeGranularity::Week,
        );

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].timestamp, date(2024, 1, 8));
    }
}
