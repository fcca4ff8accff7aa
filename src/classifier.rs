//! Usage row classification
//!
//! Inspects a raw billing row and decides which estimator applies, converting
//! the raw usage amount into the normalized quantity that estimator needs
//! (vCPU-hours for compute, terabyte-hours for storage).
//!
//! Classification is a fixed-rule lookup against known provider usage-type
//! vocabularies. RAM usage types are explicitly excluded: RAM draws power but
//! the engine deliberately does not model it. Rows that match no rule
//! classify as `Unclassified` and are dropped by the aggregator; partial
//! billing taxonomies are common and must never abort a batch.

use crate::types::UsageRow;

/// Closed classification result for a usage row
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UsageClassification {
    /// Compute usage, normalized to vCPU-hours
    Compute { vcpu_hours: f64 },
    /// Solid-state storage usage, normalized to terabyte-hours
    SsdStorage { terabyte_hours: f64 },
    /// Spinning-disk storage usage, normalized to terabyte-hours
    HddStorage { terabyte_hours: f64 },
    /// No estimator applies; the row contributes nothing
    Unclassified,
}

/// Usage types excluded from estimation even when their unit looks usable
const RAM_USAGE_KEYWORDS: &[&str] = &["RAM", "Ram", "Memory"];

/// Usage types recognized as compute
const COMPUTE_USAGE_KEYWORDS: &[&str] = &[
    "Instance Core",
    "Core running",
    "vCPU",
    "CPU",
    "Compute",
    "Frontend Instances",
    "Backend Instances",
];

/// Usage types recognized as solid-state storage
const SSD_USAGE_KEYWORDS: &[&str] = &["SSD", "Solid State", "Datastore Storage"];

/// Usage types recognized as spinning-disk storage
const HDD_USAGE_KEYWORDS: &[&str] = &["PD Capacity", "HDD", "Disk", "Storage"];

const SECONDS_PER_HOUR: f64 = 3600.0;
const TERABYTES_PER_GIBIBYTE: f64 = 1.073_741_824e-3;
const BYTES_PER_TERABYTE: f64 = 1e12;
/// Average hours in a month, used for capacity-per-month billing units
const HOURS_PER_MONTH: f64 = 730.0;

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| haystack.contains(k))
}

/// Normalize a compute usage amount to vCPU-hours, if the unit is recognized
fn vcpu_hours(amount: f64, unit: &str) -> Option<f64> {
    match unit.to_lowercase().as_str() {
        "seconds" => Some(amount / SECONDS_PER_HOUR),
        "hour" | "hours" | "vcpu-hours" => Some(amount),
        _ => None,
    }
}

/// Normalize a storage usage amount to terabyte-hours, if the unit is recognized
fn terabyte_hours(amount: f64, unit: &str) -> Option<f64> {
    match unit.to_lowercase().as_str() {
        "byte-seconds" => Some(amount / BYTES_PER_TERABYTE / SECONDS_PER_HOUR),
        "gibibyte hour" | "gibibyte hours" => Some(amount * TERABYTES_PER_GIBIBYTE),
        "gibibyte month" => Some(amount * TERABYTES_PER_GIBIBYTE * HOURS_PER_MONTH),
        "terabyte hours" => Some(amount),
        _ => None,
    }
}

/// Classify a usage row and extract the quantity its estimator needs
///
/// Unit matching is exact (after lowercasing); usage-type matching is a
/// keyword lookup. Storage units are checked before compute units, so a
/// `byte-seconds` row can never be mistaken for processor time.
pub fn classify(row: &UsageRow) -> UsageClassification {
    if contains_any(&row.usage_type, RAM_USAGE_KEYWORDS) {
        return UsageClassification::Unclassified;
    }

    if let Some(terabyte_hours) = terabyte_hours(row.usage_amount, &row.usage_unit) {
        if contains_any(&row.usage_type, SSD_USAGE_KEYWORDS) {
            return UsageClassification::SsdStorage { terabyte_hours };
        }
        if contains_any(&row.usage_type, HDD_USAGE_KEYWORDS) {
            return UsageClassification::HddStorage { terabyte_hours };
        }
        return UsageClassification::Unclassified;
    }

    if let Some(vcpu_hours) = vcpu_hours(row.usage_amount, &row.usage_unit) {
        if contains_any(&row.usage_type, COMPUTE_USAGE_KEYWORDS) {
            return UsageClassification::Compute { vcpu_hours };
        }
    }

    UsageClassification::Unclassified
}
