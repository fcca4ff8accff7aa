//! Storage energy and emissions estimation
//!
//! Converts normalized terabyte-hours into watt-hours and CO2e. Two
//! estimator instances exist side by side, one per media coefficient,
//! because SSD-backed and HDD-backed services draw different power per
//! terabyte; the classifier picks which instance a row goes to.

use crate::emissions::EmissionsFactorTable;
use crate::types::{FootprintEstimate, UsageRow};
use std::sync::Arc;
use tracing::debug;

/// Storage media backing a usage row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMedia {
    Ssd,
    Hdd,
}

/// Estimates energy and emissions for storage usage
pub struct StorageEstimator {
    factors: Arc<EmissionsFactorTable>,
    media: StorageMedia,
    /// Watt-hours per terabyte-hour for this media type
    coefficient: f64,
}

impl StorageEstimator {
    /// Create an estimator for solid-state storage
    pub fn ssd(factors: Arc<EmissionsFactorTable>) -> Self {
        let coefficient = factors.wattage().ssd_coefficient;
        Self {
            factors,
            media: StorageMedia::Ssd,
            coefficient,
        }
    }

    /// Create an estimator for spinning-disk storage
    pub fn hdd(factors: Arc<EmissionsFactorTable>) -> Self {
        let coefficient = factors.wattage().hdd_coefficient;
        Self {
            factors,
            media: StorageMedia::Hdd,
            coefficient,
        }
    }

    /// Estimate a storage usage row
    ///
    /// `watt_hours = terabyte_hours * coefficient * PUE`, then
    /// `co2e = watt_hours / 1000 * regional grid intensity`. Storage
    /// estimates never substitute a CPU constant, so the flag is always
    /// false here.
    pub fn estimate(&self, row: &UsageRow, terabyte_hours: f64) -> FootprintEstimate {
        let factor = self.factors.factor_for(&row.region);

        let watt_hours = terabyte_hours * self.coefficient * factor.power_usage_effectiveness;
        let co2e = watt_hours / 1000.0 * factor.co2e_per_kilowatt_hour;

        debug!(
            "{:?} storage estimate: {:.4} Wh, {:.6} kg CO2e for {:.4} TB-hours in {}",
            self.media, watt_hours, co2e, terabyte_hours, row.region
        );

        FootprintEstimate {
            watt_hours,
            co2e,
            uses_average_cpu_constant: false,
            cloud_provider: self.factors.provider(),
            account_name: row.account_name.clone(),
            service_name: row.service_name.clone(),
            cost: row.cost,
            region: row.region.clone(),
        }
    }
}
