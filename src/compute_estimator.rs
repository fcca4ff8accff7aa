//! Compute energy and emissions estimation
//!
//! Converts normalized vCPU-hours into watt-hours and CO2e using the
//! provider wattage constants and the regional emissions factor. When no
//! measured utilization ratio is available the provider's average CPU
//! utilization constant is substituted and the estimate is flagged, so
//! downstream consumers can tell measured from assumed utilization apart.

use crate::emissions::EmissionsFactorTable;
use crate::types::{FootprintEstimate, UsageRow};
use std::sync::Arc;
use tracing::debug;

/// Estimates energy and emissions for compute usage
pub struct ComputeEstimator {
    factors: Arc<EmissionsFactorTable>,
}

impl ComputeEstimator {
    /// Create a new ComputeEstimator over an emissions factor table
    pub fn new(factors: Arc<EmissionsFactorTable>) -> Self {
        Self { factors }
    }

    /// Estimate a compute usage row
    ///
    /// `usage_ratio` is a measured CPU utilization in 0..1 when the caller
    /// has one; billing exports normally do not carry it, in which case the
    /// provider average is substituted and `uses_average_cpu_constant` is set
    /// on the result. All arithmetic is double precision with no rounding;
    /// rounding belongs to presentation.
    pub fn estimate(
        &self,
        row: &UsageRow,
        vcpu_hours: f64,
        usage_ratio: Option<f64>,
    ) -> FootprintEstimate {
        let factor = self.factors.factor_for(&row.region);
        let wattage = self.factors.wattage();

        let uses_average_cpu_constant = usage_ratio.is_none();
        let ratio = usage_ratio.unwrap_or(factor.average_cpu_utilization);

        let watts_per_vcpu = wattage.min_watts_per_vcpu
            + ratio * (wattage.max_watts_per_vcpu - wattage.min_watts_per_vcpu);
        let watt_hours = vcpu_hours * watts_per_vcpu * factor.power_usage_effectiveness;
        let co2e = watt_hours / 1000.0 * factor.co2e_per_kilowatt_hour;

        debug!(
            "Compute estimate: {:.4} Wh, {:.6} kg CO2e for {:.4} vCPU-hours in {}",
            watt_hours, co2e, vcpu_hours, row.region
        );

        FootprintEstimate {
            watt_hours,
            co2e,
            uses_average_cpu_constant,
            cloud_provider: self.factors.provider(),
            account_name: row.account_name.clone(),
            service_name: row.service_name.clone(),
            cost: row.cost,
            region: row.region.clone(),
        }
    }
}
