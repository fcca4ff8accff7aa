//! Emissions factor reference data
//!
//! Static mapping from region identifier to a grid carbon intensity
//! (kg CO2e per kWh) plus the power usage effectiveness and average CPU
//! utilization constants for the owning cloud provider. The table is built
//! once at process start and passed by `Arc` into the estimators; it is
//! never mutated afterward.
//!
//! Unknown regions are expected in production billing data (retired or
//! mis-tagged codes), so lookups never fail: `factor_for` returns the
//! provider-wide average entry instead.

use crate::types::{CloudProvider, Region};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Emissions and facility constants applicable to one region
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmissionsFactor {
    /// Grid carbon intensity in kg CO2e per kilowatt-hour
    pub co2e_per_kilowatt_hour: f64,
    /// Facility power draw relative to IT-equipment power draw
    pub power_usage_effectiveness: f64,
    /// Assumed CPU utilization when no measured ratio is available, 0..1
    pub average_cpu_utilization: f64,
}

/// Per-provider wattage constants used by the estimators
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WattageConstants {
    /// Idle draw per virtual CPU, watts
    pub min_watts_per_vcpu: f64,
    /// Full-load draw per virtual CPU, watts
    pub max_watts_per_vcpu: f64,
    /// Solid-state storage draw, watt-hours per terabyte-hour
    pub ssd_coefficient: f64,
    /// Spinning-disk storage draw, watt-hours per terabyte-hour
    pub hdd_coefficient: f64,
}

/// One row of the factor listing exposed to the API and CLI
#[derive(Debug, Clone, Serialize)]
pub struct RegionFactor {
    pub region: Region,
    #[serde(flatten)]
    pub factor: EmissionsFactor,
}

// Provider facility and wattage constants follow the published Cloud Carbon
// Footprint methodology (SPECpower-derived watt figures, provider-reported
// fleet PUE, 50% assumed utilization).
const GCP_WATTAGE: WattageConstants = WattageConstants {
    min_watts_per_vcpu: 0.71,
    max_watts_per_vcpu: 4.26,
    ssd_coefficient: 1.2,
    hdd_coefficient: 0.65,
};

const AWS_WATTAGE: WattageConstants = WattageConstants {
    min_watts_per_vcpu: 0.74,
    max_watts_per_vcpu: 3.5,
    ssd_coefficient: 1.2,
    hdd_coefficient: 0.65,
};

const AZURE_WATTAGE: WattageConstants = WattageConstants {
    min_watts_per_vcpu: 0.78,
    max_watts_per_vcpu: 3.76,
    ssd_coefficient: 1.2,
    hdd_coefficient: 0.65,
};

const GCP_PUE: f64 = 1.1;
const AWS_PUE: f64 = 1.135;
const AZURE_PUE: f64 = 1.185;

const AVERAGE_CPU_UTILIZATION: f64 = 0.5;

/// Grid intensity per region, kg CO2e per kWh
const GCP_REGION_FACTORS: &[(&str, f64)] = &[
    ("us-central1", 0.479),
    ("us-east1", 0.5),
    ("us-east4", 0.383),
    ("us-west1", 0.117),
    ("us-west2", 0.248),
    ("europe-west1", 0.181),
    ("europe-west2", 0.238),
    ("europe-west3", 0.299),
    ("europe-north1", 0.086),
    ("asia-east1", 0.541),
    ("asia-northeast1", 0.554),
    ("asia-southeast1", 0.493),
    ("australia-southeast1", 0.76),
    ("southamerica-east1", 0.074),
];

const AWS_REGION_FACTORS: &[(&str, f64)] = &[
    ("us-east-1", 0.415),
    ("us-east-2", 0.44),
    ("us-west-1", 0.285),
    ("us-west-2", 0.117),
    ("eu-west-1", 0.316),
    ("eu-central-1", 0.338),
    ("ap-southeast-1", 0.493),
    ("ap-southeast-2", 0.76),
    ("ap-northeast-1", 0.506),
    ("sa-east-1", 0.074),
];

const AZURE_REGION_FACTORS: &[(&str, f64)] = &[
    ("eastus", 0.415),
    ("westus", 0.285),
    ("centralus", 0.479),
    ("northeurope", 0.316),
    ("westeurope", 0.39),
    ("southeastasia", 0.493),
    ("australiaeast", 0.76),
];

/// Provider-wide average grid intensity, used when a region is unknown
const GCP_AVERAGE_CO2E: f64 = 0.429;
const AWS_AVERAGE_CO2E: f64 = 0.385;
const AZURE_AVERAGE_CO2E: f64 = 0.377;

/// Immutable emissions factor lookup table for one cloud provider
pub struct EmissionsFactorTable {
    provider: CloudProvider,
    regions: HashMap<Region, EmissionsFactor>,
    provider_average: EmissionsFactor,
    wattage: WattageConstants,
}

impl EmissionsFactorTable {
    /// Build the table from the built-in constants for a provider
    pub fn builtin(provider: CloudProvider) -> Self {
        let (region_factors, wattage, pue, average_co2e) = match provider {
            CloudProvider::Gcp => (GCP_REGION_FACTORS, GCP_WATTAGE, GCP_PUE, GCP_AVERAGE_CO2E),
            CloudProvider::Aws => (AWS_REGION_FACTORS, AWS_WATTAGE, AWS_PUE, AWS_AVERAGE_CO2E),
            CloudProvider::Azure => (
                AZURE_REGION_FACTORS,
                AZURE_WATTAGE,
                AZURE_PUE,
                AZURE_AVERAGE_CO2E,
            ),
        };

        let regions = region_factors
            .iter()
            .map(|(name, co2e)| {
                (
                    Region::new(*name),
                    EmissionsFactor {
                        co2e_per_kilowatt_hour: *co2e,
                        power_usage_effectiveness: pue,
                        average_cpu_utilization: AVERAGE_CPU_UTILIZATION,
                    },
                )
            })
            .collect();

        Self {
            provider,
            regions,
            provider_average: EmissionsFactor {
                co2e_per_kilowatt_hour: average_co2e,
                power_usage_effectiveness: pue,
                average_cpu_utilization: AVERAGE_CPU_UTILIZATION,
            },
            wattage,
        }
    }

    /// The provider this table describes
    pub fn provider(&self) -> CloudProvider {
        self.provider
    }

    /// Look up the factor for a region, falling back to the provider average
    ///
    /// Never fails: an unknown region resolves to the provider-wide average
    /// entry so that one retired region code cannot abort a whole batch.
    pub fn factor_for(&self, region: &Region) -> &EmissionsFactor {
        match self.regions.get(region) {
            Some(factor) => factor,
            None => {
                debug!(
                    "No emissions factor for region {}, using {} average",
                    region, self.provider
                );
                &self.provider_average
            }
        }
    }

    /// Wattage constants for this provider
    pub fn wattage(&self) -> &WattageConstants {
        &self.wattage
    }

    /// Provider-wide average factor
    pub fn provider_average(&self) -> &EmissionsFactor {
        &self.provider_average
    }

    /// All region entries, sorted by region code for stable output
    pub fn listing(&self) -> Vec<RegionFactor> {
        let mut entries: Vec<RegionFactor> = self
            .regions
            .iter()
            .map(|(region, factor)| RegionFactor {
                region: region.clone(),
                factor: *factor,
            })
            .collect();
        entries.sort_by(|a, b| a.region.as_str().cmp(b.region.as_str()));
        entries
    }
}
