//! Output formatting module for cloudcarbon
//!
//! This module provides formatters for displaying estimation results in
//! different formats:
//! - Table format for human-readable terminal output
//! - JSON format for machine-readable output and integration with other tools
//!
//! # Examples
//!
//! ```
//! use cloudcarbon::output::{get_formatter, Totals};
//!
//! let results = vec![];
//! let totals = Totals::from_results(&results);
//!
//! // Table formatter for human-readable output
//! let formatter = get_formatter(false);
//! println!("{}", formatter.format_results(&results, &totals));
//!
//! // JSON formatter for machine-readable output
//! let json_formatter = get_formatter(true);
//! println!("{}", json_formatter.format_results(&results, &totals));
//! ```

use crate::emissions::RegionFactor;
use crate::types::EstimationResult;
use prettytable::{Table, format, row};
use serde_json::json;

/// Summary totals across a result sequence
#[derive(Debug, Clone, Copy, Default)]
pub struct Totals {
    /// Total estimated energy in watt-hours
    pub watt_hours: f64,
    /// Total estimated emissions in kg CO2e
    pub co2e: f64,
    /// Total billed cost
    pub cost: f64,
    /// Number of individual estimates across all buckets
    pub estimate_count: usize,
    /// Estimates that substituted the average CPU constant
    pub assumed_cpu_count: usize,
}

impl Totals {
    /// Sum up a result sequence
    pub fn from_results(results: &[EstimationResult]) -> Self {
        let mut totals = Self::default();
        for result in results {
            for estimate in &result.service_estimates {
                totals.watt_hours += estimate.watt_hours;
                totals.co2e += estimate.co2e;
                totals.cost += estimate.cost;
                totals.estimate_count += 1;
                if estimate.uses_average_cpu_constant {
                    totals.assumed_cpu_count += 1;
                }
            }
        }
        totals
    }
}

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format a bucketed result sequence with totals
    fn format_results(&self, results: &[EstimationResult], totals: &Totals) -> String;

    /// Format an emissions factor listing
    fn format_regions(&self, regions: &[RegionFactor]) -> String;
}

/// Table formatter for human-readable output
///
/// Produces ASCII tables suitable for terminal display. Energy and emissions
/// are rounded for presentation only; the underlying results stay full
/// precision.
pub struct TableFormatter;

impl TableFormatter {
    /// Create a new TableFormatter
    pub fn new() -> Self {
        Self
    }

    fn format_currency(amount: f64) -> String {
        format!("${amount:.2}")
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TableFormatter {
    fn format_results(&self, results: &[EstimationResult], totals: &Totals) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);

        let grouped = results.iter().any(|r| r.group.is_some());
        if grouped {
            table.set_titles(row![
                b -> "Bucket",
                b -> "Group",
                b -> "Service",
                b -> "Region",
                b -> "Watt-hours",
                b -> "kg CO2e",
                b -> "Cost",
                b -> "CPU"
            ]);
        } else {
            table.set_titles(row![
                b -> "Bucket",
                b -> "Service",
                b -> "Region",
                b -> "Watt-hours",
                b -> "kg CO2e",
                b -> "Cost",
                b -> "CPU"
            ]);
        }

        for result in results {
            for estimate in &result.service_estimates {
                let cpu = if estimate.uses_average_cpu_constant {
                    "avg"
                } else {
                    "measured"
                };
                if grouped {
                    table.add_row(row![
                        result.timestamp.format("%Y-%m-%d"),
                        result.group.as_deref().unwrap_or("-"),
                        estimate.service_name,
                        estimate.region,
                        r -> format!("{:.4}", estimate.watt_hours),
                        r -> format!("{:.6}", estimate.co2e),
                        r -> Self::format_currency(estimate.cost),
                        cpu
                    ]);
                } else {
                    table.add_row(row![
                        result.timestamp.format("%Y-%m-%d"),
                        estimate.service_name,
                        estimate.region,
                        r -> format!("{:.4}", estimate.watt_hours),
                        r -> format!("{:.6}", estimate.co2e),
                        r -> Self::format_currency(estimate.cost),
                        cpu
                    ]);
                }
            }
        }

        let mut output = table.to_string();
        output.push_str(&format!(
            "\nTotal: {:.4} Wh, {:.6} kg CO2e, {} across {} estimates ({} using avg CPU)\n",
            totals.watt_hours,
            totals.co2e,
            Self::format_currency(totals.cost),
            totals.estimate_count,
            totals.assumed_cpu_count
        ));
        output
    }

    fn format_regions(&self, regions: &[RegionFactor]) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row![
            b -> "Region",
            b -> "kg CO2e / kWh",
            b -> "PUE",
            b -> "Avg CPU"
        ]);

        for entry in regions {
            table.add_row(row![
                entry.region,
                r -> format!("{:.4}", entry.factor.co2e_per_kilowatt_hour),
                r -> format!("{:.3}", entry.factor.power_usage_effectiveness),
                r -> format!("{:.2}", entry.factor.average_cpu_utilization)
            ]);
        }

        table.to_string()
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl JsonFormatter {
    /// Create a new JsonFormatter
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_results(&self, results: &[EstimationResult], totals: &Totals) -> String {
        let output = json!({
            "results": results,
            "totals": {
                "watt_hours": totals.watt_hours,
                "co2e": totals.co2e,
                "cost": totals.cost,
                "estimate_count": totals.estimate_count,
                "assumed_cpu_count": totals.assumed_cpu_count,
            },
        });
        serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_regions(&self, regions: &[RegionFactor]) -> String {
        serde_json::to_string_pretty(&regions).unwrap_or_else(|_| "[]".to_string())
    }
}

/// Get the appropriate formatter for the output mode
pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter::new())
    } else {
        Box::new(TableFormatter::new())
    }
}
