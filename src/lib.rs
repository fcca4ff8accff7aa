//! cloudcarbon - Estimate cloud energy use and carbon emissions from billing exports
//!
//! This library provides functionality to:
//! - Classify raw billing usage rows into compute and storage lineages
//! - Convert usage quantities into watt-hours and kg CO2e with regional
//!   emissions factors
//! - Fold per-row estimates into day/week/month buckets, optionally grouped
//!   by service, account or region
//! - Serve results over an HTTP API and render table/JSON reports
//!
//! # Examples
//!
//! ```no_run
//! use cloudcarbon::{
//!     aggregator::BillingExportAggregator,
//!     emissions::EmissionsFactorTable,
//!     source::CsvDataSource,
//!     types::{CloudProvider, DateRange, TimeGranularity},
//! };
//! use chrono::NaiveDate;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> cloudcarbon::Result<()> {
//!     let factors = Arc::new(EmissionsFactorTable::builtin(CloudProvider::Gcp));
//!     let source = Arc::new(CsvDataSource::new("billing.csv"));
//!     let aggregator = BillingExportAggregator::new(source, factors);
//!
//!     let range = DateRange::new(
//!         NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!         NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
//!     );
//!     let results = aggregator
//!         .get_estimates(range, TimeGranularity::Day, None)
//!         .await?;
//!
//!     for result in &results {
//!         println!("{}: {} estimates", result.timestamp, result.service_estimates.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod accumulator;
pub mod aggregator;
pub mod api;
pub mod cache;
pub mod classifier;
pub mod cli;
pub mod compute_estimator;
pub mod emissions;
pub mod error;
pub mod output;
pub mod request;
pub mod source;
pub mod storage_estimator;
pub mod types;

// Re-export commonly used types
pub use error::{CarbonError, Result};
pub use types::{
    CloudProvider, DateRange, EstimationResult, FootprintEstimate, GroupDimension, Region,
    TimeGranularity, UsageRow,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
