//! Common test utilities and helpers for cloudcarbon tests
//!
//! This module provides reusable test utilities, mock data generators,
//! and helper functions to make testing easier and more consistent.

use chrono::NaiveDate;
use cloudcarbon::types::{Region, UsageRow};
use std::io::Write;
use tempfile::NamedTempFile;

/// Common test services
#[allow(dead_code)]
pub const TEST_SERVICES: &[&str] = &["Compute Engine", "App Engine", "Cloud Storage", "Cloud SQL"];

/// Common test regions with known emissions factors
#[allow(dead_code)]
pub const TEST_REGIONS: &[&str] = &["us-central1", "us-east1", "us-west1", "europe-west1"];

/// Builder for creating test UsageRow instances
pub struct UsageRowBuilder {
    timestamp: NaiveDate,
    account_name: String,
    service_name: String,
    region: String,
    usage_type: String,
    usage_unit: String,
    usage_amount: f64,
    cost: f64,
}

impl UsageRowBuilder {
    /// Create a new builder defaulting to one compute hour
    pub fn new() -> Self {
        Self {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            account_name: "test-account".to_string(),
            service_name: "Compute Engine".to_string(),
            region: "us-east1".to_string(),
            usage_type: "Instance Core running time".to_string(),
            usage_unit: "seconds".to_string(),
            usage_amount: 3600.0,
            cost: 1.0,
        }
    }

    pub fn with_date(mut self, year: i32, month: u32, day: u32) -> Self {
        self.timestamp = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        self
    }

    pub fn with_account(mut self, account: &str) -> Self {
        self.account_name = account.to_string();
        self
    }

    pub fn with_service(mut self, service: &str) -> Self {
        self.service_name = service.to_string();
        self
    }

    pub fn with_region(mut self, region: &str) -> Self {
        self.region = region.to_string();
        self
    }

    pub fn with_usage(mut self, usage_type: &str, unit: &str, amount: f64) -> Self {
        self.usage_type = usage_type.to_string();
        self.usage_unit = unit.to_string();
        self.usage_amount = amount;
        self
    }

    #[allow(dead_code)]
    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = cost;
        self
    }

    /// Shortcut for an SSD storage row
    #[allow(dead_code)]
    pub fn ssd_storage(self, byte_seconds: f64) -> Self {
        self.with_usage("Storage PD SSD Capacity", "byte-seconds", byte_seconds)
    }

    /// Shortcut for an HDD storage row
    #[allow(dead_code)]
    pub fn hdd_storage(self, byte_seconds: f64) -> Self {
        self.with_usage("Storage PD Capacity", "byte-seconds", byte_seconds)
    }

    /// Shortcut for a RAM row, which the classifier must drop
    #[allow(dead_code)]
    pub fn ram(self, byte_seconds: f64) -> Self {
        self.with_usage("Backend Instances RAM running time", "byte-seconds", byte_seconds)
    }

    /// Build the UsageRow
    pub fn build(self) -> UsageRow {
        UsageRow {
            timestamp: self.timestamp,
            account_name: self.account_name,
            service_name: self.service_name,
            region: Region::new(self.region),
            usage_type: self.usage_type,
            usage_unit: self.usage_unit,
            usage_amount: self.usage_amount,
            cost: self.cost,
        }
    }

    /// Build as a CSV record line matching the billing export header
    #[allow(dead_code)]
    pub fn to_csv_line(self) -> String {
        format!(
            "{},{},{},{},{},{},{},{}",
            self.timestamp,
            self.account_name,
            self.service_name,
            self.region,
            self.usage_type,
            self.usage_unit,
            self.usage_amount,
            self.cost
        )
    }
}

impl Default for UsageRowBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// CSV header matching [`UsageRow`] field names
#[allow(dead_code)]
pub const CSV_HEADER: &str =
    "timestamp,account_name,service_name,region,usage_type,usage_unit,usage_amount,cost";

/// Write a billing export CSV file from record lines
#[allow(dead_code)]
pub fn write_csv_export(lines: &[String]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{CSV_HEADER}").unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file
}

/// Assert that two float values are approximately equal
#[allow(dead_code)]
pub fn assert_approx_eq(a: f64, b: f64, tolerance: f64) {
    assert!(
        (a - b).abs() <= tolerance,
        "Values are not approximately equal: {} != {} (tolerance: {})",
        a,
        b,
        tolerance
    );
}
