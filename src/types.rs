//! Core domain types for cloudcarbon
//!
//! This module contains the fundamental types used throughout the library:
//! billing usage rows, footprint estimates, time-bucketed results, and the
//! enums that select providers, time granularity, and grouping dimensions.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Strongly-typed cloud region identifier
///
/// Region codes are the lookup key into the emissions factor table. Billing
/// data routinely contains retired or mis-tagged codes, so an unknown region
/// is never fatal; callers fall back to provider-wide averages.
///
/// # Examples
/// ```
/// use cloudcarbon::types::Region;
///
/// let region = Region::new("us-central1");
/// assert_eq!(region.as_str(), "us-central1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region(String);

impl Region {
    /// Create a new Region from any string-like type
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Region {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Supported cloud providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudProvider {
    Aws,
    Gcp,
    Azure,
}

impl fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aws => write!(f, "aws"),
            Self::Gcp => write!(f, "gcp"),
            Self::Azure => write!(f, "azure"),
        }
    }
}

impl std::str::FromStr for CloudProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "aws" => Ok(Self::Aws),
            "gcp" => Ok(Self::Gcp),
            "azure" => Ok(Self::Azure),
            _ => Err(format!("Invalid cloud provider: {s}")),
        }
    }
}

/// Time bucket granularity for aggregated results
///
/// Controls how row timestamps are truncated when folding estimates into
/// buckets. All truncation is UTC calendar based, never adjusted for local
/// time zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeGranularity {
    Day,
    Week,
    Month,
}

impl TimeGranularity {
    /// Truncate a date to the start of its bucket
    ///
    /// Day buckets are the date itself, week buckets start on Monday, and
    /// month buckets start on the first of the month.
    ///
    /// # Examples
    /// ```
    /// use cloudcarbon::types::TimeGranularity;
    /// use chrono::NaiveDate;
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    /// let bucket = TimeGranularity::Month.truncate(date);
    /// assert_eq!(bucket, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    /// ```
    pub fn truncate(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Day => date,
            Self::Week => date.week(Weekday::Mon).first_day(),
            Self::Month => date
                .with_day(1)
                .expect("first day of month is always valid"),
        }
    }
}

impl Default for TimeGranularity {
    fn default() -> Self {
        Self::Month
    }
}

impl fmt::Display for TimeGranularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day => write!(f, "day"),
            Self::Week => write!(f, "week"),
            Self::Month => write!(f, "month"),
        }
    }
}

impl std::str::FromStr for TimeGranularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            _ => Err(format!("Invalid granularity: {s}, expected day/week/month")),
        }
    }
}

/// Optional secondary grouping dimension for bucket keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupDimension {
    Service,
    Account,
    Region,
}

impl GroupDimension {
    /// Extract the grouping key for an estimate
    pub fn key_for(&self, estimate: &FootprintEstimate) -> String {
        match self {
            Self::Service => estimate.service_name.clone(),
            Self::Account => estimate.account_name.clone(),
            Self::Region => estimate.region.to_string(),
        }
    }
}

impl fmt::Display for GroupDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Service => write!(f, "service"),
            Self::Account => write!(f, "account"),
            Self::Region => write!(f, "region"),
        }
    }
}

impl std::str::FromStr for GroupDimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "service" => Ok(Self::Service),
            "account" => Ok(Self::Account),
            "region" => Ok(Self::Region),
            _ => Err(format!(
                "Invalid group dimension: {s}, expected service/account/region"
            )),
        }
    }
}

/// Closed date range, both ends inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a new DateRange
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Check whether a date falls inside the range
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Check whether this range fully covers another
    pub fn covers(&self, other: &DateRange) -> bool {
        self.start <= other.start && self.end >= other.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// One line item of cloud billing/usage data
///
/// Produced by the usage data source and consumed exactly once by the
/// aggregation pipeline. The `usage_type` and `usage_unit` strings are raw
/// provider vocabulary; the classifier interprets them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRow {
    /// UTC calendar date of the usage
    pub timestamp: NaiveDate,
    /// Billing account the usage was charged to
    pub account_name: String,
    /// Cloud service that generated the usage
    pub service_name: String,
    /// Region the usage occurred in
    pub region: Region,
    /// Raw provider-specific usage type string
    pub usage_type: String,
    /// Unit of the usage amount (e.g. "seconds", "byte-seconds")
    pub usage_unit: String,
    /// Quantity of usage in `usage_unit`s
    pub usage_amount: f64,
    /// Billed cost, currency-agnostic
    pub cost: f64,
}

/// Estimated energy and emissions for a single classified usage row
///
/// Immutable once computed. `uses_average_cpu_constant` signals that the
/// provider's average CPU utilization was substituted for a measured ratio,
/// which downstream consumers treat as reduced estimate confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FootprintEstimate {
    /// Estimated energy consumption in watt-hours
    pub watt_hours: f64,
    /// Estimated emissions in kilograms of CO2-equivalent
    pub co2e: f64,
    /// Whether the provider average CPU utilization constant was substituted
    pub uses_average_cpu_constant: bool,
    /// Cloud provider the estimate was computed for
    pub cloud_provider: CloudProvider,
    /// Billing account from the source row
    pub account_name: String,
    /// Service name from the source row
    pub service_name: String,
    /// Billed cost from the source row
    pub cost: f64,
    /// Region from the source row
    pub region: Region,
}

/// One time-bucketed, optionally grouped collection of estimates
///
/// `timestamp` is the bucket start after truncation to the requested
/// granularity. No two results in an output sequence share the same
/// `(timestamp, group)` key; `service_estimates` preserves arrival order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimationResult {
    /// Bucket start date
    pub timestamp: NaiveDate,
    /// Secondary grouping key, when grouping was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Estimates folded into this bucket, in arrival order
    pub service_estimates: Vec<FootprintEstimate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region() {
        let region = Region::new("us-east1");
        assert_eq!(region.as_str(), "us-east1");
        assert_eq!(region.to_string(), "us-east1");
    }

    #[test]
    fn test_granularity_parsing() {
        assert_eq!(
            "day".parse::<TimeGranularity>().unwrap(),
            TimeGranularity::Day
        );
        assert_eq!(
            "Week".parse::<TimeGranularity>().unwrap(),
            TimeGranularity::Week
        );
        assert_eq!(
            "month".parse::<TimeGranularity>().unwrap(),
            TimeGranularity::Month
        );
        assert!("hour".parse::<TimeGranularity>().is_err());
        assert_eq!(TimeGranularity::default(), TimeGranularity::Month);
    }

    #[test]
    fn test_truncate_day() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(TimeGranularity::Day.truncate(date), date);
    }

    #[test]
    fn test_truncate_week_starts_monday() {
        // 2024-03-15 is a Friday; the week starts on Monday the 11th
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(
            TimeGranularity::Week.truncate(date),
            NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
        );

        // A Monday truncates to itself
        let monday = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
        assert_eq!(TimeGranularity::Week.truncate(monday), monday);
    }

    #[test]
    fn test_truncate_month() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(
            TimeGranularity::Month.truncate(date),
            NaiveDate::from_ymd_opt(2024, 12, 1).unwrap()
        );
    }

    #[test]
    fn test_date_range() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        );
        assert!(range.contains(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
        assert!(range.contains(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()));

        let inner = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
        );
        assert!(range.covers(&inner));
        assert!(!inner.covers(&range));
    }

    #[test]
    fn test_provider_parsing() {
        assert_eq!("gcp".parse::<CloudProvider>().unwrap(), CloudProvider::Gcp);
        assert_eq!("AWS".parse::<CloudProvider>().unwrap(), CloudProvider::Aws);
        assert!("ibm".parse::<CloudProvider>().is_err());
    }

    #[test]
    fn test_group_dimension_key() {
        let estimate = FootprintEstimate {
            watt_hours: 1.0,
            co2e: 0.001,
            uses_average_cpu_constant: true,
            cloud_provider: CloudProvider::Gcp,
            account_name: "acct-1".to_string(),
            service_name: "App Engine".to_string(),
            cost: 2.5,
            region: Region::new("us-east1"),
        };

        assert_eq!(GroupDimension::Service.key_for(&estimate), "App Engine");
        assert_eq!(GroupDimension::Account.key_for(&estimate), "acct-1");
        assert_eq!(GroupDimension::Region.key_for(&estimate), "us-east1");
    }
}
