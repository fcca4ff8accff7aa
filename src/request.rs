//! Estimation request parsing and validation
//!
//! Turns raw caller-supplied parameters (query strings, CLI flags) into a
//! validated [`EstimationRequest`]. Malformed input surfaces as
//! `CarbonError::InvalidRequest`, which the API boundary maps to a client
//! error; a valid request that the data source cannot fully answer is a
//! different failure (`PartialData`) and must stay distinguishable.

use crate::error::{CarbonError, Result};
use crate::types::{DateRange, GroupDimension, TimeGranularity};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::warn;

/// Validated parameters for one estimation call
#[derive(Debug, Clone, PartialEq)]
pub struct EstimationRequest {
    pub range: DateRange,
    pub granularity: TimeGranularity,
    pub group_by: Option<GroupDimension>,
    pub ignore_cache: bool,
}

/// Raw query parameters recognized by the footprint endpoint
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FootprintQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    pub group_by: Option<String>,
    pub group: Option<String>,
    pub ignore_cache: Option<bool>,
}

impl EstimationRequest {
    /// Build a validated request from raw query parameters
    ///
    /// `start` and `end` are required; `groupBy` defaults to month with a
    /// logged warning when absent, matching the documented endpoint
    /// behavior.
    pub fn from_query(query: FootprintQuery) -> Result<Self> {
        let start = query
            .start
            .as_deref()
            .ok_or_else(|| CarbonError::InvalidRequest("missing required parameter: start".to_string()))
            .and_then(parse_date)?;
        let end = query
            .end
            .as_deref()
            .ok_or_else(|| CarbonError::InvalidRequest("missing required parameter: end".to_string()))
            .and_then(parse_date)?;

        let granularity = match query.group_by.as_deref() {
            Some(raw) => raw
                .parse::<TimeGranularity>()
                .map_err(CarbonError::InvalidRequest)?,
            None => {
                warn!("groupBy not specified, defaulting to month granularity");
                TimeGranularity::Month
            }
        };

        let group_by = query
            .group
            .as_deref()
            .map(|raw| {
                raw.parse::<GroupDimension>()
                    .map_err(CarbonError::InvalidRequest)
            })
            .transpose()?;

        Self::new(
            start,
            end,
            granularity,
            group_by,
            query.ignore_cache.unwrap_or(false),
        )
    }

    /// Build a request from already-parsed parts, validating the range
    pub fn new(
        start: NaiveDate,
        end: NaiveDate,
        granularity: TimeGranularity,
        group_by: Option<GroupDimension>,
        ignore_cache: bool,
    ) -> Result<Self> {
        if start > end {
            return Err(CarbonError::InvalidRequest(format!(
                "start date {start} is after end date {end}"
            )));
        }

        Ok(Self {
            range: DateRange::new(start, end),
            granularity,
            group_by,
            ignore_cache,
        })
    }
}

/// Parse a date in YYYY-MM-DD or YYYY-MM form
///
/// A month-only date resolves to the first day of that month.
///
/// # Examples
/// ```
/// use cloudcarbon::request::parse_date;
/// use chrono::Datelike;
///
/// let date = parse_date("2024-01-15").unwrap();
/// assert_eq!(date.day(), 15);
///
/// let date = parse_date("2024-01").unwrap();
/// assert_eq!(date.day(), 1);
/// ```
pub fn parse_date(date_str: &str) -> Result<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
        return Ok(date);
    }

    let parts: Vec<&str> = date_str.split('-').collect();
    if parts.len() == 2 {
        let year = parts[0].parse::<i32>().map_err(|_| {
            CarbonError::InvalidRequest(format!("Invalid year in '{date_str}'"))
        })?;
        let month = parts[1].parse::<u32>().map_err(|_| {
            CarbonError::InvalidRequest(format!("Invalid month in '{date_str}'"))
        })?;

        if !(1..=12).contains(&month) {
            return Err(CarbonError::InvalidRequest(format!(
                "Month must be between 1-12, got {month}"
            )));
        }

        NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| CarbonError::InvalidRequest(format!("Invalid date: {date_str}")))
    } else {
        Err(CarbonError::InvalidRequest(format!(
            "Invalid date format '{date_str}', expected YYYY-MM-DD or YYYY-MM"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_parse_date_formats() {
        let date = parse_date("2024-01-15").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 1, 15));

        let date = parse_date("2024-03").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 3, 1));

        assert!(parse_date("2024-13").is_err());
        assert!(parse_date("January 1st").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_missing_start_is_validation_error() {
        let query = FootprintQuery {
            end: Some("2024-01-31".to_string()),
            ..Default::default()
        };
        let err = EstimationRequest::from_query(query).unwrap_err();
        assert!(matches!(err, CarbonError::InvalidRequest(_)));
        assert!(err.to_string().contains("start"));
    }

    #[test]
    fn test_group_by_defaults_to_month() {
        let query = FootprintQuery {
            start: Some("2024-01-01".to_string()),
            end: Some("2024-01-31".to_string()),
            ..Default::default()
        };
        let request = EstimationRequest::from_query(query).unwrap();
        assert_eq!(request.granularity, TimeGranularity::Month);
        assert!(!request.ignore_cache);
        assert!(request.group_by.is_none());
    }

    #[test]
    fn test_full_query_parses() {
        let query = FootprintQuery {
            start: Some("2024-01-01".to_string()),
            end: Some("2024-01-31".to_string()),
            group_by: Some("day".to_string()),
            group: Some("service".to_string()),
            ignore_cache: Some(true),
        };
        let request = EstimationRequest::from_query(query).unwrap();
        assert_eq!(request.granularity, TimeGranularity::Day);
        assert_eq!(request.group_by, Some(GroupDimension::Service));
        assert!(request.ignore_cache);
    }

    #[test]
    fn test_inverted_range_rejected() {
        let query = FootprintQuery {
            start: Some("2024-02-01".to_string()),
            end: Some("2024-01-01".to_string()),
            ..Default::default()
        };
        let err = EstimationRequest::from_query(query).unwrap_err();
        assert!(matches!(err, CarbonError::InvalidRequest(_)));
    }

    #[test]
    fn test_bad_group_by_rejected() {
        let query = FootprintQuery {
            start: Some("2024-01-01".to_string()),
            end: Some("2024-01-31".to_string()),
            group_by: Some("hourly".to_string()),
            ..Default::default()
        };
        assert!(EstimationRequest::from_query(query).is_err());
    }
}
