//! Usage data sources
//!
//! Abstracts where billing rows come from. A source runs in two steps that
//! fail independently: submitting a query job, then retrieving its results.
//! The aggregator maps the upstream error of each step into its own error
//! kind, preserving the provider's `reason` and `message` verbatim.
//!
//! Two concrete sources ship with the crate: [`CsvDataSource`] parses a
//! billing-export CSV file, and [`StaticDataSource`] serves an
//! already-parsed in-memory row sequence (the file-reader ingestion path,
//! also used heavily in tests).

use crate::types::{DateRange, UsageRow};
use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use tracing::debug;

/// Error reported by an upstream usage data provider
///
/// Mirrors the `{reason, domain/location, message}` shape of cloud billing
/// warehouse errors.
#[derive(Debug, Clone)]
pub struct UpstreamError {
    pub reason: String,
    pub domain: Option<String>,
    pub location: Option<String>,
    pub message: String,
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.reason, self.message)
    }
}

impl std::error::Error for UpstreamError {}

/// Rows returned by a query job, with optional coverage metadata
///
/// `covered` is the date range the result set actually spans, when the
/// source can report it. Sources that cannot report coverage leave it
/// `None`, and the aggregator then has no basis to raise a partial-data
/// error.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    pub rows: Vec<UsageRow>,
    pub covered: Option<DateRange>,
}

/// Handle to a submitted usage query
#[async_trait]
pub trait QueryJob: Send + Sync {
    /// Retrieve the query results; the second failure point of a fetch
    async fn results(&self) -> Result<ResultSet, UpstreamError>;
}

impl fmt::Debug for dyn QueryJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("QueryJob")
    }
}

/// A queryable source of billing usage rows
#[async_trait]
pub trait UsageDataSource: Send + Sync {
    /// Submit a query job for the closed date range; the first failure point
    async fn submit_query(&self, range: &DateRange) -> Result<Box<dyn QueryJob>, UpstreamError>;
}

/// In-memory data source over an already-parsed row sequence
///
/// Serves rows filtered to the queried range, preserving input order. The
/// optional coverage override lets tests and partial exports declare what
/// range the data actually spans.
pub struct StaticDataSource {
    rows: Vec<UsageRow>,
    covered: Option<DateRange>,
}

impl StaticDataSource {
    /// Create a source over a fixed row sequence
    pub fn new(rows: Vec<UsageRow>) -> Self {
        Self {
            rows,
            covered: None,
        }
    }

    /// Declare the date range this data actually covers
    pub fn with_coverage(mut self, covered: DateRange) -> Self {
        self.covered = Some(covered);
        self
    }
}

struct StaticQueryJob {
    result_set: ResultSet,
}

#[async_trait]
impl QueryJob for StaticQueryJob {
    async fn results(&self) -> Result<ResultSet, UpstreamError> {
        Ok(self.result_set.clone())
    }
}

#[async_trait]
impl UsageDataSource for StaticDataSource {
    async fn submit_query(&self, range: &DateRange) -> Result<Box<dyn QueryJob>, UpstreamError> {
        let rows: Vec<UsageRow> = self
            .rows
            .iter()
            .filter(|row| range.contains(row.timestamp))
            .cloned()
            .collect();

        debug!("Static source matched {} rows for {}", rows.len(), range);
        Ok(Box::new(StaticQueryJob {
            result_set: ResultSet {
                rows,
                covered: self.covered,
            },
        }))
    }
}

/// Data source backed by a billing-export CSV file
///
/// Expects a header row matching the [`UsageRow`] field names
/// (`timestamp,account_name,service_name,region,usage_type,usage_unit,usage_amount,cost`).
/// Opening and reading the file is the submission step; a missing file
/// surfaces as a submission error, a malformed row as a retrieval error.
pub struct CsvDataSource {
    path: PathBuf,
}

impl CsvDataSource {
    /// Create a source reading from the given CSV file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

struct CsvQueryJob {
    raw: Vec<u8>,
    path: PathBuf,
    range: DateRange,
}

#[async_trait]
impl QueryJob for CsvQueryJob {
    async fn results(&self) -> Result<ResultSet, UpstreamError> {
        let mut reader = csv::Reader::from_reader(self.raw.as_slice());
        let mut rows = Vec::new();

        for record in reader.deserialize::<UsageRow>() {
            let row = record.map_err(|e| UpstreamError {
                reason: "parseError".to_string(),
                domain: Some("csv".to_string()),
                location: None,
                message: format!("{}: {}", self.path.display(), e),
            })?;
            if self.range.contains(row.timestamp) {
                rows.push(row);
            }
        }

        debug!(
            "CSV source parsed {} in-range rows from {}",
            rows.len(),
            self.path.display()
        );
        Ok(ResultSet {
            rows,
            covered: None,
        })
    }
}

#[async_trait]
impl UsageDataSource for CsvDataSource {
    async fn submit_query(&self, range: &DateRange) -> Result<Box<dyn QueryJob>, UpstreamError> {
        let raw = tokio::fs::read(&self.path).await.map_err(|e| UpstreamError {
            reason: "fileNotFound".to_string(),
            domain: None,
            location: Some(self.path.display().to_string()),
            message: e.to_string(),
        })?;

        Ok(Box::new(CsvQueryJob {
            raw,
            path: self.path.clone(),
            range: *range,
        }))
    }
}
