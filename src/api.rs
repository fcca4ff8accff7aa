//! HTTP API for footprint estimation
//!
//! Exposes the aggregation pipeline over a small axum router. The error
//! mapping is the contract: malformed requests answer 400, partial data
//! answers 206, and the two upstream failure kinds both answer 500 with
//! distinct error codes in the body, so callers can still tell submission
//! failures from retrieval failures.

use crate::aggregator::BillingExportAggregator;
use crate::cache::{CacheKey, EstimateCache};
use crate::emissions::EmissionsFactorTable;
use crate::error::CarbonError;
use crate::request::{EstimationRequest, FootprintQuery};
use crate::types::EstimationResult;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Shared state for API handlers
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<BillingExportAggregator>,
    pub factors: Arc<EmissionsFactorTable>,
    pub cache: Arc<EstimateCache>,
}

/// Error body returned to API clients
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub status: u16,
    pub code: String,
    pub message: String,
}

/// HTTP-mapped estimation error
#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    body: ApiErrorBody,
}

impl HttpError {
    fn new(status: StatusCode, code: &str, message: String) -> Self {
        Self {
            status,
            body: ApiErrorBody {
                status: status.as_u16(),
                code: code.to_string(),
                message,
            },
        }
    }
}

impl From<CarbonError> for HttpError {
    fn from(err: CarbonError) -> Self {
        let message = err.to_string();
        match err {
            CarbonError::InvalidRequest(_) => {
                Self::new(StatusCode::BAD_REQUEST, "invalid_request", message)
            }
            CarbonError::PartialData(_) => {
                Self::new(StatusCode::PARTIAL_CONTENT, "partial_data", message)
            }
            CarbonError::QueryJobSubmission { .. } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "query_job_submission",
                message,
            ),
            CarbonError::QueryResultRetrieval { .. } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "query_result_retrieval",
                message,
            ),
            _ => Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal", message),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!("{} {}: {}", self.status, self.body.code, self.body.message);
        }
        (self.status, Json(self.body)).into_response()
    }
}

/// Build the API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/footprint", get(footprint))
        .route("/regions/emissions-factors", get(emissions_factors))
        .route("/healthz", get(healthz))
        .with_state(state)
}

async fn footprint(
    State(state): State<AppState>,
    Query(query): Query<FootprintQuery>,
) -> Result<Json<Vec<EstimationResult>>, HttpError> {
    let request = EstimationRequest::from_query(query)?;
    let key = CacheKey {
        range: request.range,
        granularity: request.granularity,
        group_by: request.group_by,
    };

    if !request.ignore_cache {
        if let Some(cached) = state.cache.get(&key).await {
            return Ok(Json(cached));
        }
    } else {
        debug!("Cache bypass requested for {}", request.range);
    }

    let results = state
        .aggregator
        .get_estimates(request.range, request.granularity, request.group_by)
        .await?;

    info!(
        "Served footprint for {} at {} granularity ({} buckets)",
        request.range,
        request.granularity,
        results.len()
    );
    state.cache.put(key, results.clone()).await;
    Ok(Json(results))
}

async fn emissions_factors(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.factors.listing())
}

async fn healthz() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
