use std::sync::Arc;

use axum::{Json, body::Bytes, extract::State};
use mortgage_types::LoanCalculation;
use tracing::{debug, info};
use utoipa::OpenApi;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::openapi::ApiDoc;
use crate::types::{ApiLoanRequest, CalculationResponse, HealthResponse};

/// Calculate a mortgage and cache the result
#[utoipa::path(
    post,
    path = "/execute",
    tag = "mortgage",
    request_body = ApiLoanRequest,
    responses(
        (status = 200, description = "Calculation stored", body = CalculationResponse),
        (status = 400, description = "Invalid request or initial payment too low", body = ApiErrorResponse),
        (status = 500, description = "Internal error", body = ApiErrorResponse)
    )
)]
pub async fn execute(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<CalculationResponse>> {
    // The body is decoded whatever the Content-Type header says.
    let payload: ApiLoanRequest = serde_json::from_slice(&body).map_err(|err| {
        debug!(error = %err, "Request body rejected");
        ApiError::InvalidJson
    })?;

    let request = payload.into_loan_request()?;
    let mut calculation = state.calculator.calculate(&request)?;
    let id = state.store.store(&mut calculation);

    info!(
        id,
        program = %request.program,
        monthly_payment = calculation.aggregates.monthly_payment,
        "Mortgage calculation stored"
    );

    Ok(Json(CalculationResponse { result: calculation }))
}

/// List every cached calculation
#[utoipa::path(
    get,
    path = "/cache",
    tag = "mortgage",
    responses(
        (status = 200, description = "All cached calculations, unordered", body = [LoanCalculation]),
        (status = 400, description = "Nothing cached yet", body = ApiErrorResponse)
    )
)]
pub async fn list_cache(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<LoanCalculation>>> {
    let calculations = state.store.get_all();
    if calculations.is_empty() {
        return Err(ApiError::EmptyCache);
    }

    debug!(count = calculations.len(), "Serving cached calculations");
    Ok(Json(calculations))
}

/// Service liveness
#[utoipa::path(
    get,
    path = "/health",
    tag = "service",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.elapsed().as_secs(),
        cached_calculations: state.store.len(),
    })
}

pub async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
