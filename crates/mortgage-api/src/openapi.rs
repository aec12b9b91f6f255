use mortgage_types::{LoanAggregates, LoanCalculation, LoanParams, ProgramFlags};
use utoipa::OpenApi;

use crate::error::ApiErrorResponse;
use crate::handlers;
use crate::types::{ApiLoanRequest, CalculationResponse, HealthResponse};

/// OpenAPI document served at `/api-docs/openapi.json`
#[derive(OpenApi)]
#[openapi(
    info(title = "Mortgage Calculator API", description = "Annuity mortgage calculations with an in-process result cache"),
    paths(handlers::execute, handlers::list_cache, handlers::health),
    components(schemas(
        ApiLoanRequest,
        CalculationResponse,
        HealthResponse,
        ApiErrorResponse,
        LoanCalculation,
        LoanParams,
        LoanAggregates,
        ProgramFlags
    )),
    tags(
        (name = "mortgage", description = "Mortgage calculation and cache"),
        (name = "service", description = "Service status")
    )
)]
pub struct ApiDoc;
