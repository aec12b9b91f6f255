//! Request and response bodies of the mortgage API

use mortgage_types::{LoanCalculation, LoanRequest, Program, ProgramFlags};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{ApiError, ApiResult};

pub const MIN_TERM_MONTHS: u32 = 1;
pub const MAX_TERM_MONTHS: u32 = 600;

/// Body of `POST /execute`.
///
/// Every field is optional at the JSON level so a missing field is reported
/// as a validation error naming the field rather than as unparseable JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ApiLoanRequest {
    /// Price of the property
    #[schema(example = 5000000.0)]
    pub object_cost: Option<f64>,

    /// Down payment, at least 20% of the object cost
    #[schema(example = 1000000.0)]
    pub initial_payment: Option<f64>,

    /// Loan term in months, 1 to 600
    #[schema(example = 240)]
    pub months: Option<i64>,

    /// Exactly one program must be selected
    #[serde(default)]
    pub program: ProgramFlags,
}

impl ApiLoanRequest {
    /// Validates the request shape and converts it for the calculator.
    ///
    /// The program selection is checked first, then the fields in order.
    pub fn into_loan_request(self) -> ApiResult<LoanRequest> {
        let program = Program::try_from(self.program)?;
        let object_cost = require_amount("object_cost", self.object_cost)?;
        let initial_payment = require_amount("initial_payment", self.initial_payment)?;
        let term_months = require_term(self.months)?;

        Ok(LoanRequest { object_cost, initial_payment, term_months, program })
    }
}

fn require_amount(field: &'static str, value: Option<f64>) -> ApiResult<f64> {
    match value {
        None => Err(ApiError::validation(field, "is required")),
        Some(amount) if !amount.is_finite() => {
            Err(ApiError::validation(field, "must be a finite number"))
        }
        Some(amount) if amount < 0.0 => Err(ApiError::validation(field, "must be non-negative")),
        Some(amount) => Ok(amount),
    }
}

fn require_term(value: Option<i64>) -> ApiResult<u32> {
    let months = value.ok_or_else(|| ApiError::validation("months", "is required"))?;
    u32::try_from(months)
        .ok()
        .filter(|months| (MIN_TERM_MONTHS..=MAX_TERM_MONTHS).contains(months))
        .ok_or_else(|| {
            ApiError::validation(
                "months",
                format!("must be between {MIN_TERM_MONTHS} and {MAX_TERM_MONTHS}"),
            )
        })
}

/// Body of a successful `POST /execute`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CalculationResponse {
    pub result: LoanCalculation,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    #[schema(example = "0.1.0")]
    pub version: String,
    pub uptime_seconds: u64,
    /// Number of calculations currently cached
    pub cached_calculations: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ApiLoanRequest {
        ApiLoanRequest {
            object_cost: Some(5_000_000.0),
            initial_payment: Some(1_000_000.0),
            months: Some(240),
            program: ProgramFlags { salary: true, ..ProgramFlags::default() },
        }
    }

    fn message(request: ApiLoanRequest) -> String {
        request.into_loan_request().unwrap_err().client_message()
    }

    #[test]
    fn test_valid_request_converts() {
        let request = valid().into_loan_request().unwrap();
        assert_eq!(request.object_cost, 5_000_000.0);
        assert_eq!(request.initial_payment, 1_000_000.0);
        assert_eq!(request.term_months, 240);
        assert_eq!(request.program, Program::Salary);
    }

    #[test]
    fn test_program_checked_before_fields() {
        let request = ApiLoanRequest { program: ProgramFlags::default(), ..ApiLoanRequest::default() };
        assert_eq!(message(request), "choose program");

        let request = ApiLoanRequest {
            program: ProgramFlags { salary: true, military: true, base: false },
            months: Some(9999),
            ..valid()
        };
        assert_eq!(message(request), "choose only 1 program");
    }

    #[test]
    fn test_field_validation_messages() {
        assert_eq!(
            message(ApiLoanRequest { object_cost: None, ..valid() }),
            "validation error: object_cost is required"
        );
        assert_eq!(
            message(ApiLoanRequest { initial_payment: Some(-1.0), ..valid() }),
            "validation error: initial_payment must be non-negative"
        );
        assert_eq!(
            message(ApiLoanRequest { months: Some(601), ..valid() }),
            "validation error: months must be between 1 and 600"
        );
        assert_eq!(
            message(ApiLoanRequest { months: Some(0), ..valid() }),
            "validation error: months must be between 1 and 600"
        );
        assert_eq!(
            message(ApiLoanRequest { months: Some(-5), ..valid() }),
            "validation error: months must be between 1 and 600"
        );
    }

    #[test]
    fn test_term_boundaries_accepted() {
        for months in [MIN_TERM_MONTHS, MAX_TERM_MONTHS] {
            let request = ApiLoanRequest { months: Some(i64::from(months)), ..valid() };
            assert_eq!(request.into_loan_request().unwrap().term_months, months);
        }
    }

    #[test]
    fn test_zero_amounts_are_allowed() {
        let request = ApiLoanRequest { object_cost: Some(0.0), initial_payment: Some(0.0), ..valid() };
        assert!(request.into_loan_request().is_ok());
    }
}
