//! Calculator error types

use chrono::{DateTime, Utc};
use mortgage_types::Program;
use thiserror::Error;

/// Errors produced while computing a mortgage calculation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalculationError {
    /// The down payment is below the required share of the object cost.
    /// This is the only business-rule rejection; its message goes to clients verbatim.
    #[error("the initial payment should be more")]
    InitialPaymentTooLow { minimum: f64, actual: f64 },

    /// A zero-month term reached the calculator
    #[error("loan term must be at least one month")]
    InvalidTerm,

    /// The last payment date does not fit the supported calendar range
    #[error("last payment date out of range: {start} plus {months} months")]
    DateOutOfRange { start: DateTime<Utc>, months: u32 },

    /// A configured annual rate is negative or not finite
    #[error("annual rate for the {program} program must be a non-negative number, got {rate}")]
    InvalidRate { program: Program, rate: f64 },
}

impl CalculationError {
    /// Whether this is an expected, client-facing business rejection rather
    /// than a broken invariant.
    pub fn is_business_rule(&self) -> bool {
        matches!(self, CalculationError::InitialPaymentTooLow { .. })
    }
}
