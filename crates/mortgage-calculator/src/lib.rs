//! The mortgage calculator.
//!
//! This crate provides the `Calculator` trait and the `AnnuityCalculator`
//! implementation that turns a validated [`LoanRequest`] into a
//! [`LoanCalculation`]: annual rate by program, loan sum, fixed monthly
//! annuity payment, total overpayment and the date of the last payment.
//!
//! Calculators are stateless and thread-safe. The current time comes from an
//! injected [`Clock`] so results are reproducible under test.

use std::fmt::Debug;

use mortgage_types::{LoanCalculation, LoanRequest};

pub mod annuity;
pub mod calendar;
pub mod clock;
pub mod error;
pub mod rates;

/// A trait for all mortgage calculators.
pub trait Calculator: Send + Sync + Debug {
    /// Computes loan figures for an already shape-validated request.
    ///
    /// Fails with [`CalculationError::InitialPaymentTooLow`] when the down
    /// payment breaks the business rule; the returned calculation has no id.
    fn calculate(&self, request: &LoanRequest) -> Result<LoanCalculation, CalculationError>;
}

pub use annuity::{AnnuityCalculator, MIN_INITIAL_PAYMENT_PERCENT};
pub use calendar::add_calendar_months;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::CalculationError;
pub use rates::RateTable;
