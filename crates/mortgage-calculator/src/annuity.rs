//! Fixed-payment (annuity) mortgage calculator
//!
//! The monthly payment stays constant over the whole term:
//! `payment = principal * r * (1 + r)^n / ((1 + r)^n - 1)` where `r` is the
//! monthly rate and `n` the number of months. Payment and overpayment are
//! rounded to whole currency units, ties away from zero.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mortgage_types::{LoanAggregates, LoanCalculation, LoanRequest};
use tracing::debug;

use crate::Calculator;
use crate::calendar::add_calendar_months;
use crate::clock::{Clock, SystemClock};
use crate::error::CalculationError;
use crate::rates::RateTable;

/// Minimum down payment, as a percentage of the object cost.
pub const MIN_INITIAL_PAYMENT_PERCENT: f64 = 20.0;

/// Annuity calculator with an injected rate sheet and clock.
#[derive(Debug, Clone)]
pub struct AnnuityCalculator {
    rates: RateTable,
    clock: Arc<dyn Clock>,
}

impl Default for AnnuityCalculator {
    fn default() -> Self {
        Self { rates: RateTable::default(), clock: Arc::new(SystemClock) }
    }
}

impl AnnuityCalculator {
    /// Creates a calculator, rejecting negative or non-finite rates.
    pub fn new(rates: RateTable, clock: Arc<dyn Clock>) -> Result<Self, CalculationError> {
        rates.validate()?;
        Ok(Self { rates, clock })
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Computes the calculation as of `now`.
    pub fn calculate_at(
        &self,
        request: &LoanRequest,
        now: DateTime<Utc>,
    ) -> Result<LoanCalculation, CalculationError> {
        if request.term_months == 0 {
            return Err(CalculationError::InvalidTerm);
        }

        // Compared in percent units so integral amounts are exact at the 20% boundary.
        if request.initial_payment * 100.0 < request.object_cost * MIN_INITIAL_PAYMENT_PERCENT {
            debug!(
                object_cost = request.object_cost,
                initial_payment = request.initial_payment,
                "Initial payment below required share"
            );
            return Err(CalculationError::InitialPaymentTooLow {
                minimum: request.object_cost * MIN_INITIAL_PAYMENT_PERCENT / 100.0,
                actual: request.initial_payment,
            });
        }

        let annual_rate = self.rates.rate_for(request.program);
        let monthly_rate = annual_rate / 12.0 / 100.0;
        let loan_sum = request.object_cost - request.initial_payment;

        let monthly_payment =
            round_currency(loan_sum * payment_factor(monthly_rate, request.term_months));
        let overpayment =
            round_currency(monthly_payment * f64::from(request.term_months) - loan_sum);

        let last_payment_date = add_calendar_months(now, request.term_months).ok_or(
            CalculationError::DateOutOfRange { start: now, months: request.term_months },
        )?;

        debug!(
            program = %request.program,
            rate = annual_rate,
            loan_sum,
            monthly_payment,
            overpayment,
            "Mortgage calculated"
        );

        Ok(LoanCalculation::new(
            request,
            LoanAggregates {
                rate: annual_rate,
                loan_sum,
                monthly_payment,
                overpayment,
                last_payment_date,
            },
        ))
    }
}

impl Calculator for AnnuityCalculator {
    fn calculate(&self, request: &LoanRequest) -> Result<LoanCalculation, CalculationError> {
        self.calculate_at(request, self.clock.now())
    }
}

/// Share of the principal paid each month.
///
/// A zero rate degenerates to straight-line repayment instead of the 0/0 the
/// annuity formula would produce. `months` must be non-zero.
pub fn payment_factor(monthly_rate: f64, months: u32) -> f64 {
    let months = f64::from(months);
    if monthly_rate == 0.0 {
        return 1.0 / months;
    }
    let growth = (1.0 + monthly_rate).powf(months);
    monthly_rate * growth / (growth - 1.0)
}

/// Rounds to the nearest whole currency unit, ties away from zero.
pub fn round_currency(amount: f64) -> f64 {
    amount.round()
}
