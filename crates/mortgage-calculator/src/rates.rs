//! Annual interest rates per mortgage program.

use mortgage_types::Program;
use serde::{Deserialize, Serialize};

use crate::error::CalculationError;

/// Annual rate, in percent, for each program.
///
/// The default is the service's published rate sheet: salary 8%, military
/// 9%, base 10%.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateTable {
    pub salary: f64,
    pub military: f64,
    pub base: f64,
}

impl Default for RateTable {
    fn default() -> Self {
        Self { salary: 8.0, military: 9.0, base: 10.0 }
    }
}

impl RateTable {
    /// Annual rate for `program`, in percent.
    pub fn rate_for(&self, program: Program) -> f64 {
        match program {
            Program::Salary => self.salary,
            Program::Military => self.military,
            Program::Base => self.base,
        }
    }

    /// Rejects negative and non-finite rates. Zero is allowed.
    pub fn validate(&self) -> Result<(), CalculationError> {
        for program in Program::ALL {
            let rate = self.rate_for(program);
            if !rate.is_finite() || rate < 0.0 {
                return Err(CalculationError::InvalidRate { program, rate });
            }
        }
        Ok(())
    }
}
