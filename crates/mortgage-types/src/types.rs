use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use utoipa::ToSchema;

/// Mortgage program chosen by the borrower.
///
/// Clients send the program as three booleans (see [`ProgramFlags`]); inside
/// the service it is a closed enumeration, so a request can never carry zero
/// or several programs past the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ProgramFlags", into = "ProgramFlags")]
pub enum Program {
    /// Salary project participants
    Salary,
    /// Military mortgage
    Military,
    /// Base program
    Base,
}

impl Program {
    /// Every program, in wire order.
    pub const ALL: [Program; 3] = [Program::Salary, Program::Military, Program::Base];

    /// Lowercase name used on the wire and in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Program::Salary => "salary",
            Program::Military => "military",
            Program::Base => "base",
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire representation of a program selection.
///
/// Missing flags default to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ProgramFlags {
    /// Salary project participants
    #[schema(example = true)]
    pub salary: bool,
    /// Military mortgage
    #[schema(example = false)]
    pub military: bool,
    /// Base program
    #[schema(example = false)]
    pub base: bool,
}

impl ProgramFlags {
    fn selected_count(&self) -> usize {
        [self.salary, self.military, self.base].into_iter().filter(|flag| *flag).count()
    }
}

/// Rejection of a program selection that is not exactly one flag.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramSelectionError {
    /// No flag set
    #[error("choose program")]
    NotSelected,
    /// More than one flag set
    #[error("choose only 1 program")]
    MultipleSelected,
}

impl TryFrom<ProgramFlags> for Program {
    type Error = ProgramSelectionError;

    fn try_from(flags: ProgramFlags) -> Result<Self, Self::Error> {
        match flags.selected_count() {
            0 => Err(ProgramSelectionError::NotSelected),
            1 if flags.salary => Ok(Program::Salary),
            1 if flags.military => Ok(Program::Military),
            1 => Ok(Program::Base),
            _ => Err(ProgramSelectionError::MultipleSelected),
        }
    }
}

impl From<Program> for ProgramFlags {
    fn from(program: Program) -> Self {
        Self {
            salary: program == Program::Salary,
            military: program == Program::Military,
            base: program == Program::Base,
        }
    }
}

/// A loan request that already passed shape validation.
///
/// Amounts are non-negative and `term_months` lies in `1..=600`; the HTTP
/// layer guarantees this before a request reaches the calculator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanRequest {
    /// Price of the property
    pub object_cost: f64,
    /// Down payment
    pub initial_payment: f64,
    /// Loan term in months
    pub term_months: u32,
    /// Selected program
    pub program: Program,
}

/// Echo of the request parameters inside a calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LoanParams {
    /// Price of the property
    #[serde(serialize_with = "crate::amount::serialize")]
    #[schema(example = 5000000.0)]
    pub object_cost: f64,
    /// Down payment
    #[serde(serialize_with = "crate::amount::serialize")]
    #[schema(example = 1000000.0)]
    pub initial_payment: f64,
    /// Loan term in months
    #[schema(example = 240)]
    pub months: u32,
}

impl From<&LoanRequest> for LoanParams {
    fn from(request: &LoanRequest) -> Self {
        Self {
            object_cost: request.object_cost,
            initial_payment: request.initial_payment,
            months: request.term_months,
        }
    }
}

/// Derived loan figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LoanAggregates {
    /// Annual interest rate, percent
    #[serde(serialize_with = "crate::amount::serialize")]
    #[schema(example = 8.0)]
    pub rate: f64,
    /// Borrowed amount (object cost minus initial payment)
    #[serde(serialize_with = "crate::amount::serialize")]
    #[schema(example = 4000000.0)]
    pub loan_sum: f64,
    /// Monthly annuity payment, rounded to a whole unit
    #[serde(serialize_with = "crate::amount::serialize")]
    #[schema(example = 33458.0)]
    pub monthly_payment: f64,
    /// Interest paid over the whole term, rounded to a whole unit
    #[serde(serialize_with = "crate::amount::serialize")]
    #[schema(example = 4029920.0)]
    pub overpayment: f64,
    /// Date of the final payment
    #[schema(example = "2044-01-01T00:00:00Z")]
    pub last_payment_date: DateTime<Utc>,
}

/// A computed mortgage calculation, as returned to clients and cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LoanCalculation {
    /// Identifier assigned when the calculation is stored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = 1)]
    pub id: Option<u64>,
    /// Request parameters
    pub params: LoanParams,
    /// Selected program
    #[schema(value_type = ProgramFlags)]
    pub program: Program,
    /// Derived figures
    pub aggregates: LoanAggregates,
}

impl LoanCalculation {
    /// Builds an unstored calculation for `request`.
    pub fn new(request: &LoanRequest, aggregates: LoanAggregates) -> Self {
        Self { id: None, params: LoanParams::from(request), program: request.program, aggregates }
    }

    /// Records the identifier assigned by a result store.
    pub fn assign_id(&mut self, id: u64) {
        self.id = Some(id);
    }
}
