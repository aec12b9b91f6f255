//! Mortgage Types
//!
//! This crate defines the data model shared by the mortgage calculator and
//! the HTTP service: the loan request handed to the calculator, the mortgage
//! program selection, and the calculation result that is cached and served
//! back to clients.
//!
//! The serde representation of these types is the service's wire format, so
//! renaming a field here is a breaking change for existing clients.

#![warn(missing_docs)]

mod amount;
mod types;

pub use types::{
    LoanAggregates, LoanCalculation, LoanParams, LoanRequest, Program, ProgramFlags,
    ProgramSelectionError,
};
