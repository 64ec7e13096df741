//! # depletion-core
//! Foundation types and traits for the common pool depletion estimator.

pub mod constants;
pub mod error;
pub mod schedule;
pub mod traits;
pub mod types;
pub mod validation;
