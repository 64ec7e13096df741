//! Scenario and property test suite for the depletion estimator.
//!
//! Integration tests drive the public API of depletion-core and
//! depletion-engine end to end: schedule files in, estimates out.

pub mod helpers;
