//! # depletion-engine — Common pool depletion estimator.
//!
//! Projects when a fixed common pool runs dry under a reward-cap policy:
//! - **Decay phase**: while the scheduled annualized rate is still above the
//!   cap, the pool is drawn down by the compounded daily reward factors.
//! - **Locked phase**: once rates would fall to the cap, the per-epoch rate is
//!   frozen and the remaining pool is paid out at that constant rate; the
//!   epoch count is the logarithmic root of the compounding equation.
//! - **Earnings**: a validator's monthly take at the final locked rate.

pub mod earnings;
pub mod engine;

pub use earnings::{monthly_earnings, EarningsProjection};
pub use engine::{estimate, DepletionEngine};
