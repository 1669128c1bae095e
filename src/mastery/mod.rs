//! Display transform from ability to a bounded mastery score.
//!
//! `mastery(theta) = 1 / (1 + exp(-theta))`. Monotonic in theta, carries no
//! calibration claim beyond that.

use crate::sanitize::{logistic, sanitize_theta};
use crate::types::EXPONENT_CLAMP;

/// Mastery in the open interval (0, 1); `mastery(0.0) == 0.5`
pub fn mastery(theta: f64) -> f64 {
    mastery_with(theta, EXPONENT_CLAMP)
}

/// Mastery with an explicit exponent clamp
pub fn mastery_with(theta: f64, exponent_clamp: f64) -> f64 {
    logistic(sanitize_theta(theta), exponent_clamp)
}
