//! Numeric Safety
//!
//! Guards that keep every engine output finite and in range.
//!
//! Functions:
//! - Exponent clamping and a saturating logistic curve
//! - Theta sanitising and bound clipping
//! - Item parameter validation (used at construction only)

use crate::error::{IrtError, Result};

/// Clamp a logistic exponent argument; NaN maps to the curve midpoint
#[inline]
pub fn clamp_exponent(z: f64, limit: f64) -> f64 {
    if z.is_nan() {
        return 0.0;
    }
    let limit = limit.abs();
    z.max(-limit).min(limit)
}

/// `1 / (1 + exp(-x))` with the argument clamped to `[-limit, limit]`
#[inline]
pub fn logistic(x: f64, limit: f64) -> f64 {
    let z = clamp_exponent(x, limit);
    1.0 / (1.0 + (-z).exp())
}

/// Clip to `[min, max]` without panicking on inverted bounds
#[inline]
pub fn clip(x: f64, min: f64, max: f64) -> f64 {
    x.max(min).min(max)
}

/// Replace a NaN ability with the scale origin; infinities are left for the caller's clamp
#[inline]
pub fn sanitize_theta(theta: f64) -> f64 {
    if theta.is_nan() {
        0.0
    } else {
        theta
    }
}

pub fn validate_finite(item_id: &str, parameter: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(item_id, parameter, value))
    }
}

/// a > 0
pub fn validate_discrimination(item_id: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(item_id, "discrimination", value))
    }
}

/// 0 <= c < 1
pub fn validate_guessing(item_id: &str, value: f64) -> Result<()> {
    if (0.0..1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(item_id, "guessing", value))
    }
}

fn invalid(item_id: &str, parameter: &'static str, value: f64) -> IrtError {
    IrtError::InvalidItemParameter {
        item_id: item_id.to_string(),
        parameter,
        value,
    }
}
