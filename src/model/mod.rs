//! 3PL Response Model
//!
//! Probability of a correct response and Fisher information under the
//! three-parameter logistic model.
//!
//! Core formulas:
//! - `z = a * (theta - b)`
//! - `P = c + (1 - c) / (1 + exp(-z))`
//! - `I = a^2 * (P - c)^2 * Q / ((1 - c)^2 * P + eps)`, `Q = 1 - P`
//!
//! The exponent is clamped before evaluation and every denominator carries an
//! epsilon floor, so all functions return finite values for any valid item
//! and any theta.

use std::borrow::Borrow;

use rayon::prelude::*;

use crate::sanitize::{logistic, sanitize_theta};
use crate::types::{Item, EPSILON, EXPONENT_CLAMP};

// ==================== Constants ====================

/// Candidate sets at least this large are scored on the rayon pool
pub const PARALLEL_THRESHOLD: usize = 512;

// ==================== Probability ====================

/// P(correct | theta, item) with the default exponent clamp.
///
/// Lies in `[item.guessing(), 1.0]` and is non-decreasing in theta
/// (strictly increasing while `|a * (theta - b)|` is below the clamp).
pub fn probability(theta: f64, item: &Item) -> f64 {
    probability_with(theta, item, EXPONENT_CLAMP)
}

/// P(correct | theta, item) with an explicit exponent clamp
pub fn probability_with(theta: f64, item: &Item, exponent_clamp: f64) -> f64 {
    let theta = sanitize_theta(theta);
    let c = item.guessing();
    let z = item.discrimination() * (theta - item.difficulty());
    let p = c + (1.0 - c) * logistic(z, exponent_clamp);
    // c + (1 - c) can round one ulp above 1
    p.min(1.0)
}

// ==================== Information ====================

/// Fisher information of `item` at `theta` with default constants
pub fn information(theta: f64, item: &Item) -> f64 {
    information_with(theta, item, EXPONENT_CLAMP, EPSILON)
}

/// Fisher information with explicit exponent clamp and epsilon floor.
///
/// Always `>= 0` and finite. Zero discrimination yields exactly zero; values
/// beyond the `f64` range saturate at `f64::MAX`.
pub fn information_with(theta: f64, item: &Item, exponent_clamp: f64, epsilon: f64) -> f64 {
    let a = item.discrimination();
    if a <= 0.0 {
        return 0.0;
    }

    let c = item.guessing();
    let p = probability_with(theta, item, exponent_clamp);
    let q = 1.0 - p;

    // a * (p - c) stays finite for any finite a; only the square can overflow
    let slope = a * (p - c);
    let numerator = slope * (slope * q);
    let denominator = (1.0 - c).powi(2) * p + epsilon;
    (numerator / denominator).max(0.0).min(f64::MAX)
}

/// Per-item information in input order; large sets are scored in parallel
pub fn information_batch<T>(theta: f64, items: &[T], exponent_clamp: f64, epsilon: f64) -> Vec<f64>
where
    T: Borrow<Item> + Sync,
{
    if items.len() >= PARALLEL_THRESHOLD {
        items
            .par_iter()
            .map(|item| information_with(theta, item.borrow(), exponent_clamp, epsilon))
            .collect()
    } else {
        items
            .iter()
            .map(|item| information_with(theta, item.borrow(), exponent_clamp, epsilon))
            .collect()
    }
}

// ==================== Test-level precision ====================

/// Sum of item information over `items`
pub fn test_information<T>(theta: f64, items: &[T]) -> f64
where
    T: Borrow<Item> + Sync,
{
    information_batch(theta, items, EXPONENT_CLAMP, EPSILON)
        .into_iter()
        .sum()
}

/// Standard error of measurement, `1 / sqrt(test information)`.
///
/// Infinite when the items carry no information at `theta` (including an
/// empty set).
pub fn standard_error<T>(theta: f64, items: &[T]) -> f64
where
    T: Borrow<Item> + Sync,
{
    standard_error_from_information(test_information(theta, items))
}

pub(crate) fn standard_error_from_information(total: f64) -> f64 {
    if total > 0.0 {
        1.0 / total.sqrt()
    } else {
        f64::INFINITY
    }
}
