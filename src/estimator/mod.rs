//! Online Ability Estimator
//!
//! Single-item gradient step that tracks a learner's ability as responses
//! arrive. This is a point-estimate approximation of sequential maximum
//! likelihood; no prior or variance is carried between steps.
//!
//! Algorithm:
//! 1. `P = probability(theta, item)`
//! 2. `I = information(theta, item)`
//! 3. `delta = (y - P) / (I + eps)`, `y = 1` if correct else `0`
//! 4. `theta' = clamp(theta + learning_rate * delta, theta_min, theta_max)`
//!
//! A flat item (information near zero) makes `delta` large but finite thanks
//! to the epsilon floor; the clamp bounds the result regardless.

use crate::config::EngineConfig;
use crate::model::{information_with, probability_with};
use crate::sanitize::{clip, sanitize_theta};
use crate::types::{Item, UpdateResult};

/// Update with the default engine constants
pub fn update(theta: f64, item: &Item, is_correct: bool) -> UpdateResult {
    update_with(theta, item, is_correct, &EngineConfig::default())
}

/// Update with explicit engine constants
pub fn update_with(theta: f64, item: &Item, is_correct: bool, config: &EngineConfig) -> UpdateResult {
    let old_theta = sanitize_theta(theta);

    let p = probability_with(old_theta, item, config.exponent_clamp);
    let info = information_with(old_theta, item, config.exponent_clamp, config.epsilon);

    let observed = if is_correct { 1.0 } else { 0.0 };
    let delta = (observed - p) / (info + config.epsilon);

    let new_theta = clip(
        old_theta + config.learning_rate * delta,
        config.theta_min,
        config.theta_max,
    );

    tracing::debug!(
        item_id = %item.id(),
        old_theta,
        new_theta,
        delta,
        is_correct,
        "ability updated"
    );

    UpdateResult {
        old_theta,
        new_theta,
        delta,
        is_correct,
    }
}
