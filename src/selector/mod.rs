//! Maximum-Information Item Selection
//!
//! Picks the candidate with the largest Fisher information at the current
//! ability estimate. Ties go to the earliest candidate in input order; there
//! is no randomness.
//!
//! Exposure control and content balancing are not applied here. Callers that
//! need them filter the candidate set before calling [`select_next`].

use std::borrow::Borrow;

use crate::config::EngineConfig;
use crate::model::information_batch;
use crate::sanitize::sanitize_theta;
use crate::types::{Item, Selection};

/// Select with the default engine constants
pub fn select_next<T>(theta: f64, candidates: &[T]) -> Selection<'_>
where
    T: Borrow<Item> + Sync,
{
    select_next_with(theta, candidates, &EngineConfig::default())
}

/// Select with explicit engine constants; `Exhausted` for an empty set
pub fn select_next_with<'a, T>(theta: f64, candidates: &'a [T], config: &EngineConfig) -> Selection<'a>
where
    T: Borrow<Item> + Sync,
{
    if candidates.is_empty() {
        return Selection::Exhausted;
    }

    let theta = sanitize_theta(theta);
    let scores = information_batch(theta, candidates, config.exponent_clamp, config.epsilon);

    let mut best_index = 0;
    let mut best_info = f64::NEG_INFINITY;
    for (index, &info) in scores.iter().enumerate() {
        // strict comparison keeps the first of equal candidates
        if info > best_info {
            best_info = info;
            best_index = index;
        }
    }

    let item: &'a Item = candidates[best_index].borrow();
    tracing::debug!(
        item_id = %item.id(),
        information = best_info,
        candidates = candidates.len(),
        theta,
        "item selected"
    );

    Selection::Next {
        index: best_index,
        item,
        information: best_info,
    }
}

/// `(index, information)` for every candidate, most informative first.
///
/// Equal scores keep input order, so the head of the list always agrees with
/// [`select_next`].
pub fn rank_candidates<T>(theta: f64, candidates: &[T], config: &EngineConfig) -> Vec<(usize, f64)>
where
    T: Borrow<Item> + Sync,
{
    let theta = sanitize_theta(theta);
    let mut ranked: Vec<(usize, f64)> =
        information_batch(theta, candidates, config.exponent_clamp, config.epsilon)
            .into_iter()
            .enumerate()
            .collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}
