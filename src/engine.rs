use std::borrow::Borrow;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::estimator::update_with;
use crate::mastery::mastery_with;
use crate::model::{
    information_batch, information_with, probability_with, standard_error_from_information,
};
use crate::selector::{rank_candidates, select_next_with};
use crate::types::{Item, Selection, UpdateResult};

/// Stateless adaptive-testing engine.
///
/// Holds only its immutable [`EngineConfig`]; every method is a pure function
/// of its arguments. One instance can be shared read-only across threads, or
/// a fresh one built per call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CatEngine {
    config: EngineConfig,
}

impl CatEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn probability(&self, theta: f64, item: &Item) -> f64 {
        probability_with(theta, item, self.config.exponent_clamp)
    }

    pub fn information(&self, theta: f64, item: &Item) -> f64 {
        information_with(theta, item, self.config.exponent_clamp, self.config.epsilon)
    }

    pub fn update(&self, theta: f64, item: &Item, is_correct: bool) -> UpdateResult {
        update_with(theta, item, is_correct, &self.config)
    }

    pub fn select_next<'a, T>(&self, theta: f64, candidates: &'a [T]) -> Selection<'a>
    where
        T: Borrow<Item> + Sync,
    {
        select_next_with(theta, candidates, &self.config)
    }

    pub fn rank_candidates<T>(&self, theta: f64, candidates: &[T]) -> Vec<(usize, f64)>
    where
        T: Borrow<Item> + Sync,
    {
        rank_candidates(theta, candidates, &self.config)
    }

    pub fn mastery(&self, theta: f64) -> f64 {
        mastery_with(theta, self.config.exponent_clamp)
    }

    pub fn test_information<T>(&self, theta: f64, items: &[T]) -> f64
    where
        T: Borrow<Item> + Sync,
    {
        information_batch(theta, items, self.config.exponent_clamp, self.config.epsilon)
            .into_iter()
            .sum()
    }

    pub fn standard_error<T>(&self, theta: f64, items: &[T]) -> f64
    where
        T: Borrow<Item> + Sync,
    {
        standard_error_from_information(self.test_information(theta, items))
    }
}
