//! Simulated learner for exercising an adaptive quiz end to end.
//!
//! Responses are drawn from the 3PL probability at a fixed true ability using
//! a seeded ChaCha8 generator, so a given seed always replays the same quiz.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::error::Result;
use crate::quiz::{NextQuestion, QuizService};
use crate::session::{LearnerSession, SessionRepository};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationStep {
    pub item_id: String,
    pub difficulty: f64,
    pub is_correct: bool,
    pub old_theta: f64,
    pub new_theta: f64,
    pub mastery: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub learner_id: String,
    pub true_theta: f64,
    pub final_theta: f64,
    pub mastery: f64,
    pub standard_error: f64,
    pub steps: Vec<SimulationStep>,
}

#[derive(Debug, Clone)]
pub struct SimulatedLearner {
    true_theta: f64,
    rng: ChaCha8Rng,
}

impl SimulatedLearner {
    pub fn new(true_theta: f64, seed: u64) -> Self {
        Self {
            true_theta,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn true_theta(&self) -> f64 {
        self.true_theta
    }

    /// Answer correctly with the given probability
    pub fn respond(&mut self, p_correct: f64) -> bool {
        self.rng.gen::<f64>() < p_correct
    }
}

/// Run one learner through the quiz until the bank is exhausted or
/// `max_items` answers have been given
pub fn run<R: SessionRepository>(
    quiz: &QuizService<R>,
    learner_id: &str,
    learner: &mut SimulatedLearner,
    max_items: Option<usize>,
) -> Result<SimulationReport> {
    quiz.start(learner_id, 0.0)?;
    let mut steps = Vec::new();

    while max_items.map_or(true, |limit| steps.len() < limit) {
        let item = match quiz.next_question(learner_id)? {
            NextQuestion::Question { item, .. } => item,
            NextQuestion::Complete { .. } => break,
        };

        let p = quiz.engine().probability(learner.true_theta(), &item);
        let is_correct = learner.respond(p);
        let outcome = quiz.submit_answer(learner_id, item.id(), is_correct)?;

        tracing::info!(
            learner_id = %learner_id,
            item_id = %item.id(),
            is_correct,
            theta = outcome.result.new_theta,
            "answer simulated"
        );

        steps.push(SimulationStep {
            item_id: item.id().to_string(),
            difficulty: item.difficulty(),
            is_correct,
            old_theta: outcome.result.old_theta,
            new_theta: outcome.result.new_theta,
            mastery: outcome.mastery,
        });

        if outcome.complete {
            break;
        }
    }

    let session = quiz
        .session(learner_id)?
        .unwrap_or_else(|| LearnerSession::new(learner_id, 0.0));

    Ok(SimulationReport {
        learner_id: learner_id.to_string(),
        true_theta: learner.true_theta(),
        final_theta: session.theta,
        mastery: quiz.engine().mastery(session.theta),
        standard_error: quiz.standard_error(&session),
        steps,
    })
}
