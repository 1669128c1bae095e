//! Adaptive quiz orchestration on top of the stateless engine.
//!
//! `QuizService` is the caller-side collaborator: it loads a learner's
//! session, asks the engine for the next item or an ability update, and
//! writes the session back. Updates for one learner are serialised through a
//! fixed set of lock stripes so two submissions never read the same stale
//! theta.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use parking_lot::Mutex;
use serde::Serialize;

use crate::bank::ItemBank;
use crate::engine::CatEngine;
use crate::error::{IrtError, Result};
use crate::sanitize::{clip, sanitize_theta};
use crate::session::{LearnerSession, QuizEvent, QuizPhase, SessionRepository};
use crate::types::{Item, Selection, UpdateResult};

const LOCK_STRIPES: usize = 16;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NextQuestion {
    Question { item: Item, theta: f64, mastery: f64 },
    Complete { theta: f64, mastery: f64 },
}

impl NextQuestion {
    pub fn item(&self) -> Option<&Item> {
        match self {
            NextQuestion::Question { item, .. } => Some(item),
            NextQuestion::Complete { .. } => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, NextQuestion::Complete { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerOutcome {
    pub result: UpdateResult,
    /// Mastery at the new theta, in (0, 1)
    pub mastery: f64,
    /// No unanswered items remain
    pub complete: bool,
}

pub struct QuizService<R: SessionRepository> {
    engine: CatEngine,
    bank: ItemBank,
    repository: R,
    stripes: Box<[Mutex<()>]>,
}

impl<R: SessionRepository> QuizService<R> {
    pub fn new(engine: CatEngine, bank: ItemBank, repository: R) -> Self {
        let stripes = (0..LOCK_STRIPES).map(|_| Mutex::new(())).collect();
        Self {
            engine,
            bank,
            repository,
            stripes,
        }
    }

    pub fn engine(&self) -> &CatEngine {
        &self.engine
    }

    pub fn bank(&self) -> &ItemBank {
        &self.bank
    }

    pub fn session(&self, learner_id: &str) -> Result<Option<LearnerSession>> {
        self.repository.get(learner_id)
    }

    /// Create (or replace) a learner's session at a starting ability
    pub fn start(&self, learner_id: &str, theta: f64) -> Result<LearnerSession> {
        let _guard = self.lock(learner_id);
        let config = self.engine.config();
        let theta = clip(sanitize_theta(theta), config.theta_min, config.theta_max);
        let session = LearnerSession::new(learner_id, theta);
        self.repository.put(session.clone())?;
        Ok(session)
    }

    pub fn reset(&self, learner_id: &str) -> Result<bool> {
        let _guard = self.lock(learner_id);
        self.repository.delete(learner_id)
    }

    /// Most informative unanswered item, or `Complete` once the bank is used up.
    ///
    /// Asking again while an item is pending returns that same item.
    pub fn next_question(&self, learner_id: &str) -> Result<NextQuestion> {
        let _guard = self.lock(learner_id);
        let mut session = self
            .repository
            .get(learner_id)?
            .unwrap_or_else(|| LearnerSession::new(learner_id, 0.0));

        if session.phase.is_done() {
            return Ok(self.complete(&session));
        }
        let pending = session
            .phase
            .pending_item()
            .and_then(|item_id| self.bank.get(item_id));
        if let Some(item) = pending {
            return Ok(self.question(item, &session));
        }
        // an interrupted update or a pending item that left the bank
        session.phase = QuizPhase::Selecting;

        let remaining = self.bank.remaining(&session.answered);
        match self.engine.select_next(session.theta, &remaining) {
            Selection::Next { item, .. } => {
                session.advance(&QuizEvent::Selected(item.id().to_string()));
                let next = self.question(item, &session);
                self.repository.put(session)?;
                Ok(next)
            }
            Selection::Exhausted => {
                session.advance(&QuizEvent::Exhausted);
                tracing::info!(
                    learner_id = %learner_id,
                    theta = session.theta,
                    answered = session.answered.len(),
                    "quiz complete"
                );
                let done = self.complete(&session);
                self.repository.put(session)?;
                Ok(done)
            }
        }
    }

    /// Record the answer to the pending item and update the learner's ability
    pub fn submit_answer(
        &self,
        learner_id: &str,
        item_id: &str,
        is_correct: bool,
    ) -> Result<AnswerOutcome> {
        let item = self
            .bank
            .get(item_id)
            .ok_or_else(|| IrtError::UnknownItem(item_id.to_string()))?;

        let _guard = self.lock(learner_id);
        let mut session = self
            .repository
            .get(learner_id)?
            .ok_or_else(|| IrtError::SessionNotFound(learner_id.to_string()))?;

        if session.has_answered(item_id) {
            return Err(IrtError::AlreadyAnswered(item_id.to_string()));
        }
        if !session.advance(&QuizEvent::Answered(item_id.to_string())) {
            return Err(IrtError::UnexpectedAnswer {
                expected: session.phase.pending_item().map(str::to_string),
                got: item_id.to_string(),
            });
        }

        let result = self.engine.update(session.theta, item, is_correct);
        session.record(item_id, result);

        let remaining = !self.bank.remaining(&session.answered).is_empty();
        session.advance(&QuizEvent::Updated { remaining });

        if !remaining {
            tracing::info!(
                learner_id = %learner_id,
                theta = session.theta,
                answered = session.answered.len(),
                "quiz complete"
            );
        }

        self.repository.put(session)?;

        Ok(AnswerOutcome {
            result,
            mastery: self.engine.mastery(result.new_theta),
            complete: !remaining,
        })
    }

    /// Standard error of the session's ability over the items it has answered
    pub fn standard_error(&self, session: &LearnerSession) -> f64 {
        let administered: Vec<&Item> = session
            .answered
            .iter()
            .filter_map(|id| self.bank.get(id))
            .collect();
        self.engine.standard_error(session.theta, &administered)
    }

    fn question(&self, item: &Item, session: &LearnerSession) -> NextQuestion {
        NextQuestion::Question {
            item: item.clone(),
            theta: session.theta,
            mastery: self.engine.mastery(session.theta),
        }
    }

    fn complete(&self, session: &LearnerSession) -> NextQuestion {
        NextQuestion::Complete {
            theta: session.theta,
            mastery: self.engine.mastery(session.theta),
        }
    }

    fn lock(&self, learner_id: &str) -> parking_lot::MutexGuard<'_, ()> {
        let mut hasher = DefaultHasher::new();
        learner_id.hash(&mut hasher);
        let stripe = (hasher.finish() as usize) % self.stripes.len();
        self.stripes[stripe].lock()
    }
}
