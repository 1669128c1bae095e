//! Learner Sessions
//!
//! The engine never stores ability. Sessions live behind
//! [`SessionRepository`], owned by the caller; [`InMemorySessionRepository`]
//! is the process-local implementation used by the CLI and tests.
//!
//! Quiz state machine:
//! - `Selecting` -> `AwaitingAnswer` when an item is selected
//! - `Selecting` -> `Done` when the candidate set is exhausted
//! - `AwaitingAnswer` -> `Updating` when the pending item is answered
//! - `Updating` -> `Selecting` if candidates remain, else `Done`

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::UpdateResult;

// ==================== State machine ====================

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum QuizPhase {
    #[default]
    Selecting,
    AwaitingAnswer {
        item_id: String,
    },
    Updating,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizEvent {
    Selected(String),
    Exhausted,
    Answered(String),
    Updated { remaining: bool },
}

impl QuizPhase {
    /// Next phase for `event`, or `None` if the transition is not allowed
    pub fn transition(&self, event: &QuizEvent) -> Option<QuizPhase> {
        match (self, event) {
            (QuizPhase::Selecting, QuizEvent::Selected(item_id)) => Some(QuizPhase::AwaitingAnswer {
                item_id: item_id.clone(),
            }),
            (QuizPhase::Selecting, QuizEvent::Exhausted) => Some(QuizPhase::Done),
            (QuizPhase::AwaitingAnswer { item_id }, QuizEvent::Answered(answered))
                if item_id == answered =>
            {
                Some(QuizPhase::Updating)
            }
            (QuizPhase::Updating, QuizEvent::Updated { remaining: true }) => {
                Some(QuizPhase::Selecting)
            }
            (QuizPhase::Updating, QuizEvent::Updated { remaining: false }) => Some(QuizPhase::Done),
            _ => None,
        }
    }

    pub fn pending_item(&self) -> Option<&str> {
        match self {
            QuizPhase::AwaitingAnswer { item_id } => Some(item_id),
            _ => None,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, QuizPhase::Done)
    }
}

// ==================== Session record ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnerSession {
    pub learner_id: String,
    pub theta: f64,
    /// Answered item ids in administration order
    pub answered: Vec<String>,
    pub history: Vec<UpdateResult>,
    pub phase: QuizPhase,
    pub updated_at: i64,
}

impl LearnerSession {
    pub fn new(learner_id: impl Into<String>, theta: f64) -> Self {
        Self {
            learner_id: learner_id.into(),
            theta,
            answered: Vec::new(),
            history: Vec::new(),
            phase: QuizPhase::Selecting,
            updated_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn has_answered(&self, item_id: &str) -> bool {
        self.answered.iter().any(|id| id == item_id)
    }

    /// Apply `event`; returns false and leaves the phase untouched if illegal
    pub fn advance(&mut self, event: &QuizEvent) -> bool {
        match self.phase.transition(event) {
            Some(next) => {
                self.phase = next;
                self.updated_at = chrono::Utc::now().timestamp_millis();
                true
            }
            None => false,
        }
    }

    /// Append a finished estimation step and adopt its ability estimate
    pub fn record(&mut self, item_id: &str, result: UpdateResult) {
        self.answered.push(item_id.to_string());
        self.history.push(result);
        self.theta = result.new_theta;
        self.updated_at = chrono::Utc::now().timestamp_millis();
    }
}

// ==================== Repository ====================

/// Storage seam for learner sessions.
///
/// Implementations must be safe to share across threads. Serialising
/// concurrent updates for one learner is the caller's job (see
/// `QuizService`), not the repository's.
pub trait SessionRepository: Send + Sync {
    fn get(&self, learner_id: &str) -> Result<Option<LearnerSession>>;

    fn put(&self, session: LearnerSession) -> Result<()>;

    /// Returns whether a session existed
    fn delete(&self, learner_id: &str) -> Result<bool>;
}

#[derive(Debug, Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<String, LearnerSession>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

impl SessionRepository for InMemorySessionRepository {
    fn get(&self, learner_id: &str) -> Result<Option<LearnerSession>> {
        Ok(self.sessions.read().get(learner_id).cloned())
    }

    fn put(&self, session: LearnerSession) -> Result<()> {
        self.sessions
            .write()
            .insert(session.learner_id.clone(), session);
        Ok(())
    }

    fn delete(&self, learner_id: &str) -> Result<bool> {
        Ok(self.sessions.write().remove(learner_id).is_some())
    }
}

impl<R: SessionRepository + ?Sized> SessionRepository for std::sync::Arc<R> {
    fn get(&self, learner_id: &str) -> Result<Option<LearnerSession>> {
        (**self).get(learner_id)
    }

    fn put(&self, session: LearnerSession) -> Result<()> {
        (**self).put(session)
    }

    fn delete(&self, learner_id: &str) -> Result<bool> {
        (**self).delete(learner_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_cycle_transitions() {
        let phase = QuizPhase::Selecting;
        let phase = phase.transition(&QuizEvent::Selected("q2".into())).unwrap();
        assert_eq!(phase.pending_item(), Some("q2"));

        let phase = phase.transition(&QuizEvent::Answered("q2".into())).unwrap();
        assert_eq!(phase, QuizPhase::Updating);

        let phase = phase
            .transition(&QuizEvent::Updated { remaining: true })
            .unwrap();
        assert_eq!(phase, QuizPhase::Selecting);

        let phase = phase.transition(&QuizEvent::Exhausted).unwrap();
        assert!(phase.is_done());
    }

    #[test]
    fn test_illegal_transitions_rejected() {
        let awaiting = QuizPhase::AwaitingAnswer {
            item_id: "q1".into(),
        };
        assert!(awaiting.transition(&QuizEvent::Answered("q2".into())).is_none());
        assert!(awaiting.transition(&QuizEvent::Exhausted).is_none());
        assert!(QuizPhase::Selecting
            .transition(&QuizEvent::Answered("q1".into()))
            .is_none());
        assert!(QuizPhase::Done
            .transition(&QuizEvent::Selected("q1".into()))
            .is_none());
        assert_eq!(
            QuizPhase::Updating.transition(&QuizEvent::Updated { remaining: false }),
            Some(QuizPhase::Done)
        );
    }

    #[test]
    fn test_session_advance_keeps_phase_on_illegal_event() {
        let mut session = LearnerSession::new("u1", 0.0);
        assert!(!session.advance(&QuizEvent::Answered("q1".into())));
        assert_eq!(session.phase, QuizPhase::Selecting);
        assert!(session.advance(&QuizEvent::Selected("q1".into())));
    }

    #[test]
    fn test_in_memory_repository_crud() {
        let repo = InMemorySessionRepository::new();
        assert!(repo.get("u1").unwrap().is_none());

        let mut session = LearnerSession::new("u1", 0.5);
        session.record(
            "q1",
            UpdateResult {
                old_theta: 0.5,
                new_theta: 0.8,
                delta: 1.0,
                is_correct: true,
            },
        );
        repo.put(session.clone()).unwrap();
        assert_eq!(repo.len(), 1);

        let loaded = repo.get("u1").unwrap().unwrap();
        assert_eq!(loaded, session);
        assert_eq!(loaded.theta, 0.8);
        assert!(loaded.has_answered("q1"));

        assert!(repo.delete("u1").unwrap());
        assert!(!repo.delete("u1").unwrap());
        assert!(repo.is_empty());
    }

    #[test]
    fn test_phase_serialization_is_tagged() {
        let phase = QuizPhase::AwaitingAnswer {
            item_id: "q4".into(),
        };
        let json = serde_json::to_value(&phase).unwrap();
        assert_eq!(json["phase"], "awaiting_answer");
        assert_eq!(json["item_id"], "q4");
    }
}
