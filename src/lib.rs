//! # scholar-irt - adaptive testing core
//!
//! Estimates a learner's latent ability (theta) from right/wrong responses and
//! picks the next item that tells us the most about it, using the
//! three-parameter logistic (3PL) item response model.
//!
//! - **Response model** - probability of a correct answer and Fisher information
//! - **Ability estimator** - single-item online gradient update of theta
//! - **Item selector** - maximum-information choice with stable tie-break
//! - **Mastery** - bounded display transform of theta
//!
//! Every engine operation is a pure, synchronous function of its arguments.
//! Ability, answer history and quiz phase are owned by the caller through
//! [`session::SessionRepository`].
//!
//! ## Modules
//!
//! - [`model`] - 3PL probability, information, test information
//! - [`estimator`] - ability update
//! - [`selector`] - maximum-information selection
//! - [`mastery`] - theta to (0, 1)
//! - [`engine`] - [`CatEngine`], the five operations behind one config
//! - [`bank`] - validated item collections
//! - [`session`] - session records, quiz state machine, repository seam
//! - [`quiz`] - next-question / submit-answer orchestration
//! - [`sanitize`] - numeric safety
//! - [`types`] - shared types and constants
//!
//! ## Example
//!
//! ```rust
//! use scholar_irt::{CatEngine, ItemBank, Selection};
//!
//! let engine = CatEngine::default();
//! let bank = ItemBank::demo();
//!
//! let Selection::Next { item, .. } = engine.select_next(0.0, bank.items()) else {
//!     unreachable!("demo bank is not empty");
//! };
//! let result = engine.update(0.0, item, true);
//! assert!(result.new_theta > 0.0);
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod bank;
pub mod config;
pub mod engine;
pub mod error;
pub mod estimator;
pub mod logging;
pub mod mastery;
pub mod model;
pub mod quiz;
pub mod sanitize;
pub mod selector;
pub mod session;
pub mod simulation;
pub mod types;

// ============================================================================
// Re-exports
// ============================================================================

pub use types::*;

pub use bank::ItemBank;
pub use config::{CliConfig, EngineConfig};
pub use engine::CatEngine;
pub use error::{IrtError, Result};
pub use estimator::update;
pub use mastery::mastery;
pub use model::{information, probability, standard_error, test_information};
pub use quiz::{AnswerOutcome, NextQuestion, QuizService};
pub use selector::{rank_candidates, select_next};
pub use session::{InMemorySessionRepository, LearnerSession, QuizPhase, SessionRepository};
