use serde::{Deserialize, Serialize};

use crate::error::{IrtError, Result};
use crate::sanitize::{validate_discrimination, validate_finite, validate_guessing};

// ==================== Constants ====================

/// Step size applied to the gradient in an ability update
pub const DEFAULT_LEARNING_RATE: f64 = 0.3;

/// Floor added to denominators that may approach zero
pub const EPSILON: f64 = 1e-9;

/// Logistic exponent arguments are clamped to `[-EXPONENT_CLAMP, EXPONENT_CLAMP]`
pub const EXPONENT_CLAMP: f64 = 35.0;

/// Lower bound of the ability scale
pub const THETA_MIN: f64 = -4.0;

/// Upper bound of the ability scale
pub const THETA_MAX: f64 = 4.0;

/// Lower asymptote used when an item does not specify one
pub const DEFAULT_GUESSING: f64 = 0.25;

// ==================== Item ====================

/// One calibrated test question.
///
/// Fields are private so every `Item` in circulation has passed validation:
/// `discrimination > 0`, `0 <= guessing < 1`, all parameters finite.
/// Deserialization goes through the same checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ItemSpec")]
pub struct Item {
    id: String,
    concept: String,
    subject: String,
    difficulty: f64,
    discrimination: f64,
    guessing: f64,
}

impl Item {
    pub fn new(
        id: impl Into<String>,
        concept: impl Into<String>,
        subject: impl Into<String>,
        difficulty: f64,
        discrimination: f64,
        guessing: f64,
    ) -> Result<Self> {
        let id = id.into();
        validate_finite(&id, "difficulty", difficulty)?;
        validate_discrimination(&id, discrimination)?;
        validate_guessing(&id, guessing)?;

        Ok(Self {
            id,
            concept: concept.into(),
            subject: subject.into(),
            difficulty,
            discrimination,
            guessing,
        })
    }

    /// Compiled-in item whose parameters are known to be valid; checked in debug builds
    pub(crate) fn preset(
        id: &str,
        concept: &str,
        subject: &str,
        difficulty: f64,
        discrimination: f64,
        guessing: f64,
    ) -> Self {
        debug_assert!(
            Self::new(id, concept, subject, difficulty, discrimination, guessing).is_ok(),
            "invalid preset item {id}"
        );
        Self {
            id: id.to_string(),
            concept: concept.to_string(),
            subject: subject.to_string(),
            difficulty,
            discrimination,
            guessing,
        }
    }

    /// Item without classification tags, using [`DEFAULT_GUESSING`]
    pub fn calibrated(id: impl Into<String>, difficulty: f64, discrimination: f64) -> Result<Self> {
        Self::new(id, "", "", difficulty, discrimination, DEFAULT_GUESSING)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn concept(&self) -> &str {
        &self.concept
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// b parameter
    pub fn difficulty(&self) -> f64 {
        self.difficulty
    }

    /// a parameter
    pub fn discrimination(&self) -> f64 {
        self.discrimination
    }

    /// c parameter
    pub fn guessing(&self) -> f64 {
        self.guessing
    }
}

/// Wire shape of an item before validation
#[derive(Debug, Clone, Deserialize)]
struct ItemSpec {
    id: String,
    #[serde(default)]
    concept: String,
    #[serde(default)]
    subject: String,
    difficulty: f64,
    discrimination: f64,
    #[serde(default = "default_guessing")]
    guessing: f64,
}

fn default_guessing() -> f64 {
    DEFAULT_GUESSING
}

impl TryFrom<ItemSpec> for Item {
    type Error = IrtError;

    fn try_from(raw: ItemSpec) -> Result<Self> {
        Item::new(
            raw.id,
            raw.concept,
            raw.subject,
            raw.difficulty,
            raw.discrimination,
            raw.guessing,
        )
    }
}

// ==================== Results ====================

/// Record of one estimation step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpdateResult {
    pub old_theta: f64,
    pub new_theta: f64,
    /// Unscaled gradient step; `new_theta - old_theta` before clamping is `learning_rate * delta`
    pub delta: f64,
    pub is_correct: bool,
}

/// Outcome of a maximum-information scan over a candidate set
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection<'a> {
    Next {
        /// Position of the item in the candidate slice
        index: usize,
        item: &'a Item,
        information: f64,
    },
    /// The candidate set was empty; the test is complete
    Exhausted,
}

impl<'a> Selection<'a> {
    pub fn item(&self) -> Option<&'a Item> {
        match self {
            Selection::Next { item, .. } => Some(item),
            Selection::Exhausted => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Selection::Exhausted)
    }
}
