use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{IrtError, Result};
use crate::types::{DEFAULT_LEARNING_RATE, EPSILON, EXPONENT_CLAMP, THETA_MAX, THETA_MIN};

/// Numeric constants of the estimation engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub learning_rate: f64,
    pub epsilon: f64,
    pub exponent_clamp: f64,
    pub theta_min: f64,
    pub theta_max: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            learning_rate: DEFAULT_LEARNING_RATE,
            epsilon: EPSILON,
            exponent_clamp: EXPONENT_CLAMP,
            theta_min: THETA_MIN,
            theta_max: THETA_MAX,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `IRT_*` environment variables; unparsable values are ignored
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            learning_rate: env_f64("IRT_LEARNING_RATE").unwrap_or(defaults.learning_rate),
            epsilon: env_f64("IRT_EPSILON").unwrap_or(defaults.epsilon),
            exponent_clamp: env_f64("IRT_EXPONENT_CLAMP").unwrap_or(defaults.exponent_clamp),
            theta_min: env_f64("IRT_THETA_MIN").unwrap_or(defaults.theta_min),
            theta_max: env_f64("IRT_THETA_MAX").unwrap_or(defaults.theta_max),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(IrtError::InvalidConfig(format!(
                "learning_rate must be finite and positive, got {}",
                self.learning_rate
            )));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(IrtError::InvalidConfig(format!(
                "epsilon must be finite and positive, got {}",
                self.epsilon
            )));
        }
        if !(self.exponent_clamp.is_finite() && self.exponent_clamp > 0.0) {
            return Err(IrtError::InvalidConfig(format!(
                "exponent_clamp must be finite and positive, got {}",
                self.exponent_clamp
            )));
        }
        if !(self.theta_min.is_finite() && self.theta_max.is_finite())
            || self.theta_min >= self.theta_max
        {
            return Err(IrtError::InvalidConfig(format!(
                "theta bounds must be finite with min < max, got [{}, {}]",
                self.theta_min, self.theta_max
            )));
        }
        Ok(())
    }
}

/// Settings for the `scholar-irt` simulation binary
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub log_level: String,
    /// Rolling log file directory; `None` logs to stderr only
    pub log_dir: Option<PathBuf>,
    pub bank_path: Option<String>,
    pub true_theta: f64,
    pub seed: u64,
    pub max_items: Option<usize>,
    pub engine: EngineConfig,
}

impl CliConfig {
    pub fn from_env() -> Self {
        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let file_logs = std::env::var("ENABLE_FILE_LOGS")
            .map(|value| value == "true" || value == "1")
            .unwrap_or(false);
        let log_dir = file_logs.then(|| {
            std::env::var("LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./logs"))
        });
        let bank_path = std::env::var("IRT_BANK_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty());
        let true_theta = env_f64("IRT_TRUE_THETA").unwrap_or(0.5);
        let seed = std::env::var("IRT_SEED")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(42);
        let max_items = std::env::var("IRT_MAX_ITEMS")
            .ok()
            .and_then(|value| value.parse::<usize>().ok());

        Self {
            log_level,
            log_dir,
            bank_path,
            true_theta,
            seed,
            max_items,
            engine: EngineConfig::from_env(),
        }
    }
}

fn env_f64(key: &str) -> Option<f64> {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<f64>().ok())
}
