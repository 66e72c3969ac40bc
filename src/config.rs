//! Engine configuration, loadable from TOML.
//!
//! ```toml
//! scoring = "length_weighted"
//! start = ""
//!
//! [learner]
//! kind = "poisson"
//! sigma = 3.0
//! floor = 20
//! ```

use crate::error::ConfigError;
use crate::learner::{FixedThreshold, Never, Policy, PoissonSignificance};
use crate::predict::Scoring;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub learner: LearnerConfig,
    pub scoring: Scoring,
    /// Name of the symbol readers start from; empty means the root.
    pub start: String,
}

/// Which promotion policy to run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LearnerConfig {
    Never,
    FixedThreshold {
        #[serde(default = "default_threshold")]
        threshold: u64,
    },
    Poisson {
        #[serde(default = "default_sigma")]
        sigma: f64,
        #[serde(default = "default_floor")]
        floor: u64,
    },
}

fn default_threshold() -> u64 {
    FixedThreshold::default().0
}

fn default_sigma() -> f64 {
    PoissonSignificance::default().sigma
}

fn default_floor() -> u64 {
    PoissonSignificance::DEFAULT_FLOOR
}

impl Default for LearnerConfig {
    fn default() -> Self {
        LearnerConfig::FixedThreshold {
            threshold: default_threshold(),
        }
    }
}

impl LearnerConfig {
    /// Builds the configured policy.
    pub fn build(&self) -> Policy {
        match *self {
            LearnerConfig::Never => Never.into(),
            LearnerConfig::FixedThreshold { threshold } => FixedThreshold(threshold).into(),
            LearnerConfig::Poisson { sigma, floor } => {
                PoissonSignificance::with_floor(sigma, floor).into()
            }
        }
    }
}

impl EngineConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.learner {
            LearnerConfig::FixedThreshold { threshold: 0 } => Err(ConfigError::Invalid(
                "fixed_threshold.threshold must be at least 1".to_string(),
            )),
            LearnerConfig::Poisson { sigma, .. } if !sigma.is_finite() || sigma < 0.0 => {
                Err(ConfigError::Invalid(format!(
                    "poisson.sigma must be a finite non-negative number, got {sigma}"
                )))
            }
            _ => Ok(()),
        }
    }
}
