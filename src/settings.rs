//! Run settings for the command-line optimizer.
//!
//! Every field has a default, so a settings file only needs the values it
//! changes:
//!
//! ```json
//! { "ga": { "num_units": 6, "seed": 42 }, "runs": 4 }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CircuitError, Result};
use crate::fitness::{Economics, FitnessEvaluator};
use crate::flow::{Feed, SimulatorConfig};
use crate::ga::GaConfig;

/// Everything one invocation of the optimizer needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    pub ga: GaConfig,
    pub simulator: SimulatorConfig,
    pub feed: Feed,
    pub economics: Economics,
    /// Independent GA runs in the batch.
    pub runs: usize,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            ga: GaConfig::default(),
            simulator: SimulatorConfig::default(),
            feed: Feed::default(),
            economics: Economics::default(),
            runs: 20,
        }
    }
}

impl RunSettings {
    /// Parses settings from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| CircuitError::InvalidConfig(format!("settings: {e}")))
    }

    /// Loads settings from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| CircuitError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<()> {
        self.ga
            .validate()
            .and_then(|_| self.simulator.validate())
            .and_then(|_| self.feed.validate())
            .and_then(|_| self.economics.validate())
            .map_err(CircuitError::InvalidConfig)?;
        if self.runs == 0 {
            return Err(CircuitError::InvalidConfig("runs must be at least 1".into()));
        }
        Ok(())
    }

    /// Builds the evaluator described by these settings.
    pub fn evaluator(&self) -> FitnessEvaluator {
        FitnessEvaluator::with_config(self.simulator.clone(), self.feed, self.economics)
    }
}
