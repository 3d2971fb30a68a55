//! Configuration file for simulator runs.
//!
//! ```toml
//! [scheduler]
//! scheduling_period = 6.0
//! min_granularity = 0.75
//! baseline_weight = 1024
//!
//! [run]
//! max_events = 1000000
//! budget = "5s"
//! ```
//!
//! Every key is optional.

use serde::{Deserialize, Serialize};
use simcfs_fair::{ConfigError, SchedulerConfig};
use simcfs_simulation::EngineConfig;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not valid TOML or has unknown keys.
    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// The wall-clock budget is not a duration.
    #[error("invalid budget {value:?}: {source}")]
    Budget {
        /// Text as written.
        value: String,
        /// Underlying error.
        source: humantime::DurationError,
    },

    /// Scheduler tunables are inconsistent.
    #[error(transparent)]
    Scheduler(#[from] ConfigError),
}

/// Limits for a single run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunSection {
    /// Abort after this many decision points.
    pub max_events: Option<u64>,

    /// Wall-clock budget, e.g. `"5s"` or `"250ms"`.
    pub budget: Option<String>,
}

/// Top-level configuration file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulatorConfig {
    /// Fairness tunables.
    pub scheduler: SchedulerConfig,

    /// Run limits.
    pub run: RunSection,
}

impl SimulatorConfig {
    /// Parse from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigFileError> {
        Ok(toml::from_str(text)?)
    }

    /// Load from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigFileError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Set the scheduling period.
    pub fn with_scheduling_period(mut self, period: f64) -> Self {
        self.scheduler = self.scheduler.with_scheduling_period(period);
        self
    }

    /// Set the minimum granularity.
    pub fn with_min_granularity(mut self, granularity: f64) -> Self {
        self.scheduler = self.scheduler.with_min_granularity(granularity);
        self
    }

    /// Set the event cap.
    pub fn with_max_events(mut self, max_events: u64) -> Self {
        self.run.max_events = Some(max_events);
        self
    }

    /// Set the wall-clock budget.
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.run.budget = Some(humantime::format_duration(budget).to_string());
        self
    }

    /// Parsed wall-clock budget, if any.
    pub fn budget(&self) -> Result<Option<Duration>, ConfigFileError> {
        self.run
            .budget
            .as_deref()
            .map(|value| {
                humantime::parse_duration(value).map_err(|source| ConfigFileError::Budget {
                    value: value.to_string(),
                    source,
                })
            })
            .transpose()
    }

    /// Validate and convert to an engine configuration.
    pub fn engine_config(&self) -> Result<EngineConfig, ConfigFileError> {
        self.scheduler.validate()?;
        let mut config = EngineConfig::new(self.scheduler.clone());
        if let Some(max_events) = self.run.max_events {
            config = config.with_max_events(max_events);
        }
        if let Some(budget) = self.budget()? {
            config = config.with_wall_clock_budget(budget);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = SimulatorConfig::from_toml_str("").unwrap();
        assert_eq!(config, SimulatorConfig::default());
        let engine = config.engine_config().unwrap();
        assert_eq!(engine.scheduler.scheduling_period, 6.0);
        assert_eq!(engine.max_events, None);
    }

    #[test]
    fn test_full_file() {
        let config = SimulatorConfig::from_toml_str(
            r#"
            [scheduler]
            scheduling_period = 12.0
            min_granularity = 1.5

            [run]
            max_events = 500
            budget = "250ms"
            "#,
        )
        .unwrap();
        let engine = config.engine_config().unwrap();
        assert_eq!(engine.scheduler.scheduling_period, 12.0);
        assert_eq!(engine.scheduler.min_granularity, 1.5);
        assert_eq!(engine.scheduler.baseline_weight, 1024);
        assert_eq!(engine.max_events, Some(500));
        assert_eq!(engine.wall_clock_budget, Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let err = SimulatorConfig::from_toml_str("[scheduler]\nperiod = 3.0\n").unwrap_err();
        assert!(matches!(err, ConfigFileError::Toml(_)));
    }

    #[test]
    fn test_rejects_bad_budget() {
        let config = SimulatorConfig::from_toml_str("[run]\nbudget = \"soon\"\n").unwrap();
        assert!(matches!(
            config.engine_config(),
            Err(ConfigFileError::Budget { .. })
        ));
    }

    #[test]
    fn test_rejects_inconsistent_scheduler() {
        let config = SimulatorConfig::default()
            .with_scheduling_period(1.0)
            .with_min_granularity(2.0);
        assert!(matches!(
            config.engine_config(),
            Err(ConfigFileError::Scheduler(_))
        ));
    }

    #[test]
    fn test_budget_builder_round_trips_through_text() {
        let config = SimulatorConfig::default().with_budget(Duration::from_secs(5));
        assert_eq!(config.run.budget.as_deref(), Some("5s"));
        assert_eq!(config.budget().unwrap(), Some(Duration::from_secs(5)));
    }
}
