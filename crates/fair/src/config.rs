//! Configuration for the fairness policy.

use serde::{Deserialize, Serialize};
use simcfs_types::{SimTime, NICE_0_WEIGHT};

/// Tunables of the fair-share policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Target time to give every ready task one turn.
    pub scheduling_period: SimTime,

    /// Floor on any single allocated slice.
    pub min_granularity: SimTime,

    /// Weight of a nice-0 task; vruntime is measured in its units.
    pub baseline_weight: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            scheduling_period: 6.0,
            min_granularity: 0.75,
            baseline_weight: NICE_0_WEIGHT,
        }
    }
}

impl SchedulerConfig {
    /// Set the scheduling period.
    pub fn with_scheduling_period(mut self, period: SimTime) -> Self {
        self.scheduling_period = period;
        self
    }

    /// Set the minimum granularity.
    pub fn with_min_granularity(mut self, granularity: SimTime) -> Self {
        self.min_granularity = granularity;
        self
    }

    /// Set the baseline weight.
    pub fn with_baseline_weight(mut self, weight: u32) -> Self {
        self.baseline_weight = weight;
        self
    }

    /// Check that the tunables describe a usable policy.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.scheduling_period.is_finite() && self.scheduling_period > 0.0) {
            return Err(ConfigError::NonPositivePeriod(self.scheduling_period));
        }
        if !(self.min_granularity.is_finite() && self.min_granularity > 0.0) {
            return Err(ConfigError::NonPositiveGranularity(self.min_granularity));
        }
        if self.min_granularity > self.scheduling_period {
            return Err(ConfigError::GranularityExceedsPeriod {
                granularity: self.min_granularity,
                period: self.scheduling_period,
            });
        }
        if self.baseline_weight == 0 {
            return Err(ConfigError::ZeroBaselineWeight);
        }
        Ok(())
    }
}

/// Errors in a [`SchedulerConfig`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Scheduling period is zero, negative or not finite.
    #[error("scheduling period must be positive, got {0}")]
    NonPositivePeriod(SimTime),

    /// Minimum granularity is zero, negative or not finite.
    #[error("minimum granularity must be positive, got {0}")]
    NonPositiveGranularity(SimTime),

    /// Minimum granularity larger than the period.
    #[error("minimum granularity {granularity} exceeds scheduling period {period}")]
    GranularityExceedsPeriod {
        /// Configured granularity.
        granularity: SimTime,
        /// Configured period.
        period: SimTime,
    },

    /// Baseline weight of zero.
    #[error("baseline weight must be non-zero")]
    ZeroBaselineWeight,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SchedulerConfig::default();
        assert_eq!(config.scheduling_period, 6.0);
        assert_eq!(config.min_granularity, 0.75);
        assert_eq!(config.baseline_weight, 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = SchedulerConfig::default();
        assert_eq!(
            base.clone().with_scheduling_period(0.0).validate(),
            Err(ConfigError::NonPositivePeriod(0.0))
        );
        assert!(matches!(
            base.clone().with_min_granularity(-1.0).validate(),
            Err(ConfigError::NonPositiveGranularity(_))
        ));
        assert!(matches!(
            base.clone().with_min_granularity(7.0).validate(),
            Err(ConfigError::GranularityExceedsPeriod { .. })
        ));
        assert_eq!(
            base.with_baseline_weight(0).validate(),
            Err(ConfigError::ZeroBaselineWeight)
        );
    }
}
