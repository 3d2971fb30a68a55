//! Engine configuration.

use simcfs_fair::SchedulerConfig;
use std::time::Duration;

/// Configuration for a simulation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineConfig {
    /// Fairness tunables.
    pub scheduler: SchedulerConfig,

    /// Abort after this many decision points.
    ///
    /// Guards against input that would produce an effectively unbounded
    /// number of events.
    pub max_events: Option<u64>,

    /// Abort when the run takes longer than this in real time.
    pub wall_clock_budget: Option<Duration>,
}

impl EngineConfig {
    /// Create a configuration with the given scheduler tunables.
    pub fn new(scheduler: SchedulerConfig) -> Self {
        Self {
            scheduler,
            ..Default::default()
        }
    }

    /// Limit the number of decision points.
    pub fn with_max_events(mut self, max_events: u64) -> Self {
        self.max_events = Some(max_events);
        self
    }

    /// Limit the real time a run may take.
    pub fn with_wall_clock_budget(mut self, budget: Duration) -> Self {
        self.wall_clock_budget = Some(budget);
        self
    }
}
