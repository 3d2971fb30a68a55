//! Errors raised when constructing core types.

use crate::BurstKind;

/// Errors that can occur when building validated types from raw values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TypeError {
    /// Nice value outside the supported `-20..=19` range.
    #[error("nice value {nice} is outside the supported range {min}..={max}")]
    NiceOutOfRange {
        /// The rejected value.
        nice: i32,
        /// Lowest accepted nice value.
        min: i32,
        /// Highest accepted nice value.
        max: i32,
    },

    /// Burst duration that is zero, negative or not a finite number.
    #[error("{kind} burst duration must be a positive finite number, got {duration}")]
    NonPositiveDuration {
        /// Kind of the rejected burst.
        kind: BurstKind,
        /// The rejected duration.
        duration: f64,
    },
}
