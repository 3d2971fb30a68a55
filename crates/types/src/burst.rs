//! CPU and I/O demand bursts.

use crate::{SimTime, TypeError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which resource a burst consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BurstKind {
    /// Needs the CPU.
    Cpu,
    /// Waits on simulated I/O.
    Io,
}

impl fmt::Display for BurstKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BurstKind::Cpu => f.write_str("CPU"),
            BurstKind::Io => f.write_str("IO"),
        }
    }
}

/// A contiguous demand for one resource.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Burst {
    /// Resource consumed.
    pub kind: BurstKind,
    /// Simulated duration, strictly positive.
    pub duration: SimTime,
}

impl Burst {
    /// Create a burst, rejecting non-positive or non-finite durations.
    pub fn new(kind: BurstKind, duration: SimTime) -> Result<Self, TypeError> {
        if duration.is_finite() && duration > 0.0 {
            Ok(Self { kind, duration })
        } else {
            Err(TypeError::NonPositiveDuration { kind, duration })
        }
    }

    /// Create a CPU burst.
    pub fn cpu(duration: SimTime) -> Result<Self, TypeError> {
        Self::new(BurstKind::Cpu, duration)
    }

    /// Create an I/O burst.
    pub fn io(duration: SimTime) -> Result<Self, TypeError> {
        Self::new(BurstKind::Io, duration)
    }

    /// Check if this burst needs the CPU.
    pub fn is_cpu(&self) -> bool {
        self.kind == BurstKind::Cpu
    }
}

impl fmt::Display for Burst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind, self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_rejects_bad_durations() {
        assert!(Burst::cpu(1.0).is_ok());
        assert!(Burst::cpu(0.0).is_err());
        assert!(Burst::io(-2.0).is_err());
        assert!(Burst::io(f64::NAN).is_err());
        assert!(Burst::cpu(f64::INFINITY).is_err());
    }

    #[test]
    fn test_burst_kind_serde() {
        let json = serde_json::to_string(&BurstKind::Io).unwrap();
        assert_eq!(json, "\"IO\"");
    }
}
