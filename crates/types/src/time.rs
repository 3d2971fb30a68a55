//! Simulated time.

use std::cmp::Ordering;

/// A point or span on the simulated clock, in abstract time units.
pub type SimTime = f64;

/// Totally ordered wrapper around a simulated time or vruntime value.
///
/// Used as an ordered-map key. Ordering follows [`f64::total_cmp`], which
/// agrees with `<` for the finite non-negative values the engine produces.
#[derive(Debug, Clone, Copy)]
pub struct TimeKey(pub SimTime);

impl TimeKey {
    /// Get the raw value.
    pub fn get(self) -> SimTime {
        self.0
    }
}

impl PartialEq for TimeKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TimeKey {}

impl PartialOrd for TimeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}
