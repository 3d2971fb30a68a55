//! Domain-specific identifier types.

use crate::{TypeError, NICE_TO_WEIGHT};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task identifier, as given in the input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    /// Create a task identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Static task priority. Lower values mean higher priority.
///
/// Always within `Nice::MIN..=Nice::MAX`; the only way to build one from an
/// arbitrary integer is [`Nice::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Nice(i8);

impl Nice {
    /// Highest priority.
    pub const MIN: Self = Nice(-20);

    /// Lowest priority.
    pub const MAX: Self = Nice(19);

    /// Default priority, weight 1024.
    pub const DEFAULT: Self = Nice(0);

    /// Validate a raw nice value.
    pub fn new(nice: i32) -> Result<Self, TypeError> {
        if (Self::MIN.get()..=Self::MAX.get()).contains(&nice) {
            Ok(Nice(nice as i8))
        } else {
            Err(TypeError::NiceOutOfRange {
                nice,
                min: Self::MIN.get(),
                max: Self::MAX.get(),
            })
        }
    }

    /// Get the raw value.
    pub fn get(self) -> i32 {
        i32::from(self.0)
    }

    /// Scheduling weight for this priority level.
    pub fn weight(self) -> u32 {
        NICE_TO_WEIGHT[(self.get() - Self::MIN.get()) as usize]
    }
}

impl Default for Nice {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i32> for Nice {
    type Error = TypeError;

    fn try_from(nice: i32) -> Result<Self, Self::Error> {
        Nice::new(nice)
    }
}

impl From<Nice> for i32 {
    fn from(nice: Nice) -> Self {
        nice.get()
    }
}

impl fmt::Display for Nice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nice_range() {
        assert!(Nice::new(-20).is_ok());
        assert!(Nice::new(19).is_ok());
        assert!(Nice::new(-21).is_err());
        assert!(Nice::new(20).is_err());
        assert!(Nice::new(i32::MAX).is_err());
    }

    #[test]
    fn test_nice_weight_ordering() {
        let high = Nice::new(-5).unwrap();
        let low = Nice::new(5).unwrap();
        assert!(high.weight() > Nice::DEFAULT.weight());
        assert!(low.weight() < Nice::DEFAULT.weight());
    }

    #[test]
    fn test_nice_serde_rejects_out_of_range() {
        let ok: Nice = serde_json::from_str("-3").unwrap();
        assert_eq!(ok.get(), -3);
        assert!(serde_json::from_str::<Nice>("42").is_err());
    }

    #[test]
    fn test_task_id_display() {
        assert_eq!(TaskId::from("A").to_string(), "A");
    }
}
