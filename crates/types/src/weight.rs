//! Nice value to scheduling weight mapping.

use crate::{Nice, TypeError};

/// Weight of a nice-0 task. Every other weight is expressed relative to it.
pub const NICE_0_WEIGHT: u32 = 1024;

/// Scheduling weight for each nice level, indexed by `nice + 20`.
///
/// Each step of one nice level changes the weight by roughly 25%, so two
/// tasks one level apart split the CPU about 55/45.
#[rustfmt::skip]
pub const NICE_TO_WEIGHT: [u32; 40] = [
    /* -20 */ 88761, 71755, 56483, 46273, 36291,
    /* -15 */ 29154, 23254, 18705, 14949, 11916,
    /* -10 */ 9548, 7620, 6100, 4904, 3906,
    /*  -5 */ 3121, 2501, 1991, 1586, 1277,
    /*   0 */ 1024, 820, 655, 526, 423,
    /*   5 */ 335, 272, 215, 172, 137,
    /*  10 */ 110, 87, 70, 56, 45,
    /*  15 */ 36, 29, 23, 18, 15,
];

/// Look up the weight of a raw nice value.
///
/// Fails with [`TypeError::NiceOutOfRange`] when `nice` is outside `-20..=19`.
pub fn nice_to_weight(nice: i32) -> Result<u32, TypeError> {
    Nice::new(nice).map(Nice::weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nice_zero_is_baseline() {
        assert_eq!(nice_to_weight(0), Ok(NICE_0_WEIGHT));
    }

    #[test]
    fn test_table_bounds() {
        assert_eq!(nice_to_weight(-20), Ok(88761));
        assert_eq!(nice_to_weight(19), Ok(15));
    }

    #[test]
    fn test_weight_strictly_decreasing() {
        for pair in NICE_TO_WEIGHT.windows(2) {
            assert!(pair[0] > pair[1], "{} !> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(matches!(
            nice_to_weight(20),
            Err(TypeError::NiceOutOfRange { nice: 20, .. })
        ));
        assert!(matches!(
            nice_to_weight(-21),
            Err(TypeError::NiceOutOfRange { nice: -21, .. })
        ));
    }
}
