//! Fixed degree/step mapping of the joint.
//!
//! The switch reference is declared as [`MAX_OFFSET`] steps. Commandable
//! travel is `[-85, 85]` degrees onto `[1250, -1250]` steps; note the sign
//! reversal. The relation is linear with integer truncation toward zero and is
//! not configurable.

use core::ops::RangeInclusive;

use super::units::{Degrees, Steps};

/// Step value assigned to the axis the instant the calibration switch triggers.
pub const MAX_OFFSET: Steps = Steps(1250);

/// Largest commandable angle magnitude.
pub const MAX_DEGREES: i32 = 85;

/// Commandable angle range, inclusive.
pub const DEGREE_RANGE: RangeInclusive<i32> = -MAX_DEGREES..=MAX_DEGREES;

/// Integer linear interpolation of `x` from `[in_min, in_max]` onto
/// `[out_min, out_max]`, truncating toward zero.
///
/// A degenerate input range maps everything onto `out_min`.
pub const fn linear_map(x: i32, in_min: i32, in_max: i32, out_min: i32, out_max: i32) -> i32 {
    let run = in_max as i64 - in_min as i64;
    if run == 0 {
        return out_min;
    }
    let rise = out_max as i64 - out_min as i64;
    let delta = x as i64 - in_min as i64;
    ((delta * rise) / run + out_min as i64) as i32
}

/// Convert a joint angle to an absolute step position.
#[inline]
pub fn deg_to_steps(degrees: Degrees) -> Steps {
    Steps(linear_map(
        degrees.0,
        MAX_DEGREES,
        -MAX_DEGREES,
        -MAX_OFFSET.0,
        MAX_OFFSET.0,
    ))
}

/// Convert an absolute step position back to a joint angle.
#[inline]
pub fn steps_to_deg(steps: Steps) -> Degrees {
    Degrees(linear_map(
        steps.0,
        -MAX_OFFSET.0,
        MAX_OFFSET.0,
        MAX_DEGREES,
        -MAX_DEGREES,
    ))
}
