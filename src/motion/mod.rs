//! Motion module for joint-control.
//!
//! Provides the step-interval ramp that shapes the axis speed profile.

mod profile;

pub use profile::{Direction, MotionPhase, StepRamp};
