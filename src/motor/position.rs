//! Position tracking for the joint axis.
//!
//! Holds the current and target step positions. The current position is only
//! advanced one step at a time by the axis or redefined outright by homing.

use crate::config::units::Steps;
use crate::motion::Direction;

/// Current/target step position pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    /// Current position in steps (from the homing reference)
    current: Steps,
    /// Position the axis is heading to
    target: Steps,
}

impl Position {
    /// Create a tracker at rest at `steps`.
    #[inline]
    pub fn at(steps: Steps) -> Self {
        Self {
            current: steps,
            target: steps,
        }
    }

    /// Get current position in steps.
    #[inline]
    pub fn current(&self) -> Steps {
        self.current
    }

    /// Get the target position in steps.
    #[inline]
    pub fn target(&self) -> Steps {
        self.target
    }

    /// Signed steps remaining to the target.
    #[inline]
    pub fn distance_to_go(&self) -> i32 {
        self.target.value() - self.current.value()
    }

    /// Set a new target.
    #[inline]
    pub fn set_target(&mut self, target: Steps) {
        self.target = target;
    }

    /// Advance the current position by one step.
    #[inline]
    pub fn step(&mut self, direction: Direction) {
        self.current = Steps(self.current.value() + direction.sign());
    }

    /// Redefine the current position; the target follows so nothing moves.
    #[inline]
    pub fn redefine(&mut self, steps: Steps) {
        self.current = steps;
        self.target = steps;
    }
}
