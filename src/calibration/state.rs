//! Homing session states.

use crate::config::units::{Instant, Steps};

/// Phase of the homing state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationState {
    /// No session.
    #[default]
    Idle,
    /// Waiting for the operator to press the action button.
    AwaitingStart,
    /// Button pressed; waiting out the start delay.
    Arming {
        /// When the press was seen
        since: Instant,
    },
    /// Crawling toward the switch.
    Homing,
    /// Switch hit; position redefined to the reference.
    Referenced,
    /// Driving to the restore or park target.
    Restoring,
    /// Driving to step 0 after a deep reset.
    Zeroing,
}

impl CalibrationState {
    /// State name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            CalibrationState::Idle => "Idle",
            CalibrationState::AwaitingStart => "AwaitingStart",
            CalibrationState::Arming { .. } => "Arming",
            CalibrationState::Homing => "Homing",
            CalibrationState::Referenced => "Referenced",
            CalibrationState::Restoring => "Restoring",
            CalibrationState::Zeroing => "Zeroing",
        }
    }
}

/// One homing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationSession {
    /// Return to `last_position` after referencing instead of parking.
    pub return_to_last: bool,
    /// Axis position when the session began.
    pub last_position: Steps,
    /// Finish with an absolute move to step 0.
    pub then_zero: bool,
}

/// Result of one session poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Progress {
    /// Session still owns the tick.
    Running,
    /// Session finished (or none was active).
    Done,
}
