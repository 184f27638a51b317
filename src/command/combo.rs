//! Two-button interlock on the operator panel.
//!
//! Pressing the action button and the calibration switch together opens a
//! hold window. At the end of the window both inputs are sampled again: still
//! held means a deep reset ([`Command::Zero`]), released means a recalibration
//! that returns to the last position.

use embedded_hal::digital::InputPin;

use crate::config::units::Instant;
use crate::error::MotorError;
use crate::io::Panel;

use super::Command;

/// Detector state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ComboState {
    /// Waiting for both inputs.
    Idle,
    /// Both inputs were seen pressed at `since`.
    Holding {
        /// Start of the hold window
        since: Instant,
    },
    /// Fired; waiting for both inputs to be released before re-arming.
    Latched,
}

/// Result of one detector poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ComboOutcome {
    /// No combo in progress; other sources may be serviced.
    Inactive,
    /// Hold window open; no other source may be serviced.
    Holding,
    /// Window closed with a decision.
    Fired(Command),
}

/// Button-combo state machine.
#[derive(Debug, Clone)]
pub struct ComboDetector {
    hold_ms: u64,
    state: ComboState,
}

impl ComboDetector {
    /// Create a detector with the given hold window.
    pub fn new(hold_ms: u32) -> Self {
        Self {
            hold_ms: u64::from(hold_ms),
            state: ComboState::Idle,
        }
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> ComboState {
        self.state
    }

    /// Poll the panel once.
    pub fn poll<A, S>(&mut self, panel: &mut Panel<A, S>, now: Instant) -> Result<ComboOutcome, MotorError>
    where
        A: InputPin,
        S: InputPin,
    {
        match self.state {
            ComboState::Idle => {
                if panel.both_pressed()? {
                    debug!("combo hold window opened");
                    self.state = ComboState::Holding { since: now };
                    Ok(ComboOutcome::Holding)
                } else {
                    Ok(ComboOutcome::Inactive)
                }
            }
            ComboState::Holding { since } => {
                if now.millis_since(since) < self.hold_ms {
                    return Ok(ComboOutcome::Holding);
                }

                let command = if panel.both_pressed()? {
                    self.state = ComboState::Latched;
                    Command::Zero
                } else {
                    self.state = ComboState::Idle;
                    Command::Calibrate {
                        return_to_last: true,
                    }
                };
                info!("combo fired: {:?}", command);
                Ok(ComboOutcome::Fired(command))
            }
            ComboState::Latched => {
                if !panel.action_pressed()? && !panel.switch_triggered()? {
                    self.state = ComboState::Idle;
                }
                Ok(ComboOutcome::Inactive)
            }
        }
    }
}
