//! Command module for joint-control.
//!
//! Turns operator inputs (panel combo, local line input, bus messages) into a
//! single [`Command`] per control tick.

mod combo;
mod parse;
mod router;

pub use combo::{ComboDetector, ComboOutcome, ComboState};
pub use parse::{decode_control, decode_position, parse_degrees, CALIBRATE_TOKEN};
pub use router::CommandRouter;

use crate::config::units::Degrees;
use crate::error::CommandError;

/// One decoded operator request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Move to an absolute angle in [-85, 85] degrees.
    Move(Degrees),
    /// Re-home against the switch.
    Calibrate {
        /// Return to the pre-homing position instead of parking.
        return_to_last: bool,
    },
    /// Re-home, then drive to step 0.
    Zero,
    /// Input was decoded but refused.
    Reject(CommandError),
}
