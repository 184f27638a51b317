//! Calibration module for joint-control.
//!
//! Provides the non-blocking homing state machine that references the axis
//! against the calibration switch.

mod controller;
mod state;

pub use controller::CalibrationController;
pub use state::{CalibrationSession, CalibrationState, Progress};
