//! Motor module for joint-control.
//!
//! Provides the non-blocking joint axis, its actuators and enable lines, and
//! position tracking.

mod actuator;
mod driver;
mod position;

pub use actuator::{Actuator, DualEnable, EnableOutput, FullFourWire, StepDir};
pub use driver::Axis;
pub use position::Position;
