//! # joint-control
//!
//! Control core for a single stepper-driven rotary joint with embedded-hal 1.0
//! support.
//!
//! ## Features
//!
//! - **Homing**: Non-blocking state machine that references the axis against
//!   a limit switch and restores or parks the joint afterwards
//! - **Commands**: Panel button combo, local serial lines and message-bus
//!   topics decoded into one command per tick
//! - **Persistence**: Settled position survives power loss with one write per
//!   distinct resting position
//! - **embedded-hal 1.0**: `OutputPin` coils/STEP/DIR and enable lines,
//!   `InputPin` panel inputs
//! - **no_std compatible**: Core library works without standard library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use joint_control::{load_config, Instant, JointController};
//! use joint_control::motor::{DualEnable, FullFourWire};
//!
//! let mut joint = JointController::builder()
//!     .config(load_config("shoulder.toml")?)
//!     .actuator(FullFourWire::new(in1, in2, in3, in4))
//!     .enable(DualEnable::new(ena, enb))
//!     .panel(action_button, calibration_switch)
//!     .storage(eeprom)
//!     .line_input(serial)
//!     .bus(mqtt)
//!     .build()?;
//!
//! joint.start(Instant::from_micros(clock.micros()))?;
//! loop {
//!     joint.tick(Instant::from_micros(clock.micros()))?;
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables TOML file loading and file-backed position storage
//! - `alloc`: Enables heap allocation for no_std with allocator
//! - `defmt`: Enables defmt logging for embedded targets
//! - `log`: Enables logging through the `log` facade

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

// This must go first so the logging macros are visible to every module.
#[macro_use]
mod fmt;

// Core modules
pub mod calibration;
pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod io;
pub mod motion;
pub mod motor;
pub mod net;
pub mod storage;

// Re-exports for ergonomic API
pub use calibration::{CalibrationController, CalibrationState, Progress};
pub use command::{Command, CommandRouter};
pub use config::{validate_config, JointConfig};
pub use controller::{JointBuilder, JointController};
pub use error::{Error, Result};
pub use io::{BusMessage, LineInput, MessageBus, NullBus, Panel};
pub use motion::{Direction, MotionPhase};
pub use motor::Axis;
pub use storage::{MemoryStorage, PositionStorage, PositionStore};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};
#[cfg(feature = "std")]
pub use storage::FileStorage;

// Unit types and the joint mapping
pub use config::mapping::{deg_to_steps, steps_to_deg, MAX_OFFSET};
pub use config::units::{Degrees, Instant, Steps};
