//! Configuration module for joint-control.
//!
//! Provides the joint configuration types, the fixed degree/step mapping and
//! loading/validation from TOML files (with the `std` feature).

mod joint;
pub mod mapping;
pub mod units;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use joint::{BusConfig, ButtonConfig, HomingConfig, JointConfig, MotionConfig, TelemetryConfig};
pub use mapping::{deg_to_steps, steps_to_deg, DEGREE_RANGE, MAX_OFFSET};
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Degrees, Instant, Steps};
