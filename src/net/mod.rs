//! Network module for joint-control.
//!
//! Keeps the message-bus link alive and publishes periodic telemetry.

mod link;
mod telemetry;

pub use link::LinkSupervisor;
pub use telemetry::Telemetry;
