//! Joint configuration from TOML.

use heapless::String;
use serde::Deserialize;

use super::units::{Degrees, Steps};

/// Complete joint configuration.
///
/// Every section is optional in TOML; missing sections and fields fall back to
/// the values the shoulder joint ships with.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JointConfig {
    /// Human-readable joint name (max 32 chars).
    pub name: String<32>,

    /// Speed/acceleration profile of the axis.
    pub motion: MotionConfig,

    /// Homing behaviour.
    pub homing: HomingConfig,

    /// Two-button interlock timing.
    pub buttons: ButtonConfig,

    /// Published telemetry cadence.
    pub telemetry: TelemetryConfig,

    /// Message-bus topics and reconnect policy.
    pub bus: BusConfig,
}

/// Fixed speed/acceleration profile of the axis.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Maximum speed in steps per second.
    #[serde(rename = "max_speed_steps_per_sec")]
    pub max_speed: f32,

    /// Acceleration in steps per second squared.
    #[serde(rename = "acceleration_steps_per_sec2")]
    pub acceleration: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            max_speed: 200.0,
            acceleration: 100.0,
        }
    }
}

/// Homing run parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HomingConfig {
    /// Constant speed toward the switch, steps per second.
    #[serde(rename = "crawl_speed_steps_per_sec")]
    pub crawl_speed: f32,

    /// Pause between the action-button press and the first homing step.
    pub start_delay_ms: u32,

    /// Distance backed off the switch when not restoring the previous pose.
    #[serde(rename = "park_offset_steps")]
    pub park_offset: Steps,
}

impl Default for HomingConfig {
    fn default() -> Self {
        Self {
            crawl_speed: 100.0,
            start_delay_ms: 1_000,
            park_offset: Steps(100),
        }
    }
}

/// Button-combo timing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ButtonConfig {
    /// Hold time separating a short (calibrate) from a long (zero) combo press.
    pub long_press_ms: u32,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self { long_press_ms: 1_000 }
    }
}

/// Telemetry cadence.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Realtime position publish period.
    pub position_interval_ms: u32,

    /// Uptime publish period.
    pub uptime_interval_ms: u32,

    /// Constant added to the published realtime angle.
    ///
    /// Defaults to -1, which is what the deployed joint reports. Likely
    /// unintentional; kept until someone confirms the intent.
    #[serde(rename = "position_offset_degrees")]
    pub position_offset: Degrees,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            position_interval_ms: 100,
            uptime_interval_ms: 10_000,
            position_offset: Degrees(-1),
        }
    }
}

/// Message-bus topics.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    /// Incoming numeric degree commands.
    pub position_topic: String<64>,

    /// Incoming control tokens (`calibrate`).
    pub control_topic: String<64>,

    /// Outgoing realtime position.
    pub realtime_topic: String<64>,

    /// Outgoing uptime.
    pub uptime_topic: String<64>,

    /// Delay between reconnect attempts.
    pub reconnect_delay_ms: u32,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            position_topic: topic("robot/shoulder/position"),
            control_topic: topic("robot/shoulder/control"),
            realtime_topic: topic("robot/shoulder/realtime"),
            uptime_topic: topic("robot/shoulder/uptime"),
            reconnect_delay_ms: 5_000,
        }
    }
}

impl BusConfig {
    /// Topics the joint subscribes to.
    pub fn subscriptions(&self) -> [&str; 2] {
        [self.position_topic.as_str(), self.control_topic.as_str()]
    }
}

fn topic(name: &str) -> String<64> {
    String::try_from(name).unwrap_or_default()
}
