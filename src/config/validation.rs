//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::joint::{BusConfig, HomingConfig, MotionConfig, TelemetryConfig};
use super::JointConfig;

/// Validate a joint configuration.
///
/// Checks:
/// - Speed and acceleration are positive
/// - Homing crawl speed is positive and not above max speed
/// - Park offset backs the axis off the switch
/// - Cadences and delays are non-zero
/// - Bus topics are non-empty and distinct
pub fn validate_config(config: &JointConfig) -> Result<()> {
    validate_motion(&config.motion)?;
    validate_homing(&config.homing, &config.motion)?;

    if config.buttons.long_press_ms == 0 {
        return Err(Error::Config(ConfigError::ZeroInterval("long_press_ms")));
    }

    validate_telemetry(&config.telemetry)?;
    validate_bus(&config.bus)?;

    Ok(())
}

fn validate_motion(motion: &MotionConfig) -> Result<()> {
    if motion.max_speed.is_nan() || motion.max_speed <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidMaxSpeed(motion.max_speed)));
    }

    if motion.acceleration.is_nan() || motion.acceleration <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidAcceleration(
            motion.acceleration,
        )));
    }

    Ok(())
}

fn validate_homing(homing: &HomingConfig, motion: &MotionConfig) -> Result<()> {
    if homing.crawl_speed.is_nan()
        || homing.crawl_speed <= 0.0
        || homing.crawl_speed > motion.max_speed
    {
        return Err(Error::Config(ConfigError::InvalidCrawlSpeed {
            crawl: homing.crawl_speed,
            max: motion.max_speed,
        }));
    }

    if homing.park_offset.value() <= 0 {
        return Err(Error::Config(ConfigError::InvalidParkOffset(
            homing.park_offset.value(),
        )));
    }

    Ok(())
}

fn validate_telemetry(telemetry: &TelemetryConfig) -> Result<()> {
    if telemetry.position_interval_ms == 0 {
        return Err(Error::Config(ConfigError::ZeroInterval("position_interval_ms")));
    }

    if telemetry.uptime_interval_ms == 0 {
        return Err(Error::Config(ConfigError::ZeroInterval("uptime_interval_ms")));
    }

    Ok(())
}

fn validate_bus(bus: &BusConfig) -> Result<()> {
    if bus.reconnect_delay_ms == 0 {
        return Err(Error::Config(ConfigError::ZeroInterval("reconnect_delay_ms")));
    }

    let topics = [
        ("position_topic", &bus.position_topic),
        ("control_topic", &bus.control_topic),
        ("realtime_topic", &bus.realtime_topic),
        ("uptime_topic", &bus.uptime_topic),
    ];

    for (i, (name, topic)) in topics.iter().enumerate() {
        if topic.is_empty() {
            return Err(Error::Config(ConfigError::EmptyTopic(*name)));
        }

        if topics[i + 1..].iter().any(|(_, other)| other == topic) {
            return Err(Error::Config(ConfigError::DuplicateTopic((*topic).clone())));
        }
    }

    Ok(())
}
