//! Fixed-cadence telemetry publishing.

use core::fmt::Write;

use heapless::String;

use crate::config::units::{Degrees, Instant, Steps};
use crate::config::{BusConfig, TelemetryConfig};
use crate::io::{MessageBus, MESSAGE_CAPACITY};

/// Decimal text of one published value.
type Payload = String<16>;

fn decimal<T: core::fmt::Display>(value: T) -> Payload {
    let mut text = Payload::new();
    // Published values fit in 16 characters.
    let _ = write!(text, "{}", value);
    text
}

/// Publishes the realtime angle and the uptime on their own cadences.
///
/// Publish failures are logged and dropped; the next period publishes fresh
/// values anyway.
#[derive(Debug, Clone)]
pub struct Telemetry {
    position_every_ms: u64,
    uptime_every_ms: u64,
    offset: Degrees,
    realtime_topic: String<MESSAGE_CAPACITY>,
    uptime_topic: String<MESSAGE_CAPACITY>,
    boot: Instant,
    last_position: Instant,
    last_uptime: Instant,
}

impl Telemetry {
    /// Create a publisher whose cadences start at `boot`.
    pub fn new(telemetry: &TelemetryConfig, bus: &BusConfig, boot: Instant) -> Self {
        Self {
            position_every_ms: u64::from(telemetry.position_interval_ms),
            uptime_every_ms: u64::from(telemetry.uptime_interval_ms),
            offset: telemetry.position_offset,
            realtime_topic: bus.realtime_topic.clone(),
            uptime_topic: bus.uptime_topic.clone(),
            boot,
            last_position: boot,
            last_uptime: boot,
        }
    }

    /// Restart both cadences at `boot`.
    pub fn reset(&mut self, boot: Instant) {
        self.boot = boot;
        self.last_position = boot;
        self.last_uptime = boot;
    }

    /// Angle reported for a step position.
    #[inline]
    pub fn reported_angle(&self, position: Steps) -> Degrees {
        position.to_degrees() + self.offset
    }

    /// Whole seconds since boot.
    #[inline]
    pub fn uptime_secs(&self, now: Instant) -> u64 {
        now.millis_since(self.boot) / 1_000
    }

    /// Publish whatever is due at `now`.
    pub fn publish_due<B: MessageBus>(&mut self, bus: &mut B, position: Steps, now: Instant) {
        if now.millis_since(self.last_position) >= self.position_every_ms {
            self.last_position = now;
            let angle = self.reported_angle(position);
            let payload = decimal(angle.value());
            if let Err(e) = bus.publish(&self.realtime_topic, &payload) {
                warn!("realtime publish failed: {:?}", e);
            }
        }

        if now.millis_since(self.last_uptime) >= self.uptime_every_ms {
            self.last_uptime = now;
            let payload = decimal(self.uptime_secs(now));
            match bus.publish(&self.uptime_topic, &payload) {
                Ok(()) => trace!("uptime {} s", self.uptime_secs(now)),
                Err(e) => warn!("uptime publish failed: {:?}", e),
            }
        }
    }
}
