//! Per-tick command arbitration.

use embedded_hal::digital::InputPin;
use heapless::String;

use crate::config::units::Instant;
use crate::config::{BusConfig, ButtonConfig};
use crate::error::MotorError;
use crate::io::{BusMessage, LineInput, MessageBus, Panel, MESSAGE_CAPACITY};

use super::combo::{ComboDetector, ComboOutcome};
use super::parse::{decode_control, decode_position};
use super::Command;

/// Polls the command sources in priority order and yields at most one
/// [`Command`] per tick.
///
/// Order: panel combo, local line input, one bus message. An open combo hold
/// window masks the other two sources.
#[derive(Debug, Clone)]
pub struct CommandRouter {
    combo: ComboDetector,
    position_topic: String<MESSAGE_CAPACITY>,
    control_topic: String<MESSAGE_CAPACITY>,
}

impl CommandRouter {
    /// Create a router from the button and bus configuration.
    pub fn new(buttons: &ButtonConfig, bus: &BusConfig) -> Self {
        Self {
            combo: ComboDetector::new(buttons.long_press_ms),
            position_topic: bus.position_topic.clone(),
            control_topic: bus.control_topic.clone(),
        }
    }

    /// Access the combo detector.
    #[inline]
    pub fn combo(&self) -> &ComboDetector {
        &self.combo
    }

    /// Poll all sources once.
    pub fn poll<A, S, L, B>(
        &mut self,
        panel: &mut Panel<A, S>,
        line: &mut L,
        bus: &mut B,
        now: Instant,
    ) -> Result<Option<Command>, MotorError>
    where
        A: InputPin,
        S: InputPin,
        L: LineInput,
        B: MessageBus,
    {
        match self.combo.poll(panel, now)? {
            ComboOutcome::Fired(command) => return Ok(Some(command)),
            ComboOutcome::Holding => return Ok(None),
            ComboOutcome::Inactive => {}
        }

        if let Some(text) = line.read_line() {
            trace!("line input: {}", text.as_str());
            return Ok(Some(decode_position(&text)));
        }

        Ok(bus.poll().and_then(|message| self.route(&message)))
    }

    /// Map one bus message to a command.
    pub fn route(&self, message: &BusMessage) -> Option<Command> {
        let topic = message.topic.as_str();
        if topic == self.control_topic.as_str() {
            decode_control(&message.payload)
        } else if topic == self.position_topic.as_str() {
            Some(decode_position(&message.payload))
        } else {
            trace!("ignoring message on {}", topic);
            None
        }
    }
}
