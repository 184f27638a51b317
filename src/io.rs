//! External interfaces of the joint.
//!
//! Capability traits for everything outside the axis: the operator panel
//! (two active-low inputs), the local line channel and the message bus.

use embedded_hal::digital::InputPin;
use heapless::String;

use crate::error::{MotorError, TransportError};

/// Maximum length of a local input line.
pub const LINE_CAPACITY: usize = 32;

/// Maximum length of a bus topic or payload.
pub const MESSAGE_CAPACITY: usize = 64;

/// One line read from the local channel.
pub type Line = String<LINE_CAPACITY>;

/// Operator panel: action button and calibration switch.
///
/// Both inputs use pull-up wiring, so a pressed button (or a triggered
/// switch) reads low.
pub struct Panel<ACTION, SWITCH>
where
    ACTION: InputPin,
    SWITCH: InputPin,
{
    action: ACTION,
    switch: SWITCH,
}

impl<ACTION, SWITCH> Panel<ACTION, SWITCH>
where
    ACTION: InputPin,
    SWITCH: InputPin,
{
    /// Create a panel from the two input pins.
    pub fn new(action: ACTION, switch: SWITCH) -> Self {
        Self { action, switch }
    }

    /// Whether the action button is pressed.
    pub fn action_pressed(&mut self) -> Result<bool, MotorError> {
        self.action.is_low().map_err(|_| MotorError::InputError)
    }

    /// Whether the calibration switch is triggered.
    ///
    /// The same input doubles as the second combo button.
    pub fn switch_triggered(&mut self) -> Result<bool, MotorError> {
        self.switch.is_low().map_err(|_| MotorError::InputError)
    }

    /// Whether both inputs read pressed.
    pub fn both_pressed(&mut self) -> Result<bool, MotorError> {
        Ok(self.action_pressed()? && self.switch_triggered()?)
    }
}

/// Local line-oriented input (serial console).
pub trait LineInput {
    /// Return the next complete line, if one is available.
    fn read_line(&mut self) -> Option<Line>;
}

/// One message received from the bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusMessage {
    /// Topic the message arrived on.
    pub topic: String<MESSAGE_CAPACITY>,
    /// Raw payload text.
    pub payload: String<MESSAGE_CAPACITY>,
}

impl BusMessage {
    /// Build a message; `None` if either part exceeds [`MESSAGE_CAPACITY`].
    pub fn new(topic: &str, payload: &str) -> Option<Self> {
        Some(Self {
            topic: String::try_from(topic).ok()?,
            payload: String::try_from(payload).ok()?,
        })
    }
}

/// Publish/subscribe message bus client.
///
/// Implementations wrap the actual transport (MQTT over Wi-Fi on the arm).
/// Every call must return promptly; the controller retries on failure.
pub trait MessageBus {
    /// Whether the link is currently up.
    fn is_connected(&mut self) -> bool;

    /// Attempt to (re)connect.
    fn connect(&mut self) -> Result<(), TransportError>;

    /// Subscribe to a topic.
    fn subscribe(&mut self, topic: &str) -> Result<(), TransportError>;

    /// Take one pending inbound message.
    fn poll(&mut self) -> Option<BusMessage>;

    /// Publish a payload on a topic.
    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), TransportError>;
}

/// Always-connected bus that never delivers and discards publishes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBus;

impl MessageBus for NullBus {
    fn is_connected(&mut self) -> bool {
        true
    }

    fn connect(&mut self) -> Result<(), TransportError> {
        Ok(())
    }

    fn subscribe(&mut self, _topic: &str) -> Result<(), TransportError> {
        Ok(())
    }

    fn poll(&mut self) -> Option<BusMessage> {
        None
    }

    fn publish(&mut self, _topic: &str, _payload: &str) -> Result<(), TransportError> {
        Ok(())
    }
}
