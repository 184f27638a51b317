//! Builder pattern for JointController.

use embedded_hal::digital::InputPin;

use crate::config::{validate_config, JointConfig};
use crate::error::{ConfigError, Error, Result};
use crate::io::{LineInput, MessageBus, Panel};
use crate::motor::{Actuator, Axis, EnableOutput};
use crate::storage::PositionStorage;

use super::JointController;

/// Builder for creating JointController instances.
///
/// ```rust,ignore
/// let mut joint = JointController::builder()
///     .config(load_config("shoulder.toml")?)
///     .actuator(FullFourWire::new(in1, in2, in3, in4))
///     .enable(DualEnable::new(ena, enb))
///     .panel(action_button, calibration_switch)
///     .storage(eeprom)
///     .line_input(serial)
///     .bus(mqtt)
///     .build()?;
/// ```
pub struct JointBuilder<ACT, EN, A, S, ST, L, B>
where
    ACT: Actuator,
    EN: EnableOutput,
    A: InputPin,
    S: InputPin,
    ST: PositionStorage,
    L: LineInput,
    B: MessageBus,
{
    config: Option<JointConfig>,
    actuator: Option<ACT>,
    enable: Option<EN>,
    panel: Option<Panel<A, S>>,
    storage: Option<ST>,
    line: Option<L>,
    bus: Option<B>,
}

impl<ACT, EN, A, S, ST, L, B> Default for JointBuilder<ACT, EN, A, S, ST, L, B>
where
    ACT: Actuator,
    EN: EnableOutput,
    A: InputPin,
    S: InputPin,
    ST: PositionStorage,
    L: LineInput,
    B: MessageBus,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<ACT, EN, A, S, ST, L, B> JointBuilder<ACT, EN, A, S, ST, L, B>
where
    ACT: Actuator,
    EN: EnableOutput,
    A: InputPin,
    S: InputPin,
    ST: PositionStorage,
    L: LineInput,
    B: MessageBus,
{
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            config: None,
            actuator: None,
            enable: None,
            panel: None,
            storage: None,
            line: None,
            bus: None,
        }
    }

    /// Set the joint configuration. Defaults to [`JointConfig::default`].
    pub fn config(mut self, config: JointConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the step actuator.
    pub fn actuator(mut self, actuator: ACT) -> Self {
        self.actuator = Some(actuator);
        self
    }

    /// Set the enable output.
    pub fn enable(mut self, enable: EN) -> Self {
        self.enable = Some(enable);
        self
    }

    /// Set the action button and calibration switch inputs.
    pub fn panel(mut self, action: A, switch: S) -> Self {
        self.panel = Some(Panel::new(action, switch));
        self
    }

    /// Set the position storage backend.
    pub fn storage(mut self, storage: ST) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Set the local line input.
    pub fn line_input(mut self, line: L) -> Self {
        self.line = Some(line);
        self
    }

    /// Set the message bus client.
    pub fn bus(mut self, bus: B) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Build the JointController.
    ///
    /// # Errors
    ///
    /// Returns an error if a component is missing or the configuration is
    /// invalid.
    pub fn build(self) -> Result<JointController<ACT, EN, A, S, ST, L, B>> {
        let config = self.config.unwrap_or_default();
        validate_config(&config)?;

        let actuator = self.actuator.ok_or_else(|| missing("actuator"))?;
        let enable = self.enable.ok_or_else(|| missing("enable"))?;
        let panel = self.panel.ok_or_else(|| missing("panel"))?;
        let storage = self.storage.ok_or_else(|| missing("storage"))?;
        let line = self.line.ok_or_else(|| missing("line_input"))?;
        let bus = self.bus.ok_or_else(|| missing("bus"))?;

        let axis = Axis::new(actuator, enable, &config.motion);

        Ok(JointController::from_parts(
            config, axis, panel, storage, line, bus,
        ))
    }
}

fn missing(component: &'static str) -> Error {
    Error::Config(ConfigError::MissingComponent(component))
}
