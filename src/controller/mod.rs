//! Joint controller.
//!
//! [`JointController`] owns every component of the joint and the hardware
//! capabilities they act on. The application calls [`start`](JointController::start)
//! once and then [`tick`](JointController::tick) from its main loop.

mod builder;

pub use builder::JointBuilder;

use embedded_hal::digital::InputPin;

use crate::calibration::CalibrationController;
use crate::command::{Command, CommandRouter};
use crate::config::units::{Instant, Steps};
use crate::config::JointConfig;
use crate::error::{Error, Result};
use crate::io::{LineInput, MessageBus, Panel};
use crate::motor::{Actuator, Axis, EnableOutput};
use crate::net::{LinkSupervisor, Telemetry};
use crate::storage::{PositionStorage, PositionStore};

/// Single-joint control context.
///
/// Generic over:
/// - `ACT`: step actuator
/// - `EN`: enable output
/// - `A`, `S`: action button and calibration switch inputs
/// - `ST`: position storage backend
/// - `L`: local line input
/// - `B`: message bus client
pub struct JointController<ACT, EN, A, S, ST, L, B>
where
    ACT: Actuator,
    EN: EnableOutput,
    A: InputPin,
    S: InputPin,
    ST: PositionStorage,
    L: LineInput,
    B: MessageBus,
{
    config: JointConfig,
    axis: Axis<ACT, EN>,
    panel: Panel<A, S>,
    store: PositionStore<ST>,
    line: L,
    bus: B,
    router: CommandRouter,
    calibration: CalibrationController,
    link: LinkSupervisor,
    telemetry: Telemetry,
}

impl<ACT, EN, A, S, ST, L, B> JointController<ACT, EN, A, S, ST, L, B>
where
    ACT: Actuator,
    EN: EnableOutput,
    A: InputPin,
    S: InputPin,
    ST: PositionStorage,
    L: LineInput,
    B: MessageBus,
{
    /// Create a builder.
    pub fn builder() -> JointBuilder<ACT, EN, A, S, ST, L, B> {
        JointBuilder::new()
    }

    pub(crate) fn from_parts(
        config: JointConfig,
        axis: Axis<ACT, EN>,
        panel: Panel<A, S>,
        storage: ST,
        line: L,
        bus: B,
    ) -> Self {
        let router = CommandRouter::new(&config.buttons, &config.bus);
        let calibration = CalibrationController::new(&config.homing);
        let link = LinkSupervisor::new(config.bus.reconnect_delay_ms);
        let telemetry = Telemetry::new(&config.telemetry, &config.bus, Instant::ZERO);

        Self {
            config,
            axis,
            panel,
            store: PositionStore::new(storage),
            line,
            bus,
            router,
            calibration,
            link,
            telemetry,
        }
    }

    /// Load the persisted position and make it the initial target.
    ///
    /// `now` is taken as boot time for the telemetry cadences and uptime.
    pub fn start(&mut self, now: Instant) -> Result<Steps> {
        let stored = self.store.load()?;
        self.axis.set_target(stored);
        self.axis.refresh_enable()?;
        self.telemetry.reset(now);
        info!(
            "joint '{}' started, initial target {}",
            self.config.name.as_str(),
            stored.value()
        );
        Ok(stored)
    }

    /// Run one control-loop iteration.
    ///
    /// An active calibration session gets the tick exclusively. Otherwise the
    /// axis is stepped, a settled position is persisted, the bus link is
    /// supervised and, with the link up, one command is taken and telemetry
    /// is published.
    ///
    /// # Errors
    ///
    /// Pin and storage failures. The controller stays usable; the caller
    /// decides whether to keep looping.
    ///
    /// A failed persistence write does not cut the tick short: the link,
    /// commands and telemetry are still serviced and the storage error is
    /// returned at the end. The write is retried on the next settled tick.
    pub fn tick(&mut self, now: Instant) -> Result<()> {
        if self.calibration.is_active() {
            if let Err(e) = self.calibration.poll(&mut self.axis, &mut self.panel, now) {
                error!("calibration failed: {:?}", e);
                self.calibration.abort();
                return Err(e.into());
            }
            return Ok(());
        }

        self.axis.tick(now)?;
        let persisted = self.store.commit_settled(&self.axis).map(|_| ());
        if let Err(e) = &persisted {
            warn!("position not persisted: {:?}", e);
        }

        let topics = self.config.bus.subscriptions();
        if !self.link.supervise(&mut self.bus, &topics, now) {
            return persisted.map_err(Error::from);
        }

        if let Some(command) = self
            .router
            .poll(&mut self.panel, &mut self.line, &mut self.bus, now)?
        {
            self.dispatch(command);
            self.axis.refresh_enable()?;
        }

        self.telemetry
            .publish_due(&mut self.bus, self.axis.current_position(), now);
        persisted.map_err(Error::from)
    }

    /// Apply one command.
    pub fn dispatch(&mut self, command: Command) {
        match command {
            Command::Move(degrees) => {
                let target = degrees.to_steps();
                info!("move to {} deg ({} steps)", degrees.value(), target.value());
                self.axis.set_target(target);
            }
            Command::Calibrate { return_to_last } => {
                self.calibration.calibrate(&self.axis, return_to_last);
            }
            Command::Zero => self.calibration.zero(&self.axis),
            Command::Reject(e) => warn!("command rejected: {:?}", e),
        }
    }

    /// Joint configuration.
    #[inline]
    pub fn config(&self) -> &JointConfig {
        &self.config
    }

    /// The axis.
    #[inline]
    pub fn axis(&self) -> &Axis<ACT, EN> {
        &self.axis
    }

    /// The homing state machine.
    #[inline]
    pub fn calibration(&self) -> &CalibrationController {
        &self.calibration
    }

    /// The persisted-position store.
    #[inline]
    pub fn store(&self) -> &PositionStore<ST> {
        &self.store
    }

    /// The bus link supervisor.
    #[inline]
    pub fn link(&self) -> &LinkSupervisor {
        &self.link
    }

    /// The command router.
    #[inline]
    pub fn router(&self) -> &CommandRouter {
        &self.router
    }
}
