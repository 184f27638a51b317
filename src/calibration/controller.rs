//! Homing state machine.

use embedded_hal::digital::InputPin;

use crate::config::mapping::MAX_OFFSET;
use crate::config::units::{Instant, Steps};
use crate::config::HomingConfig;
use crate::error::MotorError;
use crate::io::Panel;
use crate::motor::{Actuator, Axis, EnableOutput};

use super::state::{CalibrationSession, CalibrationState, Progress};

/// Establishes the absolute reference against the calibration switch.
///
/// A session is started with [`calibrate`](Self::calibrate) or
/// [`zero`](Self::zero) and then advanced with [`poll`](Self::poll) once per
/// control tick until it reports [`Progress::Done`]. While a session is
/// active it owns the axis; the caller must not tick the axis itself.
///
/// Sequence:
/// 1. wait for the action button
/// 2. wait the start delay
/// 3. crawl toward the switch at constant speed
/// 4. redefine the position as [`MAX_OFFSET`]
/// 5. drive to the pre-homing position or park just off the switch
/// 6. for a deep reset, drive on to step 0
#[derive(Debug, Clone)]
pub struct CalibrationController {
    homing: HomingConfig,
    state: CalibrationState,
    session: Option<CalibrationSession>,
}

impl CalibrationController {
    /// Create an idle controller.
    pub fn new(homing: &HomingConfig) -> Self {
        Self {
            homing: homing.clone(),
            state: CalibrationState::Idle,
            session: None,
        }
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> CalibrationState {
        self.state
    }

    /// Active session, if any.
    #[inline]
    pub fn session(&self) -> Option<&CalibrationSession> {
        self.session.as_ref()
    }

    /// Whether a session owns the tick.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Begin a homing run. Replaces any session in progress.
    pub fn calibrate<ACT, EN>(&mut self, axis: &Axis<ACT, EN>, return_to_last: bool)
    where
        ACT: Actuator,
        EN: EnableOutput,
    {
        self.begin(axis.current_position(), return_to_last, false);
    }

    /// Begin a homing run that parks and then drives to step 0.
    pub fn zero<ACT, EN>(&mut self, axis: &Axis<ACT, EN>)
    where
        ACT: Actuator,
        EN: EnableOutput,
    {
        self.begin(axis.current_position(), false, true);
    }

    /// Drop the session without finishing it.
    pub fn abort(&mut self) {
        if self.session.take().is_some() {
            warn!("calibration aborted in {}", self.state.name());
        }
        self.state = CalibrationState::Idle;
    }

    fn begin(&mut self, last_position: Steps, return_to_last: bool, then_zero: bool) {
        self.session = Some(CalibrationSession {
            return_to_last,
            last_position,
            then_zero,
        });
        info!(
            "calibration requested (return_to_last={}, zero={}), press the action button",
            return_to_last,
            then_zero
        );
        self.transition(CalibrationState::AwaitingStart);
    }

    fn transition(&mut self, next: CalibrationState) {
        debug!("calibration: {} -> {}", self.state.name(), next.name());
        self.state = next;
    }

    /// Advance the session by one tick.
    pub fn poll<ACT, EN, A, S>(
        &mut self,
        axis: &mut Axis<ACT, EN>,
        panel: &mut Panel<A, S>,
        now: Instant,
    ) -> Result<Progress, MotorError>
    where
        ACT: Actuator,
        EN: EnableOutput,
        A: InputPin,
        S: InputPin,
    {
        let Some(session) = self.session else {
            return Ok(Progress::Done);
        };

        match self.state {
            CalibrationState::Idle => {
                self.session = None;
                return Ok(Progress::Done);
            }
            CalibrationState::AwaitingStart => {
                if panel.action_pressed()? {
                    self.transition(CalibrationState::Arming { since: now });
                }
            }
            CalibrationState::Arming { since } => {
                if now.millis_since(since) >= u64::from(self.homing.start_delay_ms) {
                    info!("homing toward the switch");
                    self.transition(CalibrationState::Homing);
                }
            }
            CalibrationState::Homing => {
                if panel.switch_triggered()? {
                    axis.force_position(MAX_OFFSET);
                    axis.refresh_enable()?;
                    info!("switch reached, position set to {}", MAX_OFFSET.value());
                    self.transition(CalibrationState::Referenced);
                } else {
                    axis.crawl(now, self.homing.crawl_speed)?;
                }
            }
            CalibrationState::Referenced => {
                let target = if session.return_to_last {
                    session.last_position
                } else {
                    MAX_OFFSET - self.homing.park_offset
                };
                debug!("restoring to {}", target.value());
                axis.set_target(target);
                axis.tick(now)?;
                self.transition(CalibrationState::Restoring);
            }
            CalibrationState::Restoring => {
                axis.tick(now)?;
                if axis.distance_to_go() == 0 {
                    if session.then_zero {
                        axis.set_target(Steps::ZERO);
                        axis.refresh_enable()?;
                        self.transition(CalibrationState::Zeroing);
                    } else {
                        return self.finish(axis);
                    }
                }
            }
            CalibrationState::Zeroing => {
                axis.tick(now)?;
                if axis.distance_to_go() == 0 {
                    return self.finish(axis);
                }
            }
        }

        Ok(Progress::Running)
    }

    fn finish<ACT, EN>(&mut self, axis: &mut Axis<ACT, EN>) -> Result<Progress, MotorError>
    where
        ACT: Actuator,
        EN: EnableOutput,
    {
        axis.refresh_enable()?;
        self.session = None;
        self.transition(CalibrationState::Idle);
        info!("calibration complete at {}", axis.current_position().value());
        Ok(Progress::Done)
    }
}
