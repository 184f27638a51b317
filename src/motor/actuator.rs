//! Step actuators and enable lines.
//!
//! An [`Actuator`] turns one logical step into pin activity. Two wirings are
//! provided over embedded-hal 1.0 `OutputPin`s:
//!
//! - [`StepDir`]: STEP/DIR driver boards (A4988, DRV8825, TMC in step mode)
//! - [`FullFourWire`]: four coil outputs driven directly in full-step sequence
//!   (ULN2003 boards with 28BYJ-48 style motors)

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::units::Steps;
use crate::error::MotorError;
use crate::motion::Direction;

/// Something that can advance the motor by one step.
pub trait Actuator {
    /// Emit one step in `direction`. `position` is the position after the step.
    fn step(&mut self, direction: Direction, position: Steps) -> Result<(), MotorError>;
}

/// Motor enable output.
pub trait EnableOutput {
    /// Assert (`true`) or deassert (`false`) the enable signal.
    fn set_enabled(&mut self, enabled: bool) -> Result<(), MotorError>;
}

/// STEP/DIR driver.
pub struct StepDir<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    /// STEP pin (pulse to move one step).
    step_pin: STEP,

    /// DIR pin (high = CW, low = CCW, or inverted).
    dir_pin: DIR,

    /// Delay provider for the pulse width.
    delay: DELAY,

    /// Whether direction pin logic is inverted.
    invert_direction: bool,

    /// Current direction (cached to avoid unnecessary pin writes).
    current_direction: Option<Direction>,
}

impl<STEP, DIR, DELAY> StepDir<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    /// STEP pulse width in microseconds.
    pub const PULSE_US: u32 = 2;

    /// Create a STEP/DIR actuator.
    pub fn new(step_pin: STEP, dir_pin: DIR, delay: DELAY, invert_direction: bool) -> Self {
        Self {
            step_pin,
            dir_pin,
            delay,
            invert_direction,
            current_direction: None,
        }
    }

    fn set_direction(&mut self, direction: Direction) -> Result<(), MotorError> {
        if self.current_direction == Some(direction) {
            return Ok(());
        }

        let pin_high = match direction {
            Direction::Clockwise => !self.invert_direction,
            Direction::CounterClockwise => self.invert_direction,
        };

        if pin_high {
            self.dir_pin.set_high().map_err(|_| MotorError::PinError)?;
        } else {
            self.dir_pin.set_low().map_err(|_| MotorError::PinError)?;
        }

        self.current_direction = Some(direction);
        Ok(())
    }
}

impl<STEP, DIR, DELAY> Actuator for StepDir<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    fn step(&mut self, direction: Direction, _position: Steps) -> Result<(), MotorError> {
        self.set_direction(direction)?;

        self.step_pin.set_high().map_err(|_| MotorError::PinError)?;
        self.delay.delay_us(Self::PULSE_US);
        self.step_pin.set_low().map_err(|_| MotorError::PinError)?;

        Ok(())
    }
}

/// Coil pattern per position modulo 4, in pin order 1..4.
const FULL_STEP_SEQUENCE: [[bool; 4]; 4] = [
    [true, false, true, false],
    [false, true, true, false],
    [false, true, false, true],
    [true, false, false, true],
];

/// Four-wire full-step coil driver.
///
/// The energized pattern is a pure function of the absolute position, so a
/// redefined position (homing) stays consistent with the coils as long as it
/// is redefined while the motor is at rest.
pub struct FullFourWire<P1, P2, P3, P4>
where
    P1: OutputPin,
    P2: OutputPin,
    P3: OutputPin,
    P4: OutputPin,
{
    pin1: P1,
    pin2: P2,
    pin3: P3,
    pin4: P4,
}

impl<P1, P2, P3, P4> FullFourWire<P1, P2, P3, P4>
where
    P1: OutputPin,
    P2: OutputPin,
    P3: OutputPin,
    P4: OutputPin,
{
    /// Create a four-wire driver from coil pins in wiring order.
    pub fn new(pin1: P1, pin2: P2, pin3: P3, pin4: P4) -> Self {
        Self {
            pin1,
            pin2,
            pin3,
            pin4,
        }
    }

    /// Coil pattern for an absolute position.
    #[inline]
    pub fn pattern(position: Steps) -> [bool; 4] {
        FULL_STEP_SEQUENCE[(position.value() & 0x3) as usize]
    }
}

fn drive<P: OutputPin>(pin: &mut P, high: bool) -> Result<(), MotorError> {
    if high {
        pin.set_high().map_err(|_| MotorError::PinError)
    } else {
        pin.set_low().map_err(|_| MotorError::PinError)
    }
}

impl<P1, P2, P3, P4> Actuator for FullFourWire<P1, P2, P3, P4>
where
    P1: OutputPin,
    P2: OutputPin,
    P3: OutputPin,
    P4: OutputPin,
{
    fn step(&mut self, _direction: Direction, position: Steps) -> Result<(), MotorError> {
        let [a, b, c, d] = Self::pattern(position);
        drive(&mut self.pin1, a)?;
        drive(&mut self.pin2, b)?;
        drive(&mut self.pin3, c)?;
        drive(&mut self.pin4, d)?;
        Ok(())
    }
}

/// Two enable lines asserted together (one per H-bridge half).
pub struct DualEnable<EN1, EN2>
where
    EN1: OutputPin,
    EN2: OutputPin,
{
    en1: EN1,
    en2: EN2,
    /// Last written state; `None` until the first write.
    state: Option<bool>,
}

impl<EN1, EN2> DualEnable<EN1, EN2>
where
    EN1: OutputPin,
    EN2: OutputPin,
{
    /// Create from the two enable pins. Nothing is written until the first tick.
    pub fn new(en1: EN1, en2: EN2) -> Self {
        Self {
            en1,
            en2,
            state: None,
        }
    }
}

impl<EN1, EN2> EnableOutput for DualEnable<EN1, EN2>
where
    EN1: OutputPin,
    EN2: OutputPin,
{
    fn set_enabled(&mut self, enabled: bool) -> Result<(), MotorError> {
        if self.state == Some(enabled) {
            return Ok(());
        }

        drive(&mut self.en1, enabled)?;
        drive(&mut self.en2, enabled)?;
        self.state = Some(enabled);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction};

    #[test]
    fn test_step_dir_pulses_and_caches_direction() {
        let step_expectations = [
            Transaction::set(State::High),
            Transaction::set(State::Low),
            Transaction::set(State::High),
            Transaction::set(State::Low),
        ];
        // Direction is written once for two steps the same way.
        let dir_expectations = [Transaction::set(State::High)];

        let mut step = PinMock::new(&step_expectations);
        let mut dir = PinMock::new(&dir_expectations);

        let mut actuator = StepDir::new(step.clone(), dir.clone(), NoopDelay::new(), false);
        actuator.step(Direction::Clockwise, Steps(1)).unwrap();
        actuator.step(Direction::Clockwise, Steps(2)).unwrap();

        step.done();
        dir.done();
    }

    #[test]
    fn test_step_dir_inverted() {
        let mut step = PinMock::new(&[Transaction::set(State::High), Transaction::set(State::Low)]);
        let mut dir = PinMock::new(&[Transaction::set(State::High)]);

        let mut actuator = StepDir::new(step.clone(), dir.clone(), NoopDelay::new(), true);
        actuator.step(Direction::CounterClockwise, Steps(-1)).unwrap();

        step.done();
        dir.done();
    }

    #[test]
    fn test_full_step_pattern_wraps_negative_positions() {
        type Coils = FullFourWire<PinMock, PinMock, PinMock, PinMock>;
        assert_eq!(Coils::pattern(Steps(0)), [true, false, true, false]);
        assert_eq!(Coils::pattern(Steps(1)), [false, true, true, false]);
        assert_eq!(Coils::pattern(Steps(1250)), [false, true, false, true]);
        // -1 & 3 == 3
        assert_eq!(Coils::pattern(Steps(-1)), [true, false, false, true]);
    }

    #[test]
    fn test_full_four_wire_drives_all_coils() {
        let mut p1 = PinMock::new(&[Transaction::set(State::Low)]);
        let mut p2 = PinMock::new(&[Transaction::set(State::High)]);
        let mut p3 = PinMock::new(&[Transaction::set(State::High)]);
        let mut p4 = PinMock::new(&[Transaction::set(State::Low)]);

        let mut coils = FullFourWire::new(p1.clone(), p2.clone(), p3.clone(), p4.clone());
        coils.step(Direction::Clockwise, Steps(5)).unwrap();

        p1.done();
        p2.done();
        p3.done();
        p4.done();
    }

    #[test]
    fn test_dual_enable_writes_only_on_change() {
        let expectations = [
            Transaction::set(State::High),
            Transaction::set(State::Low),
        ];
        let mut en1 = PinMock::new(&expectations);
        let mut en2 = PinMock::new(&expectations);

        let mut enable = DualEnable::new(en1.clone(), en2.clone());
        enable.set_enabled(true).unwrap();
        enable.set_enabled(true).unwrap();
        enable.set_enabled(false).unwrap();
        enable.set_enabled(false).unwrap();

        en1.done();
        en2.done();
    }
}
