//! Joint axis driver.
//!
//! Non-blocking positional axis over an [`Actuator`] and an [`EnableOutput`].
//! Each [`Axis::tick`] emits at most one step, then refreshes the enable line
//! so that it is asserted exactly while a step is still pending.

use crate::config::units::{Instant, Steps};
use crate::config::MotionConfig;
use crate::error::MotorError;
use crate::motion::{MotionPhase, StepRamp};

use super::actuator::{Actuator, EnableOutput};
use super::position::Position;

/// Open-loop stepper axis.
///
/// Generic over:
/// - `ACT`: step actuator (STEP/DIR driver or four-wire coils)
/// - `EN`: enable output
pub struct Axis<ACT, EN>
where
    ACT: Actuator,
    EN: EnableOutput,
{
    /// Step actuator.
    actuator: ACT,

    /// Enable output.
    enable: EN,

    /// Current and target position.
    position: Position,

    /// Speed profile state.
    ramp: StepRamp,

    /// Time of the last emitted step.
    last_step_at: Instant,

    /// Last enable state written to the output.
    enabled: bool,
}

impl<ACT, EN> Axis<ACT, EN>
where
    ACT: Actuator,
    EN: EnableOutput,
{
    /// Create an axis at rest at position 0.
    pub fn new(actuator: ACT, enable: EN, motion: &MotionConfig) -> Self {
        Self {
            actuator,
            enable,
            position: Position::at(Steps::ZERO),
            ramp: StepRamp::new(motion.max_speed, motion.acceleration),
            last_step_at: Instant::ZERO,
            enabled: false,
        }
    }

    /// Get current position in steps.
    #[inline]
    pub fn current_position(&self) -> Steps {
        self.position.current()
    }

    /// Get target position in steps.
    #[inline]
    pub fn target_position(&self) -> Steps {
        self.position.target()
    }

    /// Signed steps remaining to the target.
    #[inline]
    pub fn distance_to_go(&self) -> i32 {
        self.position.distance_to_go()
    }

    /// Whether the enable output is currently asserted.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Signed speed in steps/sec.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.ramp.speed()
    }

    /// Get current motion phase.
    #[inline]
    pub fn phase(&self) -> MotionPhase {
        self.ramp.phase()
    }

    /// Set an absolute target. No bounds are applied.
    pub fn set_target(&mut self, target: Steps) {
        if self.position.target() != target {
            self.position.set_target(target);
            self.ramp.update(self.position.distance_to_go());
        }
    }

    /// Set a target relative to the current position.
    pub fn move_by(&mut self, delta: Steps) {
        self.set_target(self.position.current() + delta);
    }

    /// Redefine the current position without moving.
    ///
    /// The target follows and the ramp is reset, so the axis is at rest.
    pub fn force_position(&mut self, steps: Steps) {
        self.position.redefine(steps);
        self.ramp.stop_now();
    }

    /// Advance toward the target by at most one step, then refresh enable.
    ///
    /// Returns `true` if a step was emitted.
    pub fn tick(&mut self, now: Instant) -> Result<bool, MotorError> {
        let stepped = self.run_speed(now)?;
        if stepped {
            self.ramp.update(self.position.distance_to_go());
        }
        self.refresh_enable()?;
        Ok(stepped)
    }

    /// Step at a constant `speed` (steps/sec, sign gives direction) toward a
    /// target kept one step ahead, then refresh enable.
    ///
    /// The speed is clamped to ±max speed. Returns `true` if a step was emitted.
    pub fn crawl(&mut self, now: Instant, speed: f32) -> Result<bool, MotorError> {
        let delta = Steps(if speed >= 0.0 { 1 } else { -1 });
        self.lead(delta, speed);
        let stepped = self.run_speed(now)?;
        if stepped {
            self.lead(delta, speed);
        }
        self.refresh_enable()?;
        Ok(stepped)
    }

    fn lead(&mut self, delta: Steps, speed: f32) {
        self.move_by(delta);
        self.ramp.set_constant_speed(speed);
    }

    /// Write the enable state implied by the pending distance.
    pub fn refresh_enable(&mut self) -> Result<(), MotorError> {
        let wanted = self.position.distance_to_go() != 0;
        self.enable.set_enabled(wanted)?;
        self.enabled = wanted;
        Ok(())
    }

    /// Emit one step if the current interval has elapsed.
    fn run_speed(&mut self, now: Instant) -> Result<bool, MotorError> {
        let interval = self.ramp.step_interval_us();
        if interval == 0 {
            return Ok(false);
        }

        if now.micros_since(self.last_step_at) < u64::from(interval) {
            return Ok(false);
        }

        let direction = self.ramp.direction();
        self.position.step(direction);
        self.actuator.step(direction, self.position.current())?;
        self.last_step_at = now;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::Direction;

    #[derive(Default)]
    struct CountingActuator {
        steps: i32,
        fail: bool,
    }

    impl Actuator for CountingActuator {
        fn step(&mut self, direction: Direction, _position: Steps) -> Result<(), MotorError> {
            if self.fail {
                return Err(MotorError::PinError);
            }
            self.steps += direction.sign();
            Ok(())
        }
    }

    #[derive(Default)]
    struct EnableLog {
        writes: Vec<bool>,
    }

    impl EnableOutput for EnableLog {
        fn set_enabled(&mut self, enabled: bool) -> Result<(), MotorError> {
            self.writes.push(enabled);
            Ok(())
        }
    }

    fn axis() -> Axis<CountingActuator, EnableLog> {
        Axis::new(
            CountingActuator::default(),
            EnableLog::default(),
            &MotionConfig::default(),
        )
    }

    /// Tick every millisecond until settled, checking enable at each boundary.
    fn run_until_settled(axis: &mut Axis<CountingActuator, EnableLog>, mut now: Instant) -> Instant {
        for _ in 0..120_000 {
            axis.tick(now).unwrap();
            assert_eq!(axis.is_enabled(), axis.distance_to_go() != 0);
            if axis.distance_to_go() == 0 {
                return now;
            }
            now = now.plus_millis(1);
        }
        panic!("axis never settled");
    }

    #[test]
    fn test_moves_to_target() {
        let mut axis = axis();
        axis.set_target(Steps(300));
        assert_eq!(axis.target_position(), Steps(300));
        assert_eq!(axis.distance_to_go(), 300);

        run_until_settled(&mut axis, Instant::ZERO);

        assert_eq!(axis.current_position(), Steps(300));
        assert_eq!(axis.actuator.steps, 300);
        assert!(!axis.is_enabled());
        assert_eq!(axis.enable.writes.first(), Some(&true));
        assert_eq!(axis.enable.writes.last(), Some(&false));
    }

    #[test]
    fn test_moves_negative() {
        let mut axis = axis();
        axis.set_target(Steps(-40));
        run_until_settled(&mut axis, Instant::ZERO);
        assert_eq!(axis.current_position(), Steps(-40));
        assert_eq!(axis.actuator.steps, -40);
    }

    #[test]
    fn test_at_most_one_step_per_tick() {
        let mut axis = axis();
        axis.set_target(Steps(100));
        // A late tick still emits a single step.
        assert!(axis.tick(Instant::from_millis(10_000)).unwrap());
        assert_eq!(axis.current_position(), Steps(1));
        // Immediately after, the interval has not elapsed.
        assert!(!axis.tick(Instant::from_millis(10_000)).unwrap());
    }

    #[test]
    fn test_idle_axis_is_disabled() {
        let mut axis = axis();
        assert!(!axis.tick(Instant::ZERO).unwrap());
        assert!(!axis.is_enabled());
        assert_eq!(axis.phase(), MotionPhase::Complete);
    }

    #[test]
    fn test_crawl_is_constant_speed() {
        let mut axis = axis();
        let mut now = Instant::from_millis(1_000);
        let mut stepped = 0;
        for _ in 0..1_000 {
            if axis.crawl(now, 100.0).unwrap() {
                stepped += 1;
            }
            assert!(axis.is_enabled());
            now = now.plus_millis(1);
        }
        // 100 steps/s for one second, first step immediately.
        assert!((99..=101).contains(&stepped));
        assert_eq!(axis.current_position(), Steps(stepped));
        assert_eq!(axis.speed(), 100.0);
    }

    #[test]
    fn test_force_position_stops_motion() {
        let mut axis = axis();
        axis.set_target(Steps(500));
        let mut now = Instant::ZERO;
        for _ in 0..2_000 {
            axis.tick(now).unwrap();
            now = now.plus_millis(1);
        }
        assert!(axis.distance_to_go() != 0);

        axis.force_position(Steps(1250));
        assert_eq!(axis.current_position(), Steps(1250));
        assert_eq!(axis.distance_to_go(), 0);
        assert_eq!(axis.speed(), 0.0);

        assert!(!axis.tick(now).unwrap());
        assert!(!axis.is_enabled());
    }

    #[test]
    fn test_pin_failure_propagates() {
        let mut axis = axis();
        axis.actuator.fail = true;
        axis.set_target(Steps(10));
        assert_eq!(
            axis.tick(Instant::from_millis(1_000)),
            Err(MotorError::PinError)
        );
    }
}
