//! Step-interval ramp for a constant-acceleration axis.
//!
//! Computes the interval between successive steps so the axis accelerates at
//! a fixed rate up to its maximum speed and decelerates to land exactly on the
//! target. The recurrence is the one from D. Austin, "Generate stepper-motor
//! speed profiles in real time" (2005):
//!
//! - first interval: `c0 = 0.676 * sqrt(2 / a) * 1e6` µs
//! - following intervals: `cn = cn-1 - 2 * cn-1 / (4n + 1)`
//! - clamped at `cmin = 1e6 / max_speed`
//!
//! `n` counts steps since the start of the current ramp and goes negative
//! while decelerating.

use libm::{fabsf, sqrtf};

/// Direction of motor motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Clockwise (positive step count).
    Clockwise,
    /// Counter-clockwise (negative step count).
    CounterClockwise,
}

impl Direction {
    /// Get direction from signed step count.
    #[inline]
    pub fn from_steps(steps: i32) -> Self {
        if steps >= 0 {
            Direction::Clockwise
        } else {
            Direction::CounterClockwise
        }
    }

    /// Get the sign multiplier.
    #[inline]
    pub fn sign(self) -> i32 {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }
}

/// Current phase of motion execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionPhase {
    /// Accelerating from rest toward max speed.
    Accelerating,
    /// Moving at max speed (or a fixed crawl speed).
    Cruising,
    /// Decelerating toward the target.
    Decelerating,
    /// No step pending.
    Complete,
}

const MICROS_PER_SEC: f32 = 1_000_000.0;

/// Runtime state of the step ramp.
#[derive(Debug, Clone)]
pub struct StepRamp {
    /// Maximum speed in steps/sec.
    max_speed: f32,

    /// Acceleration in steps/sec².
    acceleration: f32,

    /// Signed speed in steps/sec (negative = counter-clockwise).
    speed: f32,

    /// Ramp step counter.
    n: i64,

    /// First step interval in µs.
    c0: f32,

    /// Current step interval in µs.
    cn: f32,

    /// Step interval at max speed in µs.
    cmin: f32,

    /// Interval the driver waits before the next step, 0 = stopped.
    step_interval_us: u32,

    /// Direction of the pending step.
    direction: Direction,
}

impl StepRamp {
    /// Create a ramp at rest.
    ///
    /// Both rates must be positive; configuration validation enforces this.
    pub fn new(max_speed: f32, acceleration: f32) -> Self {
        let acceleration = fabsf(acceleration);
        Self {
            max_speed,
            acceleration,
            speed: 0.0,
            n: 0,
            c0: 0.676 * sqrtf(2.0 / acceleration) * MICROS_PER_SEC,
            cn: 0.0,
            cmin: MICROS_PER_SEC / max_speed,
            step_interval_us: 0,
            direction: Direction::CounterClockwise,
        }
    }

    /// Maximum speed in steps/sec.
    #[inline]
    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    /// Acceleration in steps/sec².
    #[inline]
    pub fn acceleration(&self) -> f32 {
        self.acceleration
    }

    /// Signed current speed in steps/sec.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Interval before the next step in µs (0 when stopped).
    #[inline]
    pub fn step_interval_us(&self) -> u32 {
        self.step_interval_us
    }

    /// Direction of the next step.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Steps needed to brake from the current speed.
    #[inline]
    pub fn steps_to_stop(&self) -> i64 {
        ((self.speed * self.speed) / (2.0 * self.acceleration)) as i64
    }

    /// Get current motion phase.
    pub fn phase(&self) -> MotionPhase {
        if self.step_interval_us == 0 {
            MotionPhase::Complete
        } else if self.n < 0 {
            MotionPhase::Decelerating
        } else if self.n > 0 && self.cn <= self.cmin {
            MotionPhase::Cruising
        } else if self.n == 0 {
            // Constant-speed stepping never advances the ramp counter.
            MotionPhase::Cruising
        } else {
            MotionPhase::Accelerating
        }
    }

    /// Recompute speed and step interval for the given distance to go.
    ///
    /// Called after every step and whenever the target changes.
    pub fn update(&mut self, distance_to_go: i32) {
        let distance = distance_to_go as i64;
        let steps_to_stop = self.steps_to_stop();

        if distance == 0 && steps_to_stop <= 1 {
            // At the target and slow enough to stop.
            self.stop_now();
            return;
        }

        if distance > 0 {
            if self.n > 0 {
                // Accelerating: start braking if we would overshoot or are going the wrong way.
                if steps_to_stop >= distance || self.direction == Direction::CounterClockwise {
                    self.n = -steps_to_stop;
                }
            } else if self.n < 0 && steps_to_stop < distance && self.direction == Direction::Clockwise {
                // Braking but there is room again: resume accelerating.
                self.n = -self.n;
            }
        } else if distance < 0 {
            if self.n > 0 {
                if steps_to_stop >= -distance || self.direction == Direction::Clockwise {
                    self.n = -steps_to_stop;
                }
            } else if self.n < 0 && steps_to_stop < -distance && self.direction == Direction::CounterClockwise {
                self.n = -self.n;
            }
        }

        if self.n == 0 {
            // First step from rest.
            self.cn = self.c0;
            self.direction = if distance > 0 {
                Direction::Clockwise
            } else {
                Direction::CounterClockwise
            };
        } else {
            self.cn -= (2.0 * self.cn) / ((4.0 * self.n as f32) + 1.0);
            if self.cn < self.cmin {
                self.cn = self.cmin;
            }
        }

        self.n += 1;
        self.step_interval_us = self.cn as u32;
        self.speed = MICROS_PER_SEC / self.cn;
        if self.direction == Direction::CounterClockwise {
            self.speed = -self.speed;
        }
    }

    /// Switch to constant-speed stepping at `speed` steps/sec.
    ///
    /// The speed is clamped to ±max speed. Zero stops stepping.
    pub fn set_constant_speed(&mut self, speed: f32) {
        let speed = speed.clamp(-self.max_speed, self.max_speed);
        if speed == self.speed {
            return;
        }

        if speed == 0.0 {
            self.step_interval_us = 0;
        } else {
            self.step_interval_us = fabsf(MICROS_PER_SEC / speed) as u32;
            self.direction = if speed > 0.0 {
                Direction::Clockwise
            } else {
                Direction::CounterClockwise
            };
        }
        self.speed = speed;
    }

    /// Drop all motion state without braking.
    pub fn stop_now(&mut self) {
        self.step_interval_us = 0;
        self.speed = 0.0;
        self.n = 0;
    }
}
