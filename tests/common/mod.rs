//! Simulated joint hardware shared by the integration tests.
//!
//! Every part is a cheap clone over shared state, so the test keeps one handle
//! while the controller owns the other.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorKind, ErrorType, InputPin, OutputPin};
use joint_control::error::TransportError;
use joint_control::io::Line;
use joint_control::motor::{DualEnable, FullFourWire};
use joint_control::{
    BusMessage, Error, Instant, JointConfig, JointController, LineInput, MemoryStorage, MessageBus,
};

/// Output pin whose level can be read back.
#[derive(Clone, Default)]
pub struct Level(Rc<Cell<bool>>);

impl Level {
    pub fn is_set(&self) -> bool {
        self.0.get()
    }
}

impl ErrorType for Level {
    type Error = Infallible;
}

impl OutputPin for Level {
    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.set(true);
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.set(false);
        Ok(())
    }
}

/// Read failure injected into a [`Button`].
#[derive(Debug)]
pub struct PinFault;

impl embedded_hal::digital::Error for PinFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Pull-up input with a switch to ground: pressed reads low.
#[derive(Clone, Default)]
pub struct Button {
    pressed: Rc<Cell<bool>>,
    faulty: Rc<Cell<bool>>,
}

impl Button {
    pub fn press(&self) {
        self.pressed.set(true);
    }

    pub fn release(&self) {
        self.pressed.set(false);
    }

    /// Make every read fail until cleared.
    pub fn set_faulty(&self, faulty: bool) {
        self.faulty.set(faulty);
    }

    fn level(&self) -> Result<bool, PinFault> {
        if self.faulty.get() {
            return Err(PinFault);
        }
        Ok(self.pressed.get())
    }
}

impl ErrorType for Button {
    type Error = PinFault;
}

impl InputPin for Button {
    fn is_high(&mut self) -> Result<bool, PinFault> {
        self.level().map(|pressed| !pressed)
    }

    fn is_low(&mut self) -> Result<bool, PinFault> {
        self.level()
    }
}

/// Serial console fed by the test.
#[derive(Clone, Default)]
pub struct SimSerial(Rc<RefCell<VecDeque<String>>>);

impl SimSerial {
    pub fn send(&self, line: &str) {
        self.0.borrow_mut().push_back(line.to_string());
    }
}

impl LineInput for SimSerial {
    fn read_line(&mut self) -> Option<Line> {
        let line = self.0.borrow_mut().pop_front()?;
        Line::try_from(line.as_str()).ok()
    }
}

#[derive(Default)]
pub struct BusState {
    pub connected: bool,
    pub refusals: u32,
    pub connect_attempts: u32,
    pub subscriptions: Vec<String>,
    pub inbox: VecDeque<BusMessage>,
    pub published: Vec<(String, String)>,
}

/// Message broker fed and inspected by the test.
#[derive(Clone, Default)]
pub struct SimBus(Rc<RefCell<BusState>>);

impl SimBus {
    pub fn deliver(&self, topic: &str, payload: &str) {
        let message = BusMessage::new(topic, payload).expect("message fits");
        self.0.borrow_mut().inbox.push_back(message);
    }

    pub fn refuse_connects(&self, count: u32) {
        self.0.borrow_mut().refusals = count;
    }

    pub fn drop_link(&self) {
        self.0.borrow_mut().connected = false;
    }

    pub fn state(&self) -> std::cell::Ref<'_, BusState> {
        self.0.borrow()
    }

    pub fn published_on(&self, topic: &str) -> Vec<String> {
        self.0
            .borrow()
            .published
            .iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, payload)| payload.clone())
            .collect()
    }
}

impl MessageBus for SimBus {
    fn is_connected(&mut self) -> bool {
        self.0.borrow().connected
    }

    fn connect(&mut self) -> Result<(), TransportError> {
        let mut state = self.0.borrow_mut();
        state.connect_attempts += 1;
        if state.refusals > 0 {
            state.refusals -= 1;
            return Err(TransportError::ConnectFailed);
        }
        state.connected = true;
        Ok(())
    }

    fn subscribe(&mut self, topic: &str) -> Result<(), TransportError> {
        self.0.borrow_mut().subscriptions.push(topic.to_string());
        Ok(())
    }

    fn poll(&mut self) -> Option<BusMessage> {
        let mut state = self.0.borrow_mut();
        if !state.connected {
            return None;
        }
        state.inbox.pop_front()
    }

    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), TransportError> {
        let mut state = self.0.borrow_mut();
        if !state.connected {
            return Err(TransportError::PublishFailed);
        }
        state.published.push((topic.to_string(), payload.to_string()));
        Ok(())
    }
}

pub type SimJoint = JointController<
    FullFourWire<Level, Level, Level, Level>,
    DualEnable<Level, Level>,
    Button,
    Button,
    MemoryStorage,
    SimSerial,
    SimBus,
>;

/// The test's handles on the joint hardware.
#[derive(Clone, Default)]
pub struct Board {
    pub coils: [Level; 4],
    pub enable: [Level; 2],
    pub action: Button,
    pub switch: Button,
    pub serial: SimSerial,
    pub bus: SimBus,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and start a joint on this board at `Instant::ZERO`.
    pub fn joint(&self, storage: MemoryStorage) -> SimJoint {
        let [c1, c2, c3, c4] = self.coils.clone();
        let [en1, en2] = self.enable.clone();
        let mut joint = JointController::builder()
            .config(JointConfig::default())
            .actuator(FullFourWire::new(c1, c2, c3, c4))
            .enable(DualEnable::new(en1, en2))
            .panel(self.action.clone(), self.switch.clone())
            .storage(storage)
            .line_input(self.serial.clone())
            .bus(self.bus.clone())
            .build()
            .expect("default config is valid");
        joint.start(Instant::ZERO).expect("start");
        joint
    }

    pub fn enabled(&self) -> bool {
        let [a, b] = &self.enable;
        assert_eq!(a.is_set(), b.is_set(), "enable lines disagree");
        a.is_set()
    }
}

/// Millisecond control-loop driver.
pub struct Clock {
    pub now: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self { now: Instant::ZERO }
    }

    /// Tick once per millisecond for `ms`, checking the enable invariant.
    pub fn run(&mut self, joint: &mut SimJoint, board: &Board, ms: u64) {
        for _ in 0..ms {
            self.step(joint, board);
        }
    }

    /// Tick until `done` holds, up to `limit_ms`.
    pub fn run_until(
        &mut self,
        joint: &mut SimJoint,
        board: &Board,
        limit_ms: u64,
        mut done: impl FnMut(&SimJoint) -> bool,
    ) {
        for _ in 0..limit_ms {
            if done(joint) {
                return;
            }
            self.step(joint, board);
        }
        panic!("condition not reached within {} ms", limit_ms);
    }

    /// Tick once per millisecond for `ms`, collecting tick errors instead of
    /// failing on them.
    pub fn run_faulty(&mut self, joint: &mut SimJoint, board: &Board, ms: u64) -> Vec<Error> {
        (0..ms)
            .filter_map(|_| self.try_step(joint, board).err())
            .collect()
    }

    fn step(&mut self, joint: &mut SimJoint, board: &Board) {
        self.try_step(joint, board).expect("tick");
    }

    fn try_step(&mut self, joint: &mut SimJoint, board: &Board) -> Result<(), Error> {
        self.now = self.now.plus_millis(1);
        let result = joint.tick(self.now);
        assert_eq!(
            board.enabled(),
            joint.axis().distance_to_go() != 0,
            "enable line out of step with motion at {} ms",
            self.now.as_millis()
        );
        result
    }
}
