//! Simulated joint example.
//!
//! Runs the shoulder joint on simulated pins in simulated time: a serial move,
//! a calibration requested over the bus, and a restart that picks the
//! persisted position back up from a file.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use joint_control::error::TransportError;
use joint_control::io::Line;
use joint_control::motor::{DualEnable, StepDir};
use joint_control::{
    parse_config, BusMessage, CalibrationState, FileStorage, Instant, JointConfig,
    JointController, LineInput, MessageBus,
};

/// Output pin that only remembers its level.
#[derive(Default)]
struct DemoPin(bool);

impl ErrorType for DemoPin {
    type Error = Infallible;
}

impl OutputPin for DemoPin {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0 = true;
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0 = false;
        Ok(())
    }
}

/// Step pulses take no time in simulation.
struct DemoDelay;

impl DelayNs for DemoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

/// Active-low input held by the script.
#[derive(Clone, Default)]
struct DemoButton(Rc<Cell<bool>>);

impl ErrorType for DemoButton {
    type Error = Infallible;
}

impl InputPin for DemoButton {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.0.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.0.get())
    }
}

/// Serial console fed by the script.
#[derive(Clone, Default)]
struct DemoSerial(Rc<RefCell<VecDeque<&'static str>>>);

impl LineInput for DemoSerial {
    fn read_line(&mut self) -> Option<Line> {
        let line = self.0.borrow_mut().pop_front()?;
        println!("  serial <- {:?}", line);
        Line::try_from(line).ok()
    }
}

/// Broker that prints what the joint publishes.
#[derive(Clone, Default)]
struct ConsoleBus {
    inbox: Rc<RefCell<VecDeque<BusMessage>>>,
    connected: bool,
}

impl MessageBus for ConsoleBus {
    fn is_connected(&mut self) -> bool {
        self.connected
    }

    fn connect(&mut self) -> Result<(), TransportError> {
        println!("  bus connected");
        self.connected = true;
        Ok(())
    }

    fn subscribe(&mut self, topic: &str) -> Result<(), TransportError> {
        println!("  bus subscribe {}", topic);
        Ok(())
    }

    fn poll(&mut self) -> Option<BusMessage> {
        let message = self.inbox.borrow_mut().pop_front()?;
        println!("  bus <- {} {:?}", message.topic, message.payload);
        Some(message)
    }

    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), TransportError> {
        if topic.ends_with("uptime") {
            println!("  bus -> {} {}", topic, payload);
        }
        Ok(())
    }
}

type DemoJoint = JointController<
    StepDir<DemoPin, DemoPin, DemoDelay>,
    DualEnable<DemoPin, DemoPin>,
    DemoButton,
    DemoButton,
    FileStorage,
    DemoSerial,
    ConsoleBus,
>;

struct Rig {
    action: DemoButton,
    switch: DemoButton,
    serial: DemoSerial,
    inbox: Rc<RefCell<VecDeque<BusMessage>>>,
    now: Instant,
}

impl Rig {
    fn new() -> Self {
        Self {
            action: DemoButton::default(),
            switch: DemoButton::default(),
            serial: DemoSerial::default(),
            inbox: Rc::default(),
            now: Instant::ZERO,
        }
    }

    fn joint(&self, config: &JointConfig, storage: FileStorage) -> DemoJoint {
        let bus = ConsoleBus {
            inbox: self.inbox.clone(),
            connected: false,
        };
        JointController::builder()
            .config(config.clone())
            .actuator(StepDir::new(DemoPin::default(), DemoPin::default(), DemoDelay, false))
            .enable(DualEnable::new(DemoPin::default(), DemoPin::default()))
            .panel(self.action.clone(), self.switch.clone())
            .storage(storage)
            .line_input(self.serial.clone())
            .bus(bus)
            .build()
            .expect("Failed to build joint")
    }

    /// Advance one simulated millisecond.
    fn step(&mut self, joint: &mut DemoJoint) {
        self.now = self.now.plus_millis(1);
        joint.tick(self.now).expect("tick failed");
    }

    /// Tick until `done` holds.
    fn run_until(&mut self, joint: &mut DemoJoint, mut done: impl FnMut(&DemoJoint) -> bool) {
        while !done(joint) {
            self.step(joint);
        }
    }

    fn run(&mut self, joint: &mut DemoJoint, ms: u64) {
        for _ in 0..ms {
            self.step(joint);
        }
    }
}

fn main() {
    println!("=== Simulated Joint Example ===\n");

    let config = parse_config(
        r#"
name = "shoulder"

[homing]
start_delay_ms = 200
"#,
    )
    .expect("Failed to parse config");

    let path = std::env::temp_dir().join(format!("joint-demo-{}.bin", std::process::id()));
    let mut rig = Rig::new();
    let mut joint = rig.joint(&config, FileStorage::new(&path));

    let start = joint.start(rig.now).expect("Failed to start");
    println!("Started at stored position {} steps", start.value());

    println!("\n=== Serial move ===");
    rig.serial.0.borrow_mut().push_back("30");
    rig.run_until(&mut joint, |j| {
        j.axis().target_position() != start && j.axis().distance_to_go() == 0
    });
    report(&joint, rig.now);

    println!("\n=== Calibration over the bus ===");
    let request = BusMessage::new("robot/shoulder/control", "calibrate").expect("message fits");
    rig.inbox.borrow_mut().push_back(request);
    rig.run_until(&mut joint, |j| j.calibration().is_active());
    println!("  state: {}", joint.calibration().state().name());

    rig.action.0.set(true);
    rig.run_until(&mut joint, |j| j.calibration().state() == CalibrationState::Homing);
    rig.action.0.set(false);

    // The switch closes a short crawl away.
    let closes_at = joint.axis().current_position().value() + 40;
    let switch = rig.switch.clone();
    rig.run_until(&mut joint, |j| {
        switch.0.set(j.axis().current_position().value() >= closes_at);
        !j.calibration().is_active()
    });
    rig.switch.0.set(false);
    report(&joint, rig.now);

    println!("\n=== Restart ===");
    rig.run(&mut joint, 10);
    drop(joint);

    let mut joint = rig.joint(&config, FileStorage::new(&path));
    let restored = joint.start(rig.now).expect("Failed to restart");
    println!("Restarted with target {} steps", restored.value());

    let _ = std::fs::remove_file(&path);
    println!("\n=== Example Complete ===");
}

fn report(joint: &DemoJoint, now: Instant) {
    let position = joint.axis().current_position();
    println!(
        "  t={} ms: at {} steps ({} deg), {} write(s) persisted",
        now.as_millis(),
        position.value(),
        position.to_degrees().value(),
        joint.store().writes()
    );
}
