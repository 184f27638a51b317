//! Message-bus link supervision.

use crate::config::units::Instant;
use crate::io::MessageBus;

/// Keeps the bus connected without blocking the control loop.
///
/// The first attempt is immediate; after a failure the next attempt waits for
/// the retry delay. Every successful (re)connect resubscribes all topics,
/// since brokers drop subscriptions with the session.
#[derive(Debug, Clone)]
pub struct LinkSupervisor {
    retry_ms: u64,
    next_attempt: Option<Instant>,
    up: bool,
    attempts: u32,
}

impl LinkSupervisor {
    /// Create a supervisor with the given retry delay.
    pub fn new(retry_ms: u32) -> Self {
        Self {
            retry_ms: u64::from(retry_ms),
            next_attempt: None,
            up: false,
            attempts: 0,
        }
    }

    /// Whether the link was up at the last supervision.
    #[inline]
    pub fn is_up(&self) -> bool {
        self.up
    }

    /// Connect attempts made so far.
    #[inline]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Check the link and reconnect if due. Returns `true` if the link is up.
    pub fn supervise<B: MessageBus>(&mut self, bus: &mut B, topics: &[&str], now: Instant) -> bool {
        if bus.is_connected() {
            if !self.up {
                self.established(bus, topics);
            }
            return true;
        }

        if self.up {
            warn!("bus link lost");
            self.up = false;
            self.next_attempt = None;
        }

        if self.next_attempt.is_some_and(|at| now < at) {
            return false;
        }

        self.attempts = self.attempts.wrapping_add(1);
        debug!("connecting to bus (attempt {})", self.attempts);
        match bus.connect() {
            Ok(()) => {
                self.established(bus, topics);
                true
            }
            Err(e) => {
                warn!("bus connect failed: {:?}, retrying in {} ms", e, self.retry_ms);
                self.next_attempt = Some(now.plus_millis(self.retry_ms));
                false
            }
        }
    }

    fn established<B: MessageBus>(&mut self, bus: &mut B, topics: &[&str]) {
        for topic in topics {
            if let Err(e) = bus.subscribe(topic) {
                warn!("subscribe to {} failed: {:?}", *topic, e);
            }
        }
        self.up = true;
        self.next_attempt = None;
        info!("bus link up");
    }
}
