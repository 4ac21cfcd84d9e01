// src/status/state.rs
use crate::events::{ConsumerEvent, CrashPayload, ProducerEvent};
use std::fmt;

/// Health and readiness of a single client. Always replaced as a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Status {
    pub healthy: bool,
    pub ready: bool,
}

impl Status {
    /// Healthy but not ready: connected, stopped, or freshly registered.
    pub const STARTING: Status = Status { healthy: true, ready: false };
    pub const READY: Status = Status { healthy: true, ready: true };
    pub const DOWN: Status = Status { healthy: false, ready: false };

    pub const fn new(healthy: bool, ready: bool) -> Self {
        Self { healthy, ready }
    }

    /// Status after a consumer crash. Readiness is always lost; the client
    /// only stays healthy when it announced a restart.
    pub fn crashed(payload: &CrashPayload) -> Self {
        Self {
            healthy: payload.restart.unwrap_or(false),
            ready: false,
        }
    }

    pub fn after_consumer_event(event: &ConsumerEvent) -> Self {
        match event {
            ConsumerEvent::Connect => Self::STARTING,
            ConsumerEvent::GroupJoin => Self::READY,
            ConsumerEvent::Stop => Self::STARTING,
            ConsumerEvent::Disconnect => Self::DOWN,
            ConsumerEvent::Crash(payload) => Self::crashed(payload),
        }
    }

    pub fn after_producer_event(event: &ProducerEvent) -> Self {
        match event {
            ProducerEvent::Connect => Self::READY,
            ProducerEvent::Disconnect => Self::DOWN,
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::STARTING
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "healthy={} ready={}", self.healthy, self.ready)
    }
}
