// src/lib.rs
//! Liveness and readiness for a set of streaming consumers and producers.
//!
//! Every registered client is tracked from its lifecycle events and the
//! [`HealthAggregator`] folds the per-client statuses into the two answers
//! an orchestrator asks for.
pub mod config;
pub mod events;
pub mod health;
pub mod server;
pub mod status;

pub use crate::config::{AggregatorConfig, Config, ProbeConfig};
pub use crate::events::{
    ConsumerEmitter, ConsumerEvent, ConsumerHandle, CrashPayload, ProducerEmitter, ProducerEvent,
    ProducerHandle,
};
pub use crate::health::{AggregationPolicy, HealthAggregator, HealthReport};
pub use crate::status::{ClientState, ClientStatus, Status};
