// src/status/mod.rs
mod client;
mod state;

pub use client::{ClientRole, ClientState, ClientStatus, ConsumerStatus, ProducerStatus};
pub use state::Status;
