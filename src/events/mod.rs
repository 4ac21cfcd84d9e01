// src/events/mod.rs
mod emitter;
mod types;

pub use emitter::{ConsumerHandle, EventEmitter, Listener, ProducerHandle};
pub use types::{
    ConsumerEvent, ConsumerEventKind, CrashPayload, LifecycleEvent, ProducerEvent,
    ProducerEventKind,
};

pub type ConsumerEmitter = EventEmitter<ConsumerEvent>;
pub type ProducerEmitter = EventEmitter<ProducerEvent>;
