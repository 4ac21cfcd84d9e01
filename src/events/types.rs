// src/events/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// An event pushed by a messaging client, keyed for subscription by its kind.
pub trait LifecycleEvent: Send + Sync + 'static {
    type Kind: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static;

    fn kind(&self) -> Self::Kind;
}

/// Payload of a consumer crash. An absent `restart` flag means the client
/// will not come back on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrashPayload {
    #[serde(default)]
    pub restart: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, rename = "groupId", alias = "group_id")]
    pub group_id: Option<String>,
}

impl CrashPayload {
    pub fn restarting() -> Self {
        Self {
            restart: Some(true),
            ..Self::default()
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsumerEvent {
    Connect,
    GroupJoin,
    Stop,
    Disconnect,
    Crash(CrashPayload),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsumerEventKind {
    Connect,
    GroupJoin,
    Stop,
    Disconnect,
    Crash,
}

impl ConsumerEventKind {
    pub const ALL: [ConsumerEventKind; 5] = [
        ConsumerEventKind::Connect,
        ConsumerEventKind::GroupJoin,
        ConsumerEventKind::Stop,
        ConsumerEventKind::Disconnect,
        ConsumerEventKind::Crash,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ConsumerEventKind::Connect => "consumer.connect",
            ConsumerEventKind::GroupJoin => "consumer.group_join",
            ConsumerEventKind::Stop => "consumer.stop",
            ConsumerEventKind::Disconnect => "consumer.disconnect",
            ConsumerEventKind::Crash => "consumer.crash",
        }
    }
}

impl LifecycleEvent for ConsumerEvent {
    type Kind = ConsumerEventKind;

    fn kind(&self) -> ConsumerEventKind {
        match self {
            ConsumerEvent::Connect => ConsumerEventKind::Connect,
            ConsumerEvent::GroupJoin => ConsumerEventKind::GroupJoin,
            ConsumerEvent::Stop => ConsumerEventKind::Stop,
            ConsumerEvent::Disconnect => ConsumerEventKind::Disconnect,
            ConsumerEvent::Crash(_) => ConsumerEventKind::Crash,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProducerEvent {
    Connect,
    Disconnect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProducerEventKind {
    Connect,
    Disconnect,
}

impl ProducerEventKind {
    pub const ALL: [ProducerEventKind; 2] =
        [ProducerEventKind::Connect, ProducerEventKind::Disconnect];

    pub fn name(&self) -> &'static str {
        match self {
            ProducerEventKind::Connect => "producer.connect",
            ProducerEventKind::Disconnect => "producer.disconnect",
        }
    }
}

impl LifecycleEvent for ProducerEvent {
    type Kind = ProducerEventKind;

    fn kind(&self) -> ProducerEventKind {
        match self {
            ProducerEvent::Connect => ProducerEventKind::Connect,
            ProducerEvent::Disconnect => ProducerEventKind::Disconnect,
        }
    }
}

impl fmt::Display for ConsumerEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for ProducerEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
