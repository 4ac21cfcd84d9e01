// src/status/client.rs
use super::state::Status;
use crate::events::{ConsumerEvent, CrashPayload, LifecycleEvent, ProducerEvent};
use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientRole {
    Consumer,
    Producer,
}

impl fmt::Display for ClientRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientRole::Consumer => f.write_str("consumer"),
            ClientRole::Producer => f.write_str("producer"),
        }
    }
}

/// Read side shared by every tracked client.
pub trait ClientState {
    fn status(&self) -> Status;

    fn is_healthy(&self) -> bool {
        self.status().healthy
    }

    fn is_ready(&self) -> bool {
        self.status().ready
    }
}

// Status and the time it was set travel together so a swap never tears them.
#[derive(Debug, Clone, Copy)]
struct Snapshot {
    status: Status,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug)]
struct StatusCell {
    client_id: String,
    role: ClientRole,
    current: ArcSwap<Snapshot>,
}

impl StatusCell {
    fn new(client_id: String, role: ClientRole) -> Self {
        Self {
            client_id,
            role,
            current: ArcSwap::from_pointee(Snapshot {
                status: Status::default(),
                updated_at: None,
            }),
        }
    }

    fn snapshot(&self) -> Snapshot {
        **self.current.load()
    }

    fn status(&self) -> Status {
        self.current.load().status
    }

    fn replace(&self, event: &'static str, next: Status) {
        let previous = self.current.swap(Arc::new(Snapshot {
            status: next,
            updated_at: Some(Utc::now()),
        }));

        debug!(
            client = %self.client_id,
            role = %self.role,
            event,
            status = %next,
            "client status updated"
        );

        if previous.status.healthy && !next.healthy {
            warn!("{} {} is now unhealthy ({})", self.role, self.client_id, event);
        } else if !previous.status.healthy && next.healthy {
            info!("{} {} is healthy again ({})", self.role, self.client_id, event);
        }
    }
}

/// Status of a consumer-role client.
#[derive(Debug)]
pub struct ConsumerStatus {
    cell: StatusCell,
}

impl ConsumerStatus {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            cell: StatusCell::new(client_id.into(), ClientRole::Consumer),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.cell.client_id
    }

    pub fn on_connect(&self) {
        self.apply(&ConsumerEvent::Connect);
    }

    pub fn on_group_join(&self) {
        self.apply(&ConsumerEvent::GroupJoin);
    }

    pub fn on_stop(&self) {
        self.apply(&ConsumerEvent::Stop);
    }

    pub fn on_disconnect(&self) {
        self.apply(&ConsumerEvent::Disconnect);
    }

    pub fn on_crash(&self, payload: &CrashPayload) {
        self.apply(&ConsumerEvent::Crash(payload.clone()));
    }

    pub fn apply(&self, event: &ConsumerEvent) {
        if let ConsumerEvent::Crash(CrashPayload { error: Some(error), .. }) = event {
            debug!(client = %self.cell.client_id, %error, "consumer crashed");
        }
        self.cell
            .replace(event.kind().name(), Status::after_consumer_event(event));
    }
}

impl ClientState for ConsumerStatus {
    fn status(&self) -> Status {
        self.cell.status()
    }
}

/// Status of a producer-role client. Producers only see connect and disconnect.
#[derive(Debug)]
pub struct ProducerStatus {
    cell: StatusCell,
}

impl ProducerStatus {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            cell: StatusCell::new(client_id.into(), ClientRole::Producer),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.cell.client_id
    }

    pub fn on_connect(&self) {
        self.apply(&ProducerEvent::Connect);
    }

    pub fn on_disconnect(&self) {
        self.apply(&ProducerEvent::Disconnect);
    }

    pub fn apply(&self, event: &ProducerEvent) {
        self.cell
            .replace(event.kind().name(), Status::after_producer_event(event));
    }
}

impl ClientState for ProducerStatus {
    fn status(&self) -> Status {
        self.cell.status()
    }
}

/// A tracked client of either role. Cloning shares the underlying status.
#[derive(Debug, Clone)]
pub enum ClientStatus {
    Consumer(Arc<ConsumerStatus>),
    Producer(Arc<ProducerStatus>),
}

impl ClientStatus {
    fn cell(&self) -> &StatusCell {
        match self {
            ClientStatus::Consumer(consumer) => &consumer.cell,
            ClientStatus::Producer(producer) => &producer.cell,
        }
    }

    pub fn client_id(&self) -> &str {
        &self.cell().client_id
    }

    pub fn role(&self) -> ClientRole {
        self.cell().role
    }

    /// When the last lifecycle event was applied, `None` before the first one.
    pub fn last_transition(&self) -> Option<DateTime<Utc>> {
        self.cell().snapshot().updated_at
    }

    /// Status together with the time it was set, read in a single load.
    pub fn snapshot(&self) -> (Status, Option<DateTime<Utc>>) {
        let snapshot = self.cell().snapshot();
        (snapshot.status, snapshot.updated_at)
    }

    pub fn as_consumer(&self) -> Option<&ConsumerStatus> {
        match self {
            ClientStatus::Consumer(consumer) => Some(consumer.as_ref()),
            ClientStatus::Producer(_) => None,
        }
    }

    pub fn as_producer(&self) -> Option<&ProducerStatus> {
        match self {
            ClientStatus::Producer(producer) => Some(producer.as_ref()),
            ClientStatus::Consumer(_) => None,
        }
    }
}

impl ClientState for ClientStatus {
    fn status(&self) -> Status {
        self.cell().status()
    }
}
