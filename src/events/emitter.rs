// src/events/emitter.rs
use super::types::{
    ConsumerEvent, ConsumerEventKind, LifecycleEvent, ProducerEvent, ProducerEventKind,
};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub type Listener<E> = Box<dyn Fn(&E) + Send + Sync + 'static>;

type SharedListener<E> = Arc<dyn Fn(&E) + Send + Sync + 'static>;

/// Subscription surface of a consumer-role client.
pub trait ConsumerHandle: Send + Sync {
    fn client_id(&self) -> &str;

    fn on(&self, kind: ConsumerEventKind, listener: Listener<ConsumerEvent>);
}

/// Subscription surface of a producer-role client.
pub trait ProducerHandle: Send + Sync {
    fn client_id(&self) -> &str;

    fn on(&self, kind: ProducerEventKind, listener: Listener<ProducerEvent>);
}

impl<T: ConsumerHandle + ?Sized> ConsumerHandle for Arc<T> {
    fn client_id(&self) -> &str {
        (**self).client_id()
    }

    fn on(&self, kind: ConsumerEventKind, listener: Listener<ConsumerEvent>) {
        (**self).on(kind, listener)
    }
}

impl<T: ProducerHandle + ?Sized> ProducerHandle for Arc<T> {
    fn client_id(&self) -> &str {
        (**self).client_id()
    }

    fn on(&self, kind: ProducerEventKind, listener: Listener<ProducerEvent>) {
        (**self).on(kind, listener)
    }
}

/// In-process event source that dispatches events to listeners by kind.
///
/// Listeners run synchronously inside `emit`, after the listener table has
/// been released, so they may subscribe or emit on the same emitter.
pub struct EventEmitter<E: LifecycleEvent> {
    client_id: String,
    listeners: DashMap<E::Kind, Vec<SharedListener<E>>>,
}

impl<E: LifecycleEvent> EventEmitter<E> {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            listeners: DashMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.client_id
    }

    pub fn subscribe(&self, kind: E::Kind, listener: Listener<E>) {
        self.listeners.entry(kind).or_default().push(Arc::from(listener));
    }

    /// Runs every listener registered for the event's kind, in subscription
    /// order, and returns how many ran.
    pub fn emit(&self, event: &E) -> usize {
        let kind = event.kind();
        let listeners: Vec<SharedListener<E>> = match self.listeners.get(&kind) {
            Some(listeners) => listeners.value().clone(),
            None => {
                debug!(client = %self.client_id, ?kind, "no listener for event");
                return 0;
            }
        };

        for listener in &listeners {
            listener(event);
        }
        listeners.len()
    }

    pub fn listener_count(&self, kind: E::Kind) -> usize {
        self.listeners.get(&kind).map(|l| l.len()).unwrap_or(0)
    }
}

impl<E: LifecycleEvent + Clone> EventEmitter<E> {
    /// Re-emits everything received on `rx` until the channel closes.
    pub fn forward(self: Arc<Self>, mut rx: broadcast::Receiver<E>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        self.emit(&event);
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(
                            "Event stream for {} lagged, {} events skipped",
                            self.client_id, skipped
                        );
                    }
                    Err(RecvError::Closed) => {
                        debug!(client = %self.client_id, "event stream closed");
                        break;
                    }
                }
            }
        })
    }
}

impl ConsumerHandle for EventEmitter<ConsumerEvent> {
    fn client_id(&self) -> &str {
        self.id()
    }

    fn on(&self, kind: ConsumerEventKind, listener: Listener<ConsumerEvent>) {
        self.subscribe(kind, listener);
    }
}

impl ProducerHandle for EventEmitter<ProducerEvent> {
    fn client_id(&self) -> &str {
        self.id()
    }

    fn on(&self, kind: ProducerEventKind, listener: Listener<ProducerEvent>) {
        self.subscribe(kind, listener);
    }
}
