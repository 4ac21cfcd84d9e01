// src/health/aggregator.rs
use super::policy::AggregationPolicy;
use super::report::HealthReport;
use crate::config::AggregatorConfig;
use crate::events::{
    ConsumerEvent, ConsumerEventKind, ConsumerHandle, CrashPayload, Listener, ProducerEvent,
    ProducerEventKind, ProducerHandle,
};
use crate::status::{ClientState, ClientStatus, ConsumerStatus, ProducerStatus};
use std::sync::Arc;
use tracing::{info, warn};

/// Answers liveness and readiness for a fixed set of messaging clients.
///
/// Each registered client gets its own status, updated only by that
/// client's lifecycle events. An aggregator with no clients reports neither
/// healthy nor ready.
#[derive(Debug)]
pub struct HealthAggregator {
    clients: Vec<ClientStatus>,
    policy: AggregationPolicy,
}

impl HealthAggregator {
    pub fn register(
        consumers: &[&dyn ConsumerHandle],
        producers: &[&dyn ProducerHandle],
        config: Option<AggregatorConfig>,
    ) -> Self {
        let mut builder = Self::builder();
        for consumer in consumers {
            builder = builder.consumer(*consumer);
        }
        for producer in producers {
            builder = builder.producer(*producer);
        }
        if let Some(config) = config {
            builder = builder.config(config);
        }
        builder.build()
    }

    pub fn builder() -> HealthAggregatorBuilder {
        HealthAggregatorBuilder::default()
    }

    pub fn is_healthy(&self) -> bool {
        self.policy.evaluate(self.clients.iter().map(|c| c.is_healthy()))
    }

    pub fn is_ready(&self) -> bool {
        self.policy.evaluate(self.clients.iter().map(|c| c.is_ready()))
    }

    pub fn report(&self) -> HealthReport {
        HealthReport::collect(&self.clients, self.policy)
    }

    /// Consumers first, then producers, each in registration order.
    pub fn clients(&self) -> &[ClientStatus] {
        &self.clients
    }

    pub fn policy(&self) -> AggregationPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

#[derive(Default)]
pub struct HealthAggregatorBuilder {
    consumers: Vec<Arc<ConsumerStatus>>,
    producers: Vec<Arc<ProducerStatus>>,
    config: AggregatorConfig,
}

impl HealthAggregatorBuilder {
    /// Starts tracking a consumer. Its events are wired immediately.
    pub fn consumer<C: ConsumerHandle + ?Sized>(mut self, handle: &C) -> Self {
        self.consumers.push(track_consumer(handle));
        self
    }

    pub fn producer<P: ProducerHandle + ?Sized>(mut self, handle: &P) -> Self {
        self.producers.push(track_producer(handle));
        self
    }

    pub fn config(mut self, config: AggregatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> HealthAggregator {
        let policy = AggregationPolicy::from(&self.config);

        if self.consumers.is_empty() && self.producers.is_empty() {
            warn!("No clients registered, health and readiness will always be reported as false");
        } else {
            info!(
                "Tracking {} consumers and {} producers with {:?} policy",
                self.consumers.len(),
                self.producers.len(),
                policy
            );
        }

        let clients = self
            .consumers
            .into_iter()
            .map(ClientStatus::Consumer)
            .chain(self.producers.into_iter().map(ClientStatus::Producer))
            .collect();

        HealthAggregator { clients, policy }
    }
}

fn track_consumer<C: ConsumerHandle + ?Sized>(handle: &C) -> Arc<ConsumerStatus> {
    let status = Arc::new(ConsumerStatus::new(handle.client_id()));

    for kind in ConsumerEventKind::ALL {
        let consumer = Arc::clone(&status);
        let listener: Listener<ConsumerEvent> = match kind {
            ConsumerEventKind::Connect => Box::new(move |_: &ConsumerEvent| consumer.on_connect()),
            ConsumerEventKind::GroupJoin => {
                Box::new(move |_: &ConsumerEvent| consumer.on_group_join())
            }
            ConsumerEventKind::Stop => Box::new(move |_: &ConsumerEvent| consumer.on_stop()),
            ConsumerEventKind::Disconnect => {
                Box::new(move |_: &ConsumerEvent| consumer.on_disconnect())
            }
            // A crash without a payload counts as one that will not restart.
            ConsumerEventKind::Crash => Box::new(move |event: &ConsumerEvent| match event {
                ConsumerEvent::Crash(payload) => consumer.on_crash(payload),
                _ => consumer.on_crash(&CrashPayload::default()),
            }),
        };
        handle.on(kind, listener);
    }

    status
}

fn track_producer<P: ProducerHandle + ?Sized>(handle: &P) -> Arc<ProducerStatus> {
    let status = Arc::new(ProducerStatus::new(handle.client_id()));

    for kind in ProducerEventKind::ALL {
        let producer = Arc::clone(&status);
        let listener: Listener<ProducerEvent> = match kind {
            ProducerEventKind::Connect => Box::new(move |_: &ProducerEvent| producer.on_connect()),
            ProducerEventKind::Disconnect => {
                Box::new(move |_: &ProducerEvent| producer.on_disconnect())
            }
        };
        handle.on(kind, listener);
    }

    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{ConsumerEmitter, ProducerEmitter};
    use crate::status::Status;

    fn any_policy() -> Option<AggregatorConfig> {
        Some(AggregatorConfig { check_status_for_all: false })
    }

    #[test]
    fn test_empty_aggregator_fails_closed() {
        for config in [None, any_policy()] {
            let aggregator = HealthAggregator::register(&[], &[], config);
            assert!(aggregator.is_empty());
            assert!(!aggregator.is_healthy());
            assert!(!aggregator.is_ready());
        }
    }

    #[test]
    fn test_registration_starts_healthy_not_ready() {
        let consumer = ConsumerEmitter::new("orders");
        let producer = ProducerEmitter::new("audit");

        let aggregator = HealthAggregator::register(&[&consumer], &[&producer], None);

        assert_eq!(aggregator.len(), 2);
        assert_eq!(aggregator.policy(), AggregationPolicy::All);
        for client in aggregator.clients() {
            assert_eq!(client.status(), Status::new(true, false));
        }
        assert!(aggregator.is_healthy());
        assert!(!aggregator.is_ready());
    }

    #[test]
    fn test_registration_subscribes_every_event() {
        let consumer = ConsumerEmitter::new("orders");
        let producer = ProducerEmitter::new("audit");

        let _aggregator = HealthAggregator::register(&[&consumer], &[&producer], None);

        for kind in ConsumerEventKind::ALL {
            assert_eq!(consumer.listener_count(kind), 1);
        }
        for kind in ProducerEventKind::ALL {
            assert_eq!(producer.listener_count(kind), 1);
        }
    }

    #[test]
    fn test_events_only_touch_their_own_client() {
        let first = ConsumerEmitter::new("first");
        let second = ConsumerEmitter::new("second");
        let third = ConsumerEmitter::new("third");

        let aggregator = HealthAggregator::register(&[&first, &second, &third], &[], None);

        second.emit(&ConsumerEvent::GroupJoin);
        third.emit(&ConsumerEvent::Disconnect);

        let statuses: Vec<_> = aggregator
            .clients()
            .iter()
            .map(|c| (c.client_id().to_string(), c.status()))
            .collect();
        assert_eq!(
            statuses,
            vec![
                ("first".to_string(), Status::new(true, false)),
                ("second".to_string(), Status::new(true, true)),
                ("third".to_string(), Status::new(false, false)),
            ]
        );
    }

    #[test]
    fn test_all_policy_requires_every_client() {
        let healthy = ConsumerEmitter::new("healthy");
        let failing = ConsumerEmitter::new("failing");
        let aggregator = HealthAggregator::register(&[&healthy, &failing], &[], None);

        assert!(aggregator.is_healthy());
        assert!(!aggregator.is_ready());

        failing.emit(&ConsumerEvent::Disconnect);
        assert!(!aggregator.is_healthy());
    }

    #[test]
    fn test_any_policy_needs_one_client() {
        let healthy = ConsumerEmitter::new("healthy");
        let failing = ConsumerEmitter::new("failing");
        let aggregator = HealthAggregator::register(&[&healthy, &failing], &[], any_policy());

        failing.emit(&ConsumerEvent::Disconnect);
        assert!(aggregator.is_healthy());
        assert!(!aggregator.is_ready());

        healthy.emit(&ConsumerEvent::GroupJoin);
        assert!(aggregator.is_ready());

        healthy.emit(&ConsumerEvent::Crash(CrashPayload::default()));
        assert!(!aggregator.is_healthy());
        assert!(!aggregator.is_ready());
    }

    #[test]
    fn test_crash_with_restart_stays_healthy() {
        let consumer = ConsumerEmitter::new("orders");
        let aggregator = HealthAggregator::register(&[&consumer], &[], None);

        consumer.emit(&ConsumerEvent::GroupJoin);
        consumer.emit(&ConsumerEvent::Crash(CrashPayload::restarting().with_error("rebalance")));

        assert!(aggregator.is_healthy());
        assert!(!aggregator.is_ready());
    }

    #[test]
    fn test_builder_orders_consumers_before_producers() {
        let producer = Arc::new(ProducerEmitter::new("audit"));
        let consumer = ConsumerEmitter::new("orders");

        let aggregator = HealthAggregator::builder()
            .producer(&producer)
            .consumer(&consumer)
            .config(AggregatorConfig { check_status_for_all: false })
            .build();

        let ids: Vec<_> = aggregator.clients().iter().map(|c| c.client_id()).collect();
        assert_eq!(ids, vec!["orders", "audit"]);
        assert_eq!(aggregator.policy(), AggregationPolicy::Any);

        producer.emit(&ProducerEvent::Connect);
        assert!(aggregator.is_ready());
    }

    #[test]
    fn test_report_matches_queries() {
        let consumer = ConsumerEmitter::new("orders");
        let producer = ProducerEmitter::new("audit");
        let aggregator = HealthAggregator::register(&[&consumer], &[&producer], None);

        producer.emit(&ProducerEvent::Connect);
        let report = aggregator.report();

        assert_eq!(report.healthy, aggregator.is_healthy());
        assert_eq!(report.ready, aggregator.is_ready());
        assert_eq!(report.clients.len(), 2);
        assert!(report.clients[0].last_transition.is_none());
        assert!(report.clients[1].ready);
        assert!(report.clients[1].last_transition.is_some());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["policy"], "all");
        assert_eq!(json["clients"][1]["role"], "producer");
        assert!(json["clients"][0].get("last_transition").is_none());
    }
}
