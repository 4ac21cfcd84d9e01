// tests/health_checker_tests.rs
use kafka_health_checker::{
    AggregatorConfig, ConsumerEmitter, ConsumerEvent, ConsumerHandle, CrashPayload,
    HealthAggregator, ProducerEmitter, ProducerEvent,
};
use std::sync::Arc;
use std::thread;
use tokio::sync::broadcast;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn test_one_consumer_one_producer_lifecycle() {
    init_tracing();
    let consumer = ConsumerEmitter::new("orders-consumer");
    let producer = ProducerEmitter::new("orders-producer");
    let checker = HealthAggregator::register(&[&consumer], &[&producer], None);

    assert!(checker.is_healthy());
    assert!(!checker.is_ready());

    consumer.emit(&ConsumerEvent::Connect);
    producer.emit(&ProducerEvent::Connect);
    assert!(checker.is_healthy());
    assert!(!checker.is_ready());

    consumer.emit(&ConsumerEvent::GroupJoin);
    assert!(checker.is_healthy());
    assert!(checker.is_ready());

    producer.emit(&ProducerEvent::Disconnect);
    assert!(!checker.is_healthy());
    assert!(!checker.is_ready());
}

#[test]
fn test_two_consumers_all_must_agree() {
    init_tracing();
    let first = ConsumerEmitter::new("first");
    let second = ConsumerEmitter::new("second");
    let producer = ProducerEmitter::new("producer");
    let checker = HealthAggregator::register(&[&first, &second], &[&producer], None);

    first.emit(&ConsumerEvent::Connect);
    first.emit(&ConsumerEvent::GroupJoin);
    assert!(checker.is_healthy());
    assert!(!checker.is_ready());

    second.emit(&ConsumerEvent::Connect);
    second.emit(&ConsumerEvent::GroupJoin);
    producer.emit(&ProducerEvent::Connect);
    assert!(checker.is_ready());

    first.emit(&ConsumerEvent::Stop);
    assert!(checker.is_healthy());
    assert!(!checker.is_ready());

    first.emit(&ConsumerEvent::Disconnect);
    second.emit(&ConsumerEvent::Disconnect);
    producer.emit(&ProducerEvent::Disconnect);
    assert!(!checker.is_healthy());
    assert!(!checker.is_ready());
}

#[test]
fn test_two_consumers_one_fails_with_any_policy() {
    init_tracing();
    let first = ConsumerEmitter::new("first");
    let second = ConsumerEmitter::new("second");
    let producer = ProducerEmitter::new("producer");
    let config = AggregatorConfig { check_status_for_all: false };
    let checker = HealthAggregator::register(&[&first, &second], &[&producer], Some(config));

    assert!(checker.is_healthy());
    assert!(!checker.is_ready());

    second.emit(&ConsumerEvent::GroupJoin);
    producer.emit(&ProducerEvent::Connect);
    assert!(checker.is_ready());

    first.emit(&ConsumerEvent::Crash(CrashPayload::default()));
    assert!(checker.is_healthy());
    assert!(checker.is_ready());

    second.emit(&ConsumerEvent::Disconnect);
    producer.emit(&ProducerEvent::Disconnect);
    assert!(!checker.is_healthy());
    assert!(!checker.is_ready());
}

#[tokio::test]
async fn test_events_forwarded_from_channels() {
    init_tracing();
    let consumer = Arc::new(ConsumerEmitter::new("streamed-consumer"));
    let producer = Arc::new(ProducerEmitter::new("streamed-producer"));
    let checker = HealthAggregator::builder()
        .consumer(&consumer)
        .producer(&producer)
        .build();

    let (consumer_tx, consumer_rx) = broadcast::channel(8);
    let (producer_tx, producer_rx) = broadcast::channel(8);
    let consumer_task = consumer.clone().forward(consumer_rx);
    let producer_task = producer.clone().forward(producer_rx);

    consumer_tx.send(ConsumerEvent::Connect).unwrap();
    consumer_tx.send(ConsumerEvent::GroupJoin).unwrap();
    consumer_tx
        .send(ConsumerEvent::Crash(CrashPayload::restarting()))
        .unwrap();
    producer_tx.send(ProducerEvent::Connect).unwrap();
    drop(consumer_tx);
    drop(producer_tx);

    consumer_task.await.unwrap();
    producer_task.await.unwrap();

    assert!(checker.is_healthy());
    assert!(!checker.is_ready());

    let report = checker.report();
    assert!(report.clients[0].healthy);
    assert!(!report.clients[0].ready);
    assert!(report.clients[1].ready);
}

#[test]
fn test_concurrent_clients_keep_their_own_status() {
    init_tracing();
    let consumers: Vec<_> = (0..8)
        .map(|i| ConsumerEmitter::new(format!("consumer-{}", i)))
        .collect();
    let handles: Vec<&dyn ConsumerHandle> =
        consumers.iter().map(|c| c as &dyn ConsumerHandle).collect();
    let checker = HealthAggregator::register(&handles, &[], None);

    thread::scope(|scope| {
        for (i, consumer) in consumers.iter().enumerate() {
            scope.spawn(move || {
                for _ in 0..200 {
                    consumer.emit(&ConsumerEvent::Connect);
                    consumer.emit(&ConsumerEvent::GroupJoin);
                    consumer.emit(&ConsumerEvent::Crash(CrashPayload::restarting()));
                }
                let last = if i % 2 == 0 {
                    ConsumerEvent::GroupJoin
                } else {
                    ConsumerEvent::Disconnect
                };
                consumer.emit(&last);
            });
        }

        for _ in 0..500 {
            for row in checker.report().clients {
                // A consumer is never ready without being healthy.
                assert!(row.healthy || !row.ready, "inconsistent row for {}", row.id);
                if row.last_transition.is_none() {
                    assert!(row.healthy && !row.ready);
                }
            }
        }
    });

    for (i, row) in checker.report().clients.iter().enumerate() {
        assert_eq!(row.id, format!("consumer-{}", i));
        assert_eq!(row.healthy, i % 2 == 0);
        assert_eq!(row.ready, i % 2 == 0);
    }
    assert!(!checker.is_healthy());
}
