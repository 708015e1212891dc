//! Concurrency properties: burst durability, non-blocking submit,
//! strictly sequential processing

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinSet;

use courier_core::application::dispatcher::Dispatcher;
use courier_core::domain::{Item, ItemPayload};
use courier_core::port::item_handler::mocks::MockItemHandler;
use courier_core::port::time_provider::SystemTimeProvider;

#[tokio::test]
async fn test_burst_from_concurrent_producers_no_loss_no_duplicates() {
    const PRODUCERS: usize = 10;
    const ITEMS_PER_PRODUCER: usize = 100;

    let handler = Arc::new(MockItemHandler::new_success());
    let dispatcher = Arc::new(Dispatcher::new(
        handler.clone(),
        Arc::new(SystemTimeProvider),
    ));

    let mut producers = JoinSet::new();
    for p in 0..PRODUCERS {
        let dispatcher = Arc::clone(&dispatcher);
        producers.spawn(async move {
            for i in 0..ITEMS_PER_PRODUCER {
                let payload = format!("{}::{}", p, i);
                let item = Item::new(format!("{}-{}", p, i), 0, ItemPayload::new(payload));
                assert!(dispatcher.submit(item));
            }
        });
    }
    while let Some(result) = producers.join_next().await {
        result.unwrap();
    }

    dispatcher.shutdown().await.unwrap();

    let handled = handler.handled_payloads();
    assert_eq!(handled.len(), PRODUCERS * ITEMS_PER_PRODUCER);

    // Exactly once each: no drops, no duplicates
    let unique: HashSet<&String> = handled.iter().collect();
    assert_eq!(unique.len(), PRODUCERS * ITEMS_PER_PRODUCER);

    // Each producer's own submission order survives the interleaving
    for p in 0..PRODUCERS {
        let prefix = format!("{}::", p);
        let seen: Vec<&String> = handled.iter().filter(|s| s.starts_with(&prefix)).collect();
        let expected: Vec<String> = (0..ITEMS_PER_PRODUCER)
            .map(|i| format!("{}::{}", p, i))
            .collect();
        assert_eq!(seen.len(), expected.len());
        for (seen, expected) in seen.iter().zip(expected.iter()) {
            assert_eq!(*seen, expected);
        }
    }

    let stats = dispatcher.stats();
    assert_eq!(stats.submitted, (PRODUCERS * ITEMS_PER_PRODUCER) as u64);
    assert_eq!(stats.processed, (PRODUCERS * ITEMS_PER_PRODUCER) as u64);
    assert_eq!(stats.failed, 0);
}

#[tokio::test]
async fn test_submit_stays_fast_under_blocked_handler() {
    // The handler blocks for far longer than the test; submits must still
    // return immediately, independent of backlog depth
    let handler = Arc::new(MockItemHandler::new_delay(Duration::from_secs(30)));
    let dispatcher = Dispatcher::new(handler, Arc::new(SystemTimeProvider));

    assert!(dispatcher.submit(Item::new_test("blocker")));
    // Give the loop time to pull the blocker into the handler
    tokio::time::sleep(Duration::from_millis(50)).await;

    let started = Instant::now();
    for i in 0..1000 {
        assert!(dispatcher.submit(Item::new_test(i.to_string())));
    }
    let elapsed = started.elapsed();

    assert!(
        elapsed < Duration::from_millis(500),
        "1000 submits took {:?} under a blocked handler",
        elapsed
    );
    assert_eq!(dispatcher.backlog(), 1000);
    // No shutdown here: draining would wait on the blocked handler
}

#[tokio::test]
async fn test_handler_invocations_never_overlap() {
    let handler = Arc::new(MockItemHandler::new_delay(Duration::from_millis(5)));
    let dispatcher = Arc::new(Dispatcher::new(
        handler.clone(),
        Arc::new(SystemTimeProvider),
    ));

    let mut producers = JoinSet::new();
    for p in 0..8 {
        let dispatcher = Arc::clone(&dispatcher);
        producers.spawn(async move {
            for i in 0..5 {
                assert!(dispatcher.submit(Item::new_test(format!("{}::{}", p, i))));
            }
        });
    }
    while let Some(result) = producers.join_next().await {
        result.unwrap();
    }

    dispatcher.shutdown().await.unwrap();

    assert_eq!(handler.call_count(), 40);
    assert_eq!(handler.max_in_flight(), 1, "handler invocations overlapped");

    // Entry/exit intervals are totally ordered
    let calls = handler.calls();
    for pair in calls.windows(2) {
        assert!(pair[1].entered_at >= pair[0].exited_at);
    }
}
