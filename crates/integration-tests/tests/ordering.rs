//! FIFO ordering properties of the dispatch queue

use std::sync::Arc;
use std::time::Duration;

use courier_core::application::dispatcher::Dispatcher;
use courier_core::domain::Item;
use courier_core::port::item_handler::mocks::MockItemHandler;
use courier_core::port::time_provider::SystemTimeProvider;

fn new_dispatcher(handler: Arc<MockItemHandler>) -> Dispatcher {
    Dispatcher::new(handler, Arc::new(SystemTimeProvider))
}

#[tokio::test]
async fn test_single_producer_fifo_order() {
    let handler = Arc::new(MockItemHandler::new_success());
    let dispatcher = new_dispatcher(handler.clone());

    for i in 0..50 {
        assert!(dispatcher.submit(Item::new_test(i.to_string())));
    }

    dispatcher.shutdown().await.unwrap();

    let expected: Vec<String> = (0..50).map(|i| i.to_string()).collect();
    assert_eq!(handler.handled_payloads(), expected);
}

#[tokio::test]
async fn test_items_queued_before_loop_catches_up_keep_order() {
    // All submits land before the first handler call finishes
    let handler = Arc::new(MockItemHandler::new_delay(Duration::from_millis(50)));
    let dispatcher = new_dispatcher(handler.clone());

    for payload in ["first", "second", "third"] {
        assert!(dispatcher.submit(Item::new_test(payload)));
    }

    dispatcher.shutdown().await.unwrap();

    assert_eq!(handler.handled_payloads(), vec!["first", "second", "third"]);
}

#[tokio::test]
async fn test_interleaved_batches_preserve_order() {
    let handler = Arc::new(MockItemHandler::new_delay(Duration::from_millis(20)));
    let dispatcher = new_dispatcher(handler.clone());

    for payload in ["0", "1", "2"] {
        assert!(dispatcher.submit(Item::new_test(payload)));
    }

    // A second batch arrives while the first is still being worked off
    tokio::time::sleep(Duration::from_millis(30)).await;
    for payload in ["a", "b"] {
        assert!(dispatcher.submit(Item::new_test(payload)));
    }

    dispatcher.shutdown().await.unwrap();

    assert_eq!(handler.handled_payloads(), vec!["0", "1", "2", "a", "b"]);

    // Strictly sequential: each call starts only after the previous returned,
    // so consecutive calls are separated by at least the handler latency
    let calls = handler.calls();
    for pair in calls.windows(2) {
        assert!(pair[1].entered_at >= pair[0].exited_at);
        assert!(pair[1].entered_at - pair[0].entered_at >= Duration::from_millis(20));
    }
}
