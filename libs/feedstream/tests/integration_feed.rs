//! End-to-end tests for the feed consumer against a local mock server
//!
//! These tests exercise the full path: WebSocket subscription, event decode,
//! store updates, reconnects, and teardown guarantees.

mod common;

use common::{event_payload, wait_until, MockFeedServer};
use feedstream::{FeedConsumer, FeedPhase, FeedSignal, FeedStore, FixedDelay};
use std::sync::Arc;
use std::time::Duration;

fn consumer_for(server: &MockFeedServer, store: Arc<FeedStore>) -> FeedConsumer {
    FeedConsumer::builder()
        .url(server.ws_url())
        .store(store)
        .reconnect_policy(FixedDelay::new(Duration::from_millis(50), None))
        .build()
}

#[tokio::test]
async fn events_flow_into_the_store() {
    let server = MockFeedServer::start().await;
    let store = Arc::new(FeedStore::new(50).unwrap());
    let consumer = consumer_for(&server, store.clone());

    consumer.start();
    assert!(wait_until(|| consumer.is_connected(), Duration::from_secs(2)).await);

    server.push(event_payload("1", "100", "2024-01-01T10:00:00", false));
    server.push(event_payload("2", "250.75", "2024-01-01T10:00:05", true));

    assert!(wait_until(|| store.len() == 2, Duration::from_secs(2)).await);

    let snapshot = store.snapshot();
    assert_eq!(snapshot[0].id.as_str(), "2");
    assert_eq!(snapshot[0].is_fraud, Some(true));
    assert_eq!(snapshot[1].id.as_str(), "1");
    assert_eq!(snapshot[1].is_fraud, Some(false));
    assert_eq!(snapshot[1].amount.to_string(), "100.00");

    consumer.shutdown().await;
}

#[tokio::test]
async fn malformed_events_are_dropped_without_breaking_the_feed() {
    let server = MockFeedServer::start().await;
    let store = Arc::new(FeedStore::new(50).unwrap());
    let consumer = consumer_for(&server, store.clone());

    consumer.start();
    assert!(wait_until(|| consumer.is_connected(), Duration::from_secs(2)).await);

    server.push("this is not json");
    server.push(r#"{"id":"x"}"#);
    server.push(event_payload("good", "10", "2024-01-01T10:00:00", false));

    assert!(wait_until(|| store.len() == 1, Duration::from_secs(2)).await);

    // The subscription survived both bad payloads
    assert_eq!(consumer.phase(), FeedPhase::Connected);
    assert_eq!(store.snapshot()[0].id.as_str(), "good");

    let metrics = consumer.metrics();
    assert_eq!(metrics.events_discarded, 2);
    assert_eq!(metrics.events_received, 3);

    consumer.shutdown().await;
}

#[tokio::test]
async fn start_is_idempotent() {
    let server = MockFeedServer::start().await;
    let store = Arc::new(FeedStore::new(50).unwrap());
    let consumer = consumer_for(&server, store.clone());

    consumer.start();
    assert!(wait_until(|| consumer.is_connected(), Duration::from_secs(2)).await);

    // A second start while connected must not open a second subscription
    consumer.start();
    tokio::time::sleep(Duration::from_millis(100)).await;

    server.push(event_payload("only-once", "5", "2024-01-01T10:00:00", false));
    assert!(wait_until(|| store.len() == 1, Duration::from_secs(2)).await);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(
        store.len(),
        1,
        "a duplicated subscription would have appended the event twice"
    );

    consumer.shutdown().await;
}

#[tokio::test]
async fn stop_halts_store_mutation() {
    let server = MockFeedServer::start().await;
    let store = Arc::new(FeedStore::new(50).unwrap());
    let consumer = consumer_for(&server, store.clone());

    consumer.start();
    assert!(wait_until(|| consumer.is_connected(), Duration::from_secs(2)).await);

    server.push(event_payload("before", "1", "2024-01-01T10:00:00", false));
    assert!(wait_until(|| store.len() == 1, Duration::from_secs(2)).await);

    consumer.stop();
    assert_eq!(consumer.phase(), FeedPhase::Closed);

    // The server keeps broadcasting after the stop
    for i in 0..5 {
        server.push(event_payload(
            &format!("after-{i}"),
            "1",
            "2024-01-01T10:00:01",
            false,
        ));
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    assert_eq!(store.len(), 1, "no event may land after stop()");
    assert_eq!(consumer.phase(), FeedPhase::Closed);

    consumer.shutdown().await;
}

#[tokio::test]
async fn stop_is_safe_to_call_repeatedly() {
    let server = MockFeedServer::start().await;
    let store = Arc::new(FeedStore::new(50).unwrap());
    let consumer = consumer_for(&server, store.clone());

    consumer.start();
    consumer.stop();
    consumer.stop();
    assert_eq!(consumer.phase(), FeedPhase::Closed);

    // And start after stop stays a no-op: Closed is terminal
    consumer.start();
    assert_eq!(consumer.phase(), FeedPhase::Closed);

    consumer.shutdown().await;
}

#[tokio::test]
async fn reconnect_attempt_resets_after_each_successful_connect() {
    // Every connection is accepted and then dropped, so the consumer cycles
    // connect -> drop -> reconnect. Each cycle starts from attempt 1; a
    // growing attempt number would mean the reset after success is broken.
    let server = MockFeedServer::start_dropping().await;
    let store = Arc::new(FeedStore::new(50).unwrap());
    let consumer = consumer_for(&server, store.clone());

    consumer.start();

    let mut reconnect_attempts = Vec::new();
    let deadline = tokio::time::Instant::now() + Duration::from_secs(3);
    while tokio::time::Instant::now() < deadline && reconnect_attempts.len() < 3 {
        if let Some(signal) = consumer.try_recv_signal() {
            if let FeedSignal::Reconnecting(attempt) = signal {
                reconnect_attempts.push(attempt);
            }
        } else {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    assert!(
        reconnect_attempts.len() >= 2,
        "expected repeated reconnect cycles, saw {reconnect_attempts:?}"
    );
    assert!(
        reconnect_attempts.iter().all(|&attempt| attempt == 1),
        "attempt number must reset after each successful connect: {reconnect_attempts:?}"
    );

    let metrics = consumer.metrics();
    assert!(metrics.reconnect_count >= 2);

    consumer.shutdown().await;
}

#[tokio::test]
async fn stop_cancels_a_pending_reconnect_wait() {
    // Reserve an address with no listener so every connect fails
    let unused = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = unused.local_addr().unwrap();
    drop(unused);

    let store = Arc::new(FeedStore::new(50).unwrap());
    let consumer = FeedConsumer::builder()
        .url(format!("ws://{}", addr))
        .store(store)
        .reconnect_policy(FixedDelay::new(Duration::from_secs(60), None))
        .build();

    consumer.start();
    // Let the first connect fail and the 60s reconnect wait begin
    tokio::time::sleep(Duration::from_millis(300)).await;

    // Shutdown must not sit out the remaining wait
    tokio::time::timeout(Duration::from_secs(2), consumer.shutdown())
        .await
        .expect("stop() must cancel the pending reconnect");
}

#[tokio::test]
async fn verdict_reemission_replaces_the_pending_record() {
    let server = MockFeedServer::start().await;
    let store = Arc::new(FeedStore::new(50).unwrap());
    let consumer = consumer_for(&server, store.clone());

    consumer.start();
    assert!(wait_until(|| consumer.is_connected(), Duration::from_secs(2)).await);

    // First emission has no verdict yet
    server.push(r#"{"id":"tx-9","amount":42,"location":"Chicago","user_id":"u1","time":"2024-01-01T10:00:00"}"#);
    assert!(wait_until(|| store.len() == 1, Duration::from_secs(2)).await);
    assert_eq!(store.snapshot()[0].is_fraud, None);

    // The backend re-emits the same id once scored
    server.push(event_payload("tx-9", "42", "2024-01-01T10:00:02", true));
    assert!(
        wait_until(
            || store.snapshot()[0].is_fraud == Some(true),
            Duration::from_secs(2)
        )
        .await
    );
    assert_eq!(store.len(), 1, "re-emission must replace, not duplicate");

    consumer.shutdown().await;
}
