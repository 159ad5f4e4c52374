use anyhow::Result;
use feedstream::{FeedConsumer, FeedSignal, FeedStore};
use fraud_feed::bin_common::{feed_ws_url, ShutdownManager};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// How often the current feed snapshot is logged
const SNAPSHOT_INTERVAL: Duration = Duration::from_secs(5);

/// Records retained for the session view
const FEED_CAPACITY: usize = 100;

/// Snapshot rows shown per status line
const DISPLAY_ROWS: usize = 10;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_logging();

    let url = feed_ws_url();
    let shutdown = ShutdownManager::new();
    shutdown.spawn_signal_handler();

    let store = Arc::new(FeedStore::new(FEED_CAPACITY)?);
    let consumer = FeedConsumer::builder()
        .url(url.clone())
        .store(Arc::clone(&store))
        .run_flag(shutdown.flag())
        .build();

    print_banner(&url);
    consumer.start();

    while shutdown.is_running() {
        drain_signals(&consumer);
        log_snapshot(&consumer);
        shutdown.interruptible_sleep(SNAPSHOT_INTERVAL).await;
    }

    consumer.shutdown().await;
    print_shutdown();
    Ok(())
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}

fn drain_signals(consumer: &FeedConsumer) {
    while let Some(signal) = consumer.try_recv_signal() {
        match signal {
            FeedSignal::Connected => info!("feed connected"),
            FeedSignal::Disconnected => {
                // No backfill on reconnect: events published while down are gone
                info!("feed disconnected; the view may have a gap")
            }
            FeedSignal::Reconnecting(attempt) => info!(attempt, "reconnecting to feed"),
            FeedSignal::Error(reason) => warn!(%reason, "feed error"),
        }
    }
}

fn log_snapshot(consumer: &FeedConsumer) {
    let metrics = consumer.metrics();
    let snapshot = consumer.store().snapshot();

    info!(
        phase = ?metrics.phase,
        records = snapshot.len(),
        received = metrics.events_received,
        discarded = metrics.events_discarded,
        reconnects = metrics.reconnect_count,
        "feed status"
    );

    for record in snapshot.iter().take(DISPLAY_ROWS) {
        let verdict = match record.is_fraud {
            Some(true) => "FRAUD",
            Some(false) => "legit",
            None => "pending",
        };
        info!(
            "  {} | {} | {} | {} | {} | {}",
            record.timestamp.format("%Y-%m-%d %H:%M:%S"),
            record.id,
            record.amount,
            record.location,
            record.user_id,
            verdict
        );
    }
}

fn print_banner(url: &str) {
    info!("");
    info!("========================================");
    info!("Starting fraud feed monitor");
    info!("Stream endpoint: {}", url);
    info!("Press Ctrl+C to stop");
    info!("========================================");
    info!("");
}

fn print_shutdown() {
    info!("");
    info!("========================================");
    info!("Feed monitor stopped gracefully");
    info!("========================================");
}
