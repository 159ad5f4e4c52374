use crate::core::builder::{states, FeedConsumerBuilder};
use crate::core::config::ConsumerConfig;
use crate::core::phase::{AtomicFeedMetrics, AtomicFeedPhase, FeedMetrics, FeedPhase};
use crate::store::FeedStore;
use crate::traits::{FeedError, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

/// How often reconnect waits and the read loop re-check the run flag
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Lifecycle notifications from the subscription task
///
/// Consumed by the presentation layer to show connection status; the
/// `Reconnecting`/`Disconnected` pair doubles as the gap indicator, since
/// events published while disconnected are not replayed.
#[derive(Debug, Clone)]
pub enum FeedSignal {
    /// Subscription established
    Connected,
    /// Connection lost; a reconnect will be scheduled unless stopped
    Disconnected,
    /// Reconnect attempt number about to run (resets after each success)
    Reconnecting(usize),
    /// Transport-level failure description
    Error(String),
}

/// Live feed consumer
///
/// Owns a single logical subscription to the transaction event stream and
/// keeps a [`FeedStore`] current. Connection loss is survived with jittered
/// backoff; malformed events are dropped; `stop()` is terminal.
pub struct FeedConsumer {
    config: Arc<ConsumerConfig>,
    phase: Arc<AtomicFeedPhase>,
    metrics: Arc<AtomicFeedMetrics>,
    signal_tx: Sender<FeedSignal>,
    signal_rx: Receiver<FeedSignal>,
    task: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl FeedConsumer {
    /// Start the builder chain: `FeedConsumer::builder().url(..).store(..)`
    pub fn builder() -> FeedConsumerBuilder<states::NoUrl, states::NoStore> {
        FeedConsumerBuilder::new()
    }

    pub(crate) fn from_config(config: ConsumerConfig) -> Self {
        let (signal_tx, signal_rx) = unbounded();
        Self {
            config: Arc::new(config),
            phase: Arc::new(AtomicFeedPhase::new(FeedPhase::Idle)),
            metrics: Arc::new(AtomicFeedMetrics::new()),
            signal_tx,
            signal_rx,
            task: Mutex::new(None),
        }
    }

    /// Open the subscription to the configured endpoint
    ///
    /// Idempotent: only the `Idle -> Connecting` transition spawns the task,
    /// so calling this while already started (or after `stop()`) is a logged
    /// no-op and can never leak a second connection.
    pub fn start(&self) {
        if let Err(observed) = self
            .phase
            .compare_exchange(FeedPhase::Idle, FeedPhase::Connecting)
        {
            debug!(phase = ?observed, "start ignored: subscription not idle");
            return;
        }

        let config = Arc::clone(&self.config);
        let phase = Arc::clone(&self.phase);
        let metrics = Arc::clone(&self.metrics);
        let signal_tx = self.signal_tx.clone();

        let handle = tokio::spawn(async move {
            run_feed(config, phase, metrics, signal_tx).await;
        });
        *self.task.lock() = Some(handle);
    }

    /// Stop the subscription and halt reconnect attempts
    ///
    /// Non-blocking and safe to call repeatedly. The phase moves straight to
    /// the terminal `Closed`; any reconnect wait in flight aborts on its next
    /// run-flag poll, and events already decoded are discarded before they
    /// can touch the store.
    pub fn stop(&self) {
        self.config.run_flag.store(false, Ordering::Release);
        self.phase.set(FeedPhase::Closed);
    }

    /// Stop and wait for the subscription task to finish
    pub async fn shutdown(self) {
        self.stop();
        let handle = self.task.lock().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
        info!("feed consumer shut down");
    }

    /// Current connection phase
    pub fn phase(&self) -> FeedPhase {
        self.phase.get()
    }

    #[inline]
    pub fn is_connected(&self) -> bool {
        self.phase.is_connected()
    }

    /// Shared handle to the store this consumer feeds
    pub fn store(&self) -> &Arc<FeedStore> {
        self.config.store()
    }

    /// Counters snapshot
    pub fn metrics(&self) -> FeedMetrics {
        FeedMetrics {
            events_received: self.metrics.events_received(),
            events_discarded: self.metrics.events_discarded(),
            reconnect_count: self.metrics.reconnect_count(),
            phase: self.phase.get(),
        }
    }

    /// Try to receive a lifecycle signal (non-blocking)
    pub fn try_recv_signal(&self) -> Option<FeedSignal> {
        self.signal_rx.try_recv().ok()
    }

    /// Receive a lifecycle signal (blocking)
    pub fn recv_signal(&self) -> std::result::Result<FeedSignal, crossbeam_channel::RecvError> {
        self.signal_rx.recv()
    }
}

/// Main subscription task loop: connect, drain, back off, repeat
async fn run_feed(
    config: Arc<ConsumerConfig>,
    phase: Arc<AtomicFeedPhase>,
    metrics: Arc<AtomicFeedMetrics>,
    signal_tx: Sender<FeedSignal>,
) {
    let run_flag = &config.run_flag;
    let mut attempt: usize = 0;

    loop {
        if !run_flag.load(Ordering::Acquire) {
            debug!("run flag cleared, exiting feed loop");
            break;
        }

        let entering = if attempt == 0 {
            FeedPhase::Connecting
        } else {
            FeedPhase::Reconnecting
        };
        if !phase.set_unless_closed(entering) {
            break;
        }
        if attempt > 0 {
            let _ = signal_tx.send(FeedSignal::Reconnecting(attempt));
        }

        match connect_async(&config.url).await {
            Ok((ws_stream, _)) => {
                info!(url = %config.url, "feed connected");
                if !phase.set_unless_closed(FeedPhase::Connected) {
                    break;
                }
                let _ = signal_tx.send(FeedSignal::Connected);
                attempt = 0;

                if let Err(e) = drain_events(ws_stream, &config, &metrics).await {
                    warn!(error = %e, "feed connection lost");
                    let _ = signal_tx.send(FeedSignal::Error(e.to_string()));
                }
                let _ = signal_tx.send(FeedSignal::Disconnected);
            }
            Err(e) => {
                warn!(url = %config.url, error = %e, "feed connect failed");
                let _ = signal_tx.send(FeedSignal::Error(e.to_string()));
            }
        }

        if !run_flag.load(Ordering::Acquire) {
            debug!("run flag cleared after disconnect, not reconnecting");
            break;
        }

        match config.reconnect_policy.next_delay(attempt) {
            Some(delay) => {
                info!(?delay, attempt = attempt + 1, "scheduling feed reconnect");
                if !sleep_unless_stopped(delay, run_flag).await {
                    debug!("stop requested during reconnect wait");
                    break;
                }
                attempt += 1;
                metrics.increment_reconnects();
            }
            None => {
                warn!("reconnect policy exhausted, feed task stopping");
                break;
            }
        }
    }

    debug!("feed task exiting");
}

/// Drain one live connection until it fails, ends, or the consumer stops
///
/// Returns `Ok(())` only on an explicit stop; transport failures and server
/// EOF surface as errors so the outer loop schedules a reconnect.
async fn drain_events(
    ws_stream: tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >,
    config: &Arc<ConsumerConfig>,
    metrics: &Arc<AtomicFeedMetrics>,
) -> Result<()> {
    let (mut write, mut read) = ws_stream.split();
    let run_flag = &config.run_flag;

    loop {
        if !run_flag.load(Ordering::Acquire) {
            debug!("stop requested, closing feed connection");
            let _ = write.close().await;
            return Ok(());
        }

        tokio::select! {
            frame = read.next() => {
                match frame {
                    Some(Ok(Message::Text(payload))) => {
                        ingest_event(&payload, config, metrics);
                    }
                    Some(Ok(Message::Binary(_))) => {
                        metrics.increment_discarded();
                        warn!("dropping unexpected binary frame on transaction feed");
                    }
                    // Control frames carry no events
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        return Err(FeedError::Transport(e.to_string()));
                    }
                    None => {
                        return Err(FeedError::ConnectionClosed("stream ended".to_string()));
                    }
                }
            }

            // Periodic wakeup so a stop with no traffic is still honored
            _ = tokio::time::sleep(STOP_POLL_INTERVAL) => {}
        }
    }
}

/// Decode one payload and append it to the store
///
/// Malformed payloads are counted and dropped; they never reach the store
/// and never take the subscription down. The run flag is re-checked between
/// decode and append so nothing lands after `stop()`.
fn ingest_event(payload: &str, config: &Arc<ConsumerConfig>, metrics: &Arc<AtomicFeedMetrics>) {
    metrics.increment_received();

    match config.decoder.decode(payload) {
        Ok(record) => {
            if !config.run_flag.load(Ordering::Acquire) {
                debug!("stop requested, discarding decoded event");
                return;
            }
            debug!(id = %record.id, "appending feed event");
            config.store.append(record);
        }
        Err(e) => {
            metrics.increment_discarded();
            warn!(error = %e, "dropping malformed feed event");
        }
    }
}

/// Sleep in run-flag-sized slices; returns `false` if stopped mid-wait
async fn sleep_unless_stopped(total: Duration, run_flag: &Arc<AtomicBool>) -> bool {
    let mut elapsed = Duration::ZERO;

    while elapsed < total {
        if !run_flag.load(Ordering::Acquire) {
            return false;
        }
        let step = STOP_POLL_INTERVAL.min(total - elapsed);
        tokio::time::sleep(step).await;
        elapsed += step;
    }

    run_flag.load(Ordering::Acquire)
}
