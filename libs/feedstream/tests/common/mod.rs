//! Common test utilities for feedstream integration tests.
//!
//! Provides a local mock feed server so the consumer can be exercised
//! end-to-end without any real backend.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, Notify};

/// How the mock server treats accepted connections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerMode {
    /// Keep the connection open and forward pushed frames
    Feed,
    /// Accept the handshake, then drop the connection immediately
    DropOnConnect,
}

/// A mock transaction feed server bound to an ephemeral local port
pub struct MockFeedServer {
    pub addr: SocketAddr,
    shutdown: Arc<Notify>,
    frames_tx: broadcast::Sender<String>,
}

impl MockFeedServer {
    /// Start a server that feeds pushed frames to every connected client
    pub async fn start() -> Self {
        Self::start_with(ServerMode::Feed).await
    }

    /// Start a server that drops every connection right after the handshake
    pub async fn start_dropping() -> Self {
        Self::start_with(ServerMode::DropOnConnect).await
    }

    async fn start_with(mode: ServerMode) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());
        let shutdown_accept = shutdown.clone();
        let (frames_tx, _) = broadcast::channel(64);
        let frames_for_conns = frames_tx.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    result = listener.accept() => {
                        match result {
                            Ok((stream, _)) => {
                                let shutdown = shutdown_accept.clone();
                                let frames_rx = frames_for_conns.subscribe();
                                tokio::spawn(async move {
                                    Self::handle_connection(stream, mode, frames_rx, shutdown).await;
                                });
                            }
                            Err(e) => {
                                eprintln!("accept error: {}", e);
                                break;
                            }
                        }
                    }
                    _ = shutdown_accept.notified() => {
                        break;
                    }
                }
            }
        });

        Self {
            addr,
            shutdown,
            frames_tx,
        }
    }

    async fn handle_connection(
        stream: tokio::net::TcpStream,
        mode: ServerMode,
        mut frames_rx: broadcast::Receiver<String>,
        shutdown: Arc<Notify>,
    ) {
        use futures::{SinkExt, StreamExt};
        use tokio_tungstenite::accept_async;
        use tokio_tungstenite::tungstenite::Message;

        let ws_stream = match accept_async(stream).await {
            Ok(ws) => ws,
            Err(e) => {
                eprintln!("websocket handshake failed: {}", e);
                return;
            }
        };

        if mode == ServerMode::DropOnConnect {
            return;
        }

        let (mut write, mut read) = ws_stream.split();

        loop {
            tokio::select! {
                frame = frames_rx.recv() => {
                    match frame {
                        Ok(payload) => {
                            if write.send(Message::Text(payload)).await.is_err() {
                                break;
                            }
                        }
                        Err(_) => break,
                    }
                }
                msg = read.next() => {
                    match msg {
                        Some(Ok(msg)) if msg.is_close() => break,
                        Some(Ok(_)) => {}
                        Some(Err(_)) | None => break,
                    }
                }
                _ = shutdown.notified() => {
                    break;
                }
            }
        }
    }

    /// WebSocket URL for this server
    pub fn ws_url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Push a frame to every connected client
    pub fn push(&self, payload: impl Into<String>) {
        // No receivers just means no client is connected yet
        let _ = self.frames_tx.send(payload.into());
    }

    /// Shutdown the server
    pub fn shutdown(&self) {
        self.shutdown.notify_waiters();
    }
}

impl Drop for MockFeedServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Wire-format transaction event payload for tests
pub fn event_payload(id: &str, amount: &str, time: &str, is_fraud: bool) -> String {
    format!(
        r#"{{"id":"{id}","amount":{amount},"location":"New York","user_id":"u-test","time":"{time}","is_fraud":{is_fraud}}}"#
    )
}

/// Poll `pred` until it holds or `timeout` elapses; returns whether it held
pub async fn wait_until<F>(mut pred: F, timeout: std::time::Duration) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if pred() {
            return true;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    pred()
}
