use crate::store::FeedStore;
use crate::traits::{EventDecoder, ReconnectPolicy};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Configuration for a [`FeedConsumer`](crate::core::consumer::FeedConsumer)
///
/// Assembled by the type-state builder; immutable once the consumer exists.
pub struct ConsumerConfig {
    /// Stream endpoint (ws:// or wss://)
    pub(crate) url: String,

    /// Store the subscription task appends decoded records into
    pub(crate) store: Arc<FeedStore>,

    /// Decoder applied to every text frame
    pub(crate) decoder: Arc<dyn EventDecoder>,

    /// Delay policy between reconnect attempts
    pub(crate) reconnect_policy: Box<dyn ReconnectPolicy>,

    /// Run flag - cleared by `stop()`, checked before every connection
    /// attempt, reconnect wait slice and store append
    pub(crate) run_flag: Arc<AtomicBool>,
}

impl ConsumerConfig {
    /// Get a reference to the stream URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get the shared store handle
    pub fn store(&self) -> &Arc<FeedStore> {
        &self.store
    }
}
