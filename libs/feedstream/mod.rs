//! # FeedStream
//!
//! Live transaction feed consumer for the fraud-verdict dashboard: a
//! long-lived WebSocket subscription that survives connection loss and keeps
//! a bounded, time-ordered view of scored transactions current.
//!
//! ## Components
//!
//! - **FeedStore**: ordered, deduplicated, capacity-bounded collection of
//!   transaction records with cheap point-in-time snapshots
//! - **FeedConsumer**: owns the subscription lifecycle (connect, decode,
//!   reconnect with jittered backoff, teardown) and feeds the store
//! - **Decode layer**: wire events to `TransactionRecord`, dropping malformed
//!   payloads without disturbing the feed

pub mod core;
pub mod record;
pub mod store;
pub mod traits;

// Re-export the record model
pub use record::{Amount, Location, TransactionRecord, TxId};

// Re-export the store
pub use store::FeedStore;

// Re-export core consumer functionality
// self:: disambiguates the module from the built-in `core` crate
pub use self::core::{
    builder,
    builder::{states, FeedConsumerBuilder},
    consumer::{FeedConsumer, FeedSignal},
    phase::{AtomicFeedMetrics, AtomicFeedPhase, FeedMetrics, FeedPhase},
};

// Re-export all traits
pub use traits::*;

/// Type alias for Result with FeedError
pub type Result<T> = std::result::Result<T, traits::FeedError>;
