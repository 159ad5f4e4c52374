//! Consumer core: connection phase tracking, configuration, builder and the
//! subscription task itself.

pub mod builder;
pub mod config;
pub mod consumer;
pub mod phase;

// Re-export main types
pub use builder::{states, FeedConsumerBuilder};
pub use config::ConsumerConfig;
pub use consumer::{FeedConsumer, FeedSignal};
pub use phase::{AtomicFeedMetrics, AtomicFeedPhase, FeedMetrics, FeedPhase};
