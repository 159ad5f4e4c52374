//! Core traits and types for the feed consumer.
//!
//! - **EventDecoder**: turn raw stream payloads into transaction records
//! - **ReconnectPolicy**: control delay and cutoff between reconnect attempts
//! - **FeedError**: error taxonomy shared across the crate

pub mod backoff;
pub mod decode;
pub mod error;

pub use backoff::{FixedDelay, JitteredBackoff, NeverReconnect, ReconnectPolicy};
pub use decode::{EventDecoder, JsonEventDecoder};
pub use error::{FeedError, Result};
