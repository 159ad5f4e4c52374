use crate::record::{self, TransactionRecord};
use crate::traits::error::Result;

/// Trait for decoding raw stream payloads into transaction records
///
/// The consumer calls this for every text frame received from the stream.
/// A decode failure drops the event; it never stops the subscription.
pub trait EventDecoder: Send + Sync + 'static {
    /// Decode a raw payload into a transaction record
    ///
    /// # Returns
    /// * `Ok(record)` - Payload decoded successfully
    /// * `Err(FeedError::Decode)` - Payload is malformed and will be dropped
    fn decode(&self, payload: &str) -> Result<TransactionRecord>;
}

/// Default decoder for the backend's JSON event format
///
/// One JSON object per event:
/// `{ id, amount, location, user_id, time, is_fraud }`
#[derive(Debug, Clone, Default)]
pub struct JsonEventDecoder;

impl EventDecoder for JsonEventDecoder {
    fn decode(&self, payload: &str) -> Result<TransactionRecord> {
        record::decode_event(payload)
    }
}
