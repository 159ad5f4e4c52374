use thiserror::Error;

/// Main error type for the feed consumer
#[derive(Error, Debug)]
pub enum FeedError {
    /// Connection refused/reset or other transport failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Server closed the stream
    #[error("connection closed: {0}")]
    ConnectionClosed(String),

    /// Event payload failed to parse or is missing required fields
    #[error("decode error: {0}")]
    Decode(String),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Signal channel send error
    #[error("channel send error: {0}")]
    ChannelSend(String),
}

/// Result type for feed operations
pub type Result<T> = std::result::Result<T, FeedError>;
