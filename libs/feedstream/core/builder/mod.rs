pub mod states;

use crate::core::config::ConsumerConfig;
use crate::core::consumer::FeedConsumer;
use crate::store::FeedStore;
use crate::traits::{EventDecoder, JitteredBackoff, JsonEventDecoder, ReconnectPolicy};
use states::*;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Type-state builder for [`FeedConsumer`]
///
/// The stream URL and the target store are required; the type parameters
/// make forgetting either a compile error rather than a runtime panic.
/// Everything else has defaults: JSON event decoding and full-jitter
/// exponential backoff (1s base, 30s cap, unlimited attempts).
pub struct FeedConsumerBuilder<U, S>
where
    U: UrlState,
    S: StoreState,
{
    _state: TypeState<U, S>,
    url: Option<String>,
    store: Option<Arc<FeedStore>>,
    decoder: Arc<dyn EventDecoder>,
    reconnect_policy: Box<dyn ReconnectPolicy>,
    run_flag: Option<Arc<AtomicBool>>,
}

impl FeedConsumerBuilder<NoUrl, NoStore> {
    /// Create a new builder instance
    pub fn new() -> Self {
        Self {
            _state: TypeState::new(),
            url: None,
            store: None,
            decoder: Arc::new(JsonEventDecoder),
            reconnect_policy: Box::new(JitteredBackoff::default()),
            run_flag: None,
        }
    }
}

impl Default for FeedConsumerBuilder<NoUrl, NoStore> {
    fn default() -> Self {
        Self::new()
    }
}

// URL setting
impl<S> FeedConsumerBuilder<NoUrl, S>
where
    S: StoreState,
{
    pub fn url(self, url: impl Into<String>) -> FeedConsumerBuilder<HasUrl, S> {
        FeedConsumerBuilder {
            _state: TypeState::new(),
            url: Some(url.into()),
            store: self.store,
            decoder: self.decoder,
            reconnect_policy: self.reconnect_policy,
            run_flag: self.run_flag,
        }
    }
}

// Store setting
impl<U> FeedConsumerBuilder<U, NoStore>
where
    U: UrlState,
{
    pub fn store(self, store: Arc<FeedStore>) -> FeedConsumerBuilder<U, HasStore> {
        FeedConsumerBuilder {
            _state: TypeState::new(),
            url: self.url,
            store: Some(store),
            decoder: self.decoder,
            reconnect_policy: self.reconnect_policy,
            run_flag: self.run_flag,
        }
    }
}

// Optional settings, available in any state
impl<U, S> FeedConsumerBuilder<U, S>
where
    U: UrlState,
    S: StoreState,
{
    /// Replace the default JSON decoder
    pub fn decoder(mut self, decoder: impl EventDecoder) -> Self {
        self.decoder = Arc::new(decoder);
        self
    }

    /// Replace the default jittered backoff policy
    pub fn reconnect_policy(mut self, policy: impl ReconnectPolicy + 'static) -> Self {
        self.reconnect_policy = Box::new(policy);
        self
    }

    /// Share an externally owned run flag
    ///
    /// Lets a session-wide shutdown flag stop this consumer together with
    /// everything else that polls it.
    pub fn run_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.run_flag = Some(flag);
        self
    }
}

// Build is only available once both required fields are set
impl FeedConsumerBuilder<HasUrl, HasStore> {
    pub fn build(self) -> FeedConsumer {
        let config = ConsumerConfig {
            url: self.url.expect("type-state guarantees url is set"),
            store: self.store.expect("type-state guarantees store is set"),
            decoder: self.decoder,
            reconnect_policy: self.reconnect_policy,
            run_flag: self
                .run_flag
                .unwrap_or_else(|| Arc::new(AtomicBool::new(true))),
        };
        FeedConsumer::from_config(config)
    }
}
