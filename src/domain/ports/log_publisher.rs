use async_trait::async_trait;
use bytes::Bytes;

/// Real-time fan-out of serialized log entries, keyed by channel.
///
/// Delivery is best-effort. A `true` from `channel_exists` may already be
/// stale when `publish` runs, and publishing to a channel without
/// subscribers is a no-op.
#[async_trait]
pub trait LogPublisher: Send + Sync {
    /// Whether at least one subscriber is listening on `channel`
    fn channel_exists(&self, channel: &str) -> bool;

    /// Queue `payload` for every subscriber of `channel`. Returns how many
    /// subscribers accepted it.
    fn publish(&self, channel: &str, payload: Bytes) -> usize;
}
