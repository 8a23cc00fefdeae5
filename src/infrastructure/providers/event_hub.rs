//! In-memory, channel-keyed broadcaster for real-time log streaming.
//!
//! Each subscriber owns a bounded queue. Publishing never waits on a
//! subscriber: when a queue is full the payload is dropped for that
//! subscriber only, and subscribers whose receiving side is gone are evicted.
//! Channels are created on first subscribe and removed as soon as their last
//! subscriber leaves.

use crate::domain::ports::LogPublisher;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_stream::wrappers::ReceiverStream;

pub const DEFAULT_BUFFER_CAPACITY: usize = 100;

type SubscriberId = u64;

struct Channel {
    subscribers: HashMap<SubscriberId, mpsc::Sender<Bytes>>,
}

struct HubShared {
    channels: RwLock<HashMap<String, Channel>>,
    next_id: AtomicU64,
    buffer_capacity: usize,
    closed: AtomicBool,
}

impl HubShared {
    /// Remove one subscriber, pruning its channel when it was the last one.
    /// Returns false when the subscriber was already gone.
    fn remove(&self, key: &str, id: SubscriberId) -> bool {
        let mut channels = self.channels.write();
        let Some(channel) = channels.get_mut(key) else {
            return false;
        };
        let removed = channel.subscribers.remove(&id).is_some();
        if channel.subscribers.is_empty() {
            channels.remove(key);
            tracing::debug!("Channel {} pruned", key);
        }
        if removed {
            metrics::gauge!("event_hub_subscribers").decrement(1.0);
        }
        removed
    }
}

/// Registry of live channels. Cloning yields another handle to the same hub.
#[derive(Clone)]
pub struct EventHub {
    shared: Arc<HubShared>,
}

impl EventHub {
    /// Create a hub whose subscribers each buffer up to `buffer_capacity`
    /// payloads. A capacity of zero is raised to one.
    pub fn new(buffer_capacity: usize) -> Self {
        Self {
            shared: Arc::new(HubShared {
                channels: RwLock::new(HashMap::new()),
                next_id: AtomicU64::new(1),
                buffer_capacity: buffer_capacity.max(1),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Whether at least one subscriber is registered under `key` right now
    pub fn channel_exists(&self, key: &str) -> bool {
        self.shared
            .channels
            .read()
            .get(key)
            .is_some_and(|channel| !channel.subscribers.is_empty())
    }

    /// Number of subscribers currently registered under `key`
    pub fn subscriber_count(&self, key: &str) -> usize {
        self.shared
            .channels
            .read()
            .get(key)
            .map_or(0, |channel| channel.subscribers.len())
    }

    /// Number of channels with at least one subscriber
    pub fn channel_count(&self) -> usize {
        self.shared.channels.read().len()
    }

    /// Register a new listener on `key`, creating the channel if needed.
    ///
    /// The returned subscription yields every payload published to `key`
    /// from now on. Dropping it deregisters the listener. Once the hub is
    /// closed, new subscriptions end immediately.
    pub fn subscribe(&self, key: &str) -> Subscription {
        let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(self.shared.buffer_capacity);

        {
            let mut channels = self.shared.channels.write();
            // Checked under the lock so close() cannot miss this sender
            if !self.shared.closed.load(Ordering::Acquire) {
                channels
                    .entry(key.to_string())
                    .or_insert_with(|| Channel {
                        subscribers: HashMap::new(),
                    })
                    .subscribers
                    .insert(id, tx);
                metrics::gauge!("event_hub_subscribers").increment(1.0);
                tracing::debug!("Subscriber {} joined channel {}", id, key);
            }
        }

        Subscription {
            id,
            key: key.to_string(),
            hub: Arc::downgrade(&self.shared),
            stream: ReceiverStream::new(rx),
        }
    }

    /// Deregister a subscription. Calling it again, or after the hub was
    /// closed, does nothing.
    pub fn unsubscribe(&self, subscription: &Subscription) {
        if self.shared.remove(&subscription.key, subscription.id) {
            tracing::debug!(
                "Subscriber {} left channel {}",
                subscription.id,
                subscription.key
            );
        }
    }

    /// Queue `payload` for every subscriber of `key` without waiting.
    ///
    /// Returns the number of subscribers that accepted the payload. Unknown
    /// channels are a no-op returning zero.
    pub fn publish(&self, key: &str, payload: Bytes) -> usize {
        let mut delivered = 0;
        let mut disconnected = Vec::new();

        {
            let channels = self.shared.channels.read();
            let Some(channel) = channels.get(key) else {
                return 0;
            };

            for (id, sender) in &channel.subscribers {
                match sender.try_send(payload.clone()) {
                    Ok(()) => delivered += 1,
                    Err(TrySendError::Full(_)) => {
                        metrics::counter!("event_hub_payloads_dropped_total").increment(1);
                        tracing::warn!(
                            "Subscriber {} on channel {} is lagging, payload dropped",
                            id,
                            key
                        );
                    }
                    Err(TrySendError::Closed(_)) => disconnected.push(*id),
                }
            }
        }

        for id in disconnected {
            if self.shared.remove(key, id) {
                metrics::counter!("event_hub_subscribers_evicted_total").increment(1);
                tracing::debug!("Evicted disconnected subscriber {} from {}", id, key);
            }
        }

        delivered
    }

    /// End every subscription and drop all channel state. Intended for
    /// process shutdown.
    pub fn close(&self) {
        let mut channels = self.shared.channels.write();
        self.shared.closed.store(true, Ordering::Release);

        let subscribers: usize = channels.values().map(|c| c.subscribers.len()).sum();
        channels.clear();
        metrics::gauge!("event_hub_subscribers").decrement(subscribers as f64);
        tracing::info!("Event hub closed, {} subscriber(s) disconnected", subscribers);
    }

    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::Acquire)
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_CAPACITY)
    }
}

#[async_trait]
impl LogPublisher for EventHub {
    fn channel_exists(&self, channel: &str) -> bool {
        EventHub::channel_exists(self, channel)
    }

    fn publish(&self, channel: &str, payload: Bytes) -> usize {
        EventHub::publish(self, channel, payload)
    }
}

/// One listener's live feed of payloads from a channel.
///
/// The stream ends when the hub is closed. Dropping the subscription
/// removes it from the hub.
pub struct Subscription {
    id: SubscriberId,
    key: String,
    hub: Weak<HubShared>,
    stream: ReceiverStream<Bytes>,
}

impl Subscription {
    pub fn channel(&self) -> &str {
        &self.key
    }
}

impl Stream for Subscription {
    type Item = Bytes;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.get_mut().stream).poll_next(cx)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            if hub.remove(&self.key, self.id) {
                tracing::debug!("Subscriber {} dropped from channel {}", self.id, self.key);
            }
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("channel", &self.key)
            .finish()
    }
}
