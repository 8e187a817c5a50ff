//! Process-wide publish/subscribe message bus.
//!
//! DESIGN
//! ======
//! Each subscriber owns a bounded `mpsc` receiver. `publish` walks the
//! subscribers of a channel and `try_send`s a clone of the payload, so a
//! publisher never blocks and never learns whether anyone received it. A
//! full subscriber queue drops the message for that subscriber only.
//! Closed receivers are pruned on the next publish.
//!
//! No ordering is promised across independent publishers.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

#[cfg(test)]
#[path = "bus_test.rs"]
mod bus_test;

/// Default channel carrying boat selections.
pub const BOAT_MESSAGE_CHANNEL: &str = "BoatMessageChannel";

/// Default per-subscriber queue depth.
pub const DEFAULT_SUBSCRIBER_CAPACITY: usize = 64;

// =============================================================================
// PAYLOADS
// =============================================================================

/// Payload published when a grid row is selected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoatSelected {
    #[serde(rename = "recordId")]
    pub record_id: String,
}

impl BoatSelected {
    #[must_use]
    pub fn to_payload(&self) -> Value {
        serde_json::json!({ "recordId": self.record_id })
    }

    /// Parse a bus payload. `None` if it is not a selection message.
    #[must_use]
    pub fn from_payload(payload: &Value) -> Option<Self> {
        serde_json::from_value(payload.clone()).ok()
    }
}

// =============================================================================
// BUS INTERFACE
// =============================================================================

/// Opaque handle returned by `subscribe`, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionToken(Uuid);

/// A live subscription: its token and the receiving end of its queue.
#[derive(Debug)]
pub struct Subscription {
    pub token: SubscriptionToken,
    pub receiver: mpsc::Receiver<Value>,
}

/// Publish/subscribe seam. Faked in tests, shared process-wide in the app.
pub trait MessageBus: Send + Sync {
    /// Deliver `payload` to every current subscriber of `channel`.
    fn publish(&self, channel: &str, payload: Value);

    fn subscribe(&self, channel: &str) -> Subscription;

    /// Returns `false` if the token was unknown or already removed.
    fn unsubscribe(&self, token: SubscriptionToken) -> bool;
}

// =============================================================================
// IN-PROCESS BUS
// =============================================================================

/// In-memory bus keyed by channel name.
pub struct InProcessBus {
    capacity: usize,
    channels: Mutex<HashMap<String, HashMap<SubscriptionToken, mpsc::Sender<Value>>>>,
}

impl InProcessBus {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self { capacity: capacity.max(1), channels: Mutex::new(HashMap::new()) }
    }

    /// Number of live subscribers on `channel`.
    #[must_use]
    pub fn subscriber_count(&self, channel: &str) -> usize {
        let channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
        channels.get(channel).map_or(0, HashMap::len)
    }
}

impl Default for InProcessBus {
    fn default() -> Self {
        Self::new(DEFAULT_SUBSCRIBER_CAPACITY)
    }
}

impl MessageBus for InProcessBus {
    fn publish(&self, channel: &str, payload: Value) {
        let mut channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(subscribers) = channels.get_mut(channel) else {
            debug!(%channel, "publish with no subscribers");
            return;
        };

        subscribers.retain(|token, tx| match tx.try_send(payload.clone()) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(%channel, token = %token.0, "subscriber queue full; dropping message");
                true
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!(%channel, token = %token.0, "pruning closed subscriber");
                false
            }
        });

        if subscribers.is_empty() {
            channels.remove(channel);
        }
    }

    fn subscribe(&self, channel: &str) -> Subscription {
        let (tx, receiver) = mpsc::channel(self.capacity);
        let token = SubscriptionToken(Uuid::new_v4());

        let mut channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
        channels.entry(channel.to_owned()).or_default().insert(token, tx);
        debug!(%channel, token = %token.0, "subscribed");

        Subscription { token, receiver }
    }

    fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        let mut channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
        let mut removed = false;
        channels.retain(|_, subscribers| {
            removed |= subscribers.remove(&token).is_some();
            !subscribers.is_empty()
        });
        removed
    }
}
