//! Pull-based change notifications.
//!
//! A [`Subscription`] receives a full [`CollectionSnapshot`] when it is
//! created and again after every mutation of a document directly inside
//! the watched collection. Consumers re-derive their view state from the
//! latest snapshot. Dropping the subscription unsubscribes.

use std::sync::mpsc;
use std::time::Duration;

use super::{CollectionPath, CollectionSnapshot};

/// Sending half held by a store implementation.
#[derive(Clone)]
pub struct SnapshotSender {
    sender: mpsc::Sender<CollectionSnapshot>,
}

impl SnapshotSender {
    /// Deliver a snapshot. Returns false once the subscription was dropped.
    pub fn send(&self, snapshot: CollectionSnapshot) -> bool {
        self.sender.send(snapshot).is_ok()
    }
}

/// Receiving half handed to the consumer.
pub struct Subscription {
    collection: CollectionPath,
    receiver: mpsc::Receiver<CollectionSnapshot>,
}

impl Subscription {
    /// Create a connected sender/subscription pair for `collection`.
    pub fn channel(collection: CollectionPath) -> (SnapshotSender, Subscription) {
        let (sender, receiver) = mpsc::channel();
        (
            SnapshotSender { sender },
            Subscription {
                collection,
                receiver,
            },
        )
    }

    /// The watched collection.
    pub fn collection(&self) -> &CollectionPath {
        &self.collection
    }

    /// Next pending snapshot, without blocking.
    pub fn try_next(&self) -> Option<CollectionSnapshot> {
        self.receiver.try_recv().ok()
    }

    /// Wait up to `timeout` for the next snapshot.
    pub fn next_timeout(&self, timeout: Duration) -> Option<CollectionSnapshot> {
        self.receiver.recv_timeout(timeout).ok()
    }

    /// Drain pending snapshots and keep only the most recent one.
    pub fn latest(&self) -> Option<CollectionSnapshot> {
        let mut latest = None;
        while let Ok(snapshot) = self.receiver.try_recv() {
            latest = Some(snapshot);
        }
        latest
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("collection", &self.collection)
            .finish_non_exhaustive()
    }
}
