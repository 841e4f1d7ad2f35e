//! Live subscriptions that push a full snapshot after every change.

use std::sync::{Mutex, PoisonError, Weak};

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::{
    Error,
    realtime::{Query, Snapshot},
};

/// A message delivered to a subscriber: either the complete current contents
/// of the subscribed collection or the error that prevented reading them.
pub type SnapshotEvent = Result<Snapshot, Error>;

pub(crate) type ListenerId = u64;

#[derive(Debug)]
pub(crate) struct Listener {
    pub(crate) id: ListenerId,
    pub(crate) collection: String,
    pub(crate) query: Option<Query>,
    pub(crate) sender: UnboundedSender<SnapshotEvent>,
}

/// The registry of active subscriptions.
#[derive(Debug, Default)]
pub(crate) struct Listeners {
    next_id: ListenerId,
    entries: Vec<Listener>,
}

impl Listeners {
    pub(crate) fn register(
        &mut self,
        collection: &str,
        query: Option<Query>,
        sender: UnboundedSender<SnapshotEvent>,
    ) -> ListenerId {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Listener {
            id,
            collection: collection.to_owned(),
            query,
            sender,
        });

        id
    }

    /// Remove the listener `id`, returning whether it was registered.
    pub(crate) fn unregister(&mut self, id: ListenerId) -> bool {
        let count_before = self.entries.len();
        self.entries.retain(|listener| listener.id != id);
        self.entries.len() != count_before
    }

    pub(crate) fn for_collection<'a>(
        &'a self,
        collection: &'a str,
    ) -> impl Iterator<Item = &'a Listener> + 'a {
        self.entries
            .iter()
            .filter(move |listener| listener.collection == collection)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// A live subscription to a collection.
///
/// The first event is the snapshot at the time of subscribing. Dropping the
/// subscription releases it.
#[derive(Debug)]
pub struct Subscription {
    receiver: UnboundedReceiver<SnapshotEvent>,
    handle: SubscriptionHandle,
}

impl Subscription {
    pub(crate) fn new(receiver: UnboundedReceiver<SnapshotEvent>, handle: SubscriptionHandle) -> Self {
        Self { receiver, handle }
    }

    /// Wait for the next snapshot.
    ///
    /// Returns `None` once the subscription has been released.
    pub async fn next(&mut self) -> Option<SnapshotEvent> {
        self.receiver.recv().await
    }

    /// Split the subscription into its event stream and the handle that
    /// keeps it registered.
    ///
    /// The stream ends when the handle is dropped.
    pub fn into_parts(self) -> (UnboundedReceiver<SnapshotEvent>, SubscriptionHandle) {
        (self.receiver, self.handle)
    }
}

/// Keeps a subscription registered with the store until dropped.
#[derive(Debug)]
pub struct SubscriptionHandle {
    id: ListenerId,
    listeners: Weak<Mutex<Listeners>>,
}

impl SubscriptionHandle {
    pub(crate) fn new(id: ListenerId, listeners: Weak<Mutex<Listeners>>) -> Self {
        Self { id, listeners }
    }

    /// Release the subscription now instead of at the end of scope.
    pub fn unsubscribe(self) {}
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        let Some(listeners) = self.listeners.upgrade() else {
            return;
        };

        let released = listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .unregister(self.id);

        if released {
            tracing::debug!("released subscription {}", self.id);
        }
    }
}
