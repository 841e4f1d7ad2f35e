//! An in-memory copy of the current user's transactions that follows the
//! store through a live subscription.

use std::sync::Arc;

use tokio::{
    sync::{mpsc::UnboundedReceiver, watch},
    task::JoinHandle,
};

use crate::{
    Error,
    realtime::{SnapshotEvent, SubscriptionHandle},
    session::UserId,
    transaction::{Transaction, TransactionStore, transactions_from_snapshot},
};

/// What the cache currently holds.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSnapshot {
    /// True until the first snapshot, or an error, has been received.
    pub loading: bool,
    /// The user's transactions, newest first.
    pub transactions: Arc<Vec<Transaction>>,
}

impl CacheSnapshot {
    fn loading() -> Self {
        Self {
            loading: true,
            transactions: Arc::default(),
        }
    }
}

/// Mirrors the transactions of one user.
///
/// Every snapshot from the store replaces the contents entirely. Readers get
/// the latest contents through [TransactionCache::current] or wait for
/// changes on the receiver from [TransactionCache::watch].
///
/// The cache never changes its contents on its own: writes go to the store
/// and show up here once the store publishes the next snapshot.
#[derive(Debug)]
pub struct TransactionCache {
    sender: Arc<watch::Sender<CacheSnapshot>>,
    user_id: UserId,
    subscription: Option<SubscriptionHandle>,
    task: JoinHandle<()>,
}

impl TransactionCache {
    /// Start following the transactions owned by `user_id`.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    /// Returns an error if the subscription cannot be registered.
    pub fn subscribe(store: &TransactionStore, user_id: UserId) -> Result<Self, Error> {
        let (sender, _) = watch::channel(CacheSnapshot::loading());
        let sender = Arc::new(sender);
        let (subscription, task) = start_subscription(store, &user_id, sender.clone())?;

        Ok(Self {
            sender,
            user_id,
            subscription: Some(subscription),
            task,
        })
    }

    /// Follow a different user, releasing the current subscription first.
    ///
    /// Existing receivers from [TransactionCache::watch] keep working and see
    /// the cache return to the loading state.
    pub fn replace_session(&mut self, store: &TransactionStore, user_id: UserId) -> Result<(), Error> {
        self.release();
        self.sender.send_replace(CacheSnapshot::loading());

        let (subscription, task) = start_subscription(store, &user_id, self.sender.clone())?;
        self.subscription = Some(subscription);
        self.task = task;
        self.user_id = user_id;

        Ok(())
    }

    /// The user whose transactions are cached.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// The latest contents.
    pub fn current(&self) -> CacheSnapshot {
        self.sender.borrow().clone()
    }

    /// A receiver that is notified whenever the contents change.
    pub fn watch(&self) -> watch::Receiver<CacheSnapshot> {
        self.sender.subscribe()
    }

    /// Find a cached transaction by its key.
    pub fn find(&self, id: &str) -> Option<Transaction> {
        self.sender
            .borrow()
            .transactions
            .iter()
            .find(|transaction| transaction.id == id)
            .cloned()
    }

    fn release(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        self.task.abort();
    }
}

impl Drop for TransactionCache {
    fn drop(&mut self) {
        self.release();
    }
}

fn start_subscription(
    store: &TransactionStore,
    user_id: &UserId,
    sender: Arc<watch::Sender<CacheSnapshot>>,
) -> Result<(SubscriptionHandle, JoinHandle<()>), Error> {
    let (events, handle) = store.subscribe_for_user(user_id)?.into_parts();
    let task = tokio::spawn(apply_snapshots(events, sender, user_id.clone()));

    Ok((handle, task))
}

async fn apply_snapshots(
    mut events: UnboundedReceiver<SnapshotEvent>,
    sender: Arc<watch::Sender<CacheSnapshot>>,
    user_id: UserId,
) {
    while let Some(event) = events.recv().await {
        match event {
            Ok(snapshot) => {
                let transactions = transactions_from_snapshot(&snapshot);
                tracing::debug!(
                    "received {} transactions for user {user_id}",
                    transactions.len()
                );
                sender.send_replace(CacheSnapshot {
                    loading: false,
                    transactions: Arc::new(transactions),
                });
            }
            Err(error) => {
                tracing::error!("transaction subscription for user {user_id} failed: {error}");
                sender.send_modify(|snapshot| snapshot.loading = false);
            }
        }
    }

    tracing::debug!("transaction subscription for user {user_id} closed");
}
