use std::{sync::Arc, time::Duration};

use tokio::time::timeout;

use crate::{cache::TransactionCache, session::UserId, transaction::TransactionStore};

/// Subscribe a cache for `user_id` and wait for its first snapshot.
pub(crate) async fn loaded_cache(store: &TransactionStore, user_id: &str) -> Arc<TransactionCache> {
    let cache = TransactionCache::subscribe(store, UserId::new(user_id))
        .expect("could not subscribe to transactions");
    let mut receiver = cache.watch();

    timeout(
        Duration::from_secs(5),
        receiver.wait_for(|snapshot| !snapshot.loading),
    )
    .await
    .expect("timed out waiting for the cache")
    .expect("cache sender dropped");

    Arc::new(cache)
}
