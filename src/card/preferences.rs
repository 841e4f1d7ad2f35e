//! Keeps the dashboard card in a local JSON file and in the realtime store.
//!
//! The local copy is what gets rendered. The store copy is what survives a
//! lost cache file. When the two disagree at start up the store wins.

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use crate::{Error, card::core::CardInfo, realtime::RealtimeDb, session::UserId};

const CARD_KEY: &str = "card";

/// The card preference of one user.
#[derive(Debug, Clone)]
pub struct CardPreferences {
    current: Arc<Mutex<CardInfo>>,
    cache_path: PathBuf,
    db: RealtimeDb,
    user_id: UserId,
}

impl CardPreferences {
    /// Load the card from the cache file, falling back to the default card,
    /// then replace it with the store's copy if the store has a valid one.
    pub fn load(cache_path: impl Into<PathBuf>, db: RealtimeDb, user_id: UserId) -> Self {
        let cache_path = cache_path.into();
        let mut card = read_cache(&cache_path).unwrap_or_default();

        match db.get_value(&user_collection(&user_id), CARD_KEY) {
            Ok(Some(value)) => match serde_json::from_value::<CardInfo>(value) {
                Ok(stored) => {
                    if stored != card {
                        tracing::debug!("replacing cached card with the stored card");
                        write_cache(&cache_path, &stored);
                    }
                    card = stored;
                }
                Err(error) => tracing::warn!("ignoring malformed stored card: {error}"),
            },
            Ok(None) => {}
            Err(error) => tracing::error!("could not read the stored card: {error}"),
        }

        Self {
            current: Arc::new(Mutex::new(card)),
            cache_path,
            db,
            user_id,
        }
    }

    /// The card to display.
    pub fn current(&self) -> Result<CardInfo, Error> {
        self.current
            .lock()
            .map(|card| card.clone())
            .inspect_err(|error| tracing::error!("could not acquire card lock: {error}"))
            .map_err(|_| Error::CardCacheError("the card lock is poisoned".to_owned()))
    }

    /// Save `card`.
    ///
    /// The local copy and cache file are updated first and are kept even if
    /// writing to the store fails. Store failures are logged, not returned.
    pub fn save(&self, card: CardInfo) -> Result<(), Error> {
        {
            let mut current = self
                .current
                .lock()
                .inspect_err(|error| tracing::error!("could not acquire card lock: {error}"))
                .map_err(|_| Error::CardCacheError("the card lock is poisoned".to_owned()))?;
            *current = card.clone();
        }
        write_cache(&self.cache_path, &card);

        let result = serde_json::to_value(&card)
            .map_err(Error::from)
            .and_then(|value| {
                self.db
                    .set(&user_collection(&self.user_id), CARD_KEY, &value)
            });

        if let Err(error) = result {
            tracing::error!("could not save the card for user {}: {error}", self.user_id);
        }

        Ok(())
    }
}

fn user_collection(user_id: &UserId) -> String {
    format!("users/{user_id}")
}

fn read_cache(path: &Path) -> Option<CardInfo> {
    let content = std::fs::read_to_string(path)
        .inspect_err(|error| tracing::debug!("no cached card at {}: {error}", path.display()))
        .ok()?;

    serde_json::from_str(&content)
        .inspect_err(|error| tracing::warn!("ignoring malformed card cache: {error}"))
        .ok()
}

fn write_cache(path: &Path, card: &CardInfo) {
    let result = serde_json::to_string_pretty(card)
        .map_err(|error| error.to_string())
        .and_then(|json| {
            std::fs::write(path, format!("{json}\n")).map_err(|error| error.to_string())
        });

    if let Err(error) = result {
        tracing::error!("could not write card cache {}: {error}", path.display());
    }
}
