//! Implements a struct that holds the state of the REST server.

use std::{path::PathBuf, sync::Arc};

use rusqlite::Connection;

use crate::{
    Error,
    cache::TransactionCache,
    card::CardPreferences,
    realtime::RealtimeDb,
    session::{Session, UserId},
    transaction::TransactionStore,
};

/// The settings needed to start the server.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// The SQLite file that backs the realtime store.
    pub db_path: PathBuf,
    /// The JSON file that holds the local copy of the card.
    pub card_cache_path: PathBuf,
    /// The ID of the signed-in user.
    pub user_id: String,
    /// The full name of the signed-in user, e.g. "Alice Jones".
    pub display_name: String,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub timezone: String,
}

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The signed-in user.
    pub session: Session,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,

    /// Reads and writes transactions in the realtime store.
    pub store: TransactionStore,

    /// The signed-in user's transactions, kept fresh by a live subscription.
    pub cache: Arc<TransactionCache>,

    /// The card shown on the dashboard.
    pub cards: CardPreferences,
}

impl AppState {
    /// Open the store at `config.db_path` and start following the configured
    /// user's transactions.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or initialized.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let connection = Connection::open(&config.db_path).inspect_err(|error| {
            tracing::error!(
                "could not open database {}: {error}",
                config.db_path.display()
            )
        })?;

        Self::new(
            connection,
            config.card_cache_path.clone(),
            Session::new(UserId::new(&config.user_id), &config.display_name),
            &config.timezone,
        )
    }

    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the table for the
    /// realtime store. `local_timezone` should be a valid, canonical timezone
    /// name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        card_cache_path: PathBuf,
        session: Session,
        local_timezone: &str,
    ) -> Result<Self, Error> {
        let db = RealtimeDb::new(db_connection)?;
        let store = TransactionStore::new(db.clone());
        let cache = TransactionCache::subscribe(&store, session.user_id.clone())?;
        let cards = CardPreferences::load(card_cache_path, db, session.user_id.clone());

        tracing::info!(
            "started session for user {} ({})",
            session.user_id,
            session.display_name
        );

        Ok(Self {
            session,
            local_timezone: local_timezone.to_owned(),
            store,
            cache: Arc::new(cache),
            cards,
        })
    }
}
