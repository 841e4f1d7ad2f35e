//! The SQLite-backed realtime key-value tree.

use std::sync::{Arc, Mutex, PoisonError};

use rusqlite::{Connection, OptionalExtension, params};
use serde_json::{Map, Value};
use tokio::sync::mpsc::unbounded_channel;

use crate::{
    Error,
    dates::now_millis,
    realtime::{
        Query, Snapshot,
        push_id::PushIdGenerator,
        subscription::{Listeners, SnapshotEvent, Subscription, SubscriptionHandle},
    },
};

/// A schemaless tree of JSON records grouped into collections.
///
/// A collection is a slash separated path such as `transactions` or
/// `users/alice`, and each record in it is stored under a single key. Every
/// write pushes a fresh snapshot to the subscribers of the collection it
/// touched, including writes that change nothing.
#[derive(Debug, Clone)]
pub struct RealtimeDb {
    connection: Arc<Mutex<Connection>>,
    listeners: Arc<Mutex<Listeners>>,
    push_ids: Arc<Mutex<PushIdGenerator>>,
}

impl RealtimeDb {
    /// Open the tree stored in `connection`, creating its table if needed.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the table cannot be created.
    pub fn new(connection: Connection) -> Result<Self, Error> {
        create_node_table(&connection)?;

        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
            listeners: Arc::default(),
            push_ids: Arc::default(),
        })
    }

    /// Subscribe to the records of `collection` that match `query`.
    ///
    /// The current snapshot is delivered straight away, then again after
    /// every write to the collection.
    ///
    /// # Errors
    /// Returns an [Error::InvalidPath] if `collection` is not a valid path.
    pub fn subscribe(&self, collection: &str, query: Option<Query>) -> Result<Subscription, Error> {
        validate_collection(collection)?;

        let (sender, receiver) = unbounded_channel();

        // The initial snapshot is read while the registry is locked, so a
        // write that commits afterwards notifies this listener after it.
        let id = {
            let mut listeners = self
                .listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let id = listeners.register(collection, query.clone(), sender.clone());

            // The receiver is alive, so this cannot fail.
            let _ = sender.send(self.get(collection, query.as_ref()));

            id
        };

        tracing::debug!("subscription {id} registered on {collection}");

        Ok(Subscription::new(
            receiver,
            SubscriptionHandle::new(id, Arc::downgrade(&self.listeners)),
        ))
    }

    /// Read the records of `collection` that match `query` once.
    ///
    /// # Errors
    /// Returns an error if the path is invalid, the database lock cannot be
    /// acquired or a stored value is not valid JSON.
    pub fn get(&self, collection: &str, query: Option<&Query>) -> Result<Snapshot, Error> {
        validate_collection(collection)?;

        let connection = self.lock_connection()?;
        let mut statement =
            connection.prepare("SELECT key, value FROM node WHERE collection = ?1 ORDER BY key")?;
        let rows = statement.query_map([collection], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut snapshot = Snapshot::new();
        for row in rows {
            let (key, text) = row?;
            let value: Value = serde_json::from_str(&text)?;

            if query.is_none_or(|query| query.matches(&value)) {
                snapshot.insert(key, value);
            }
        }

        Ok(snapshot)
    }

    /// Read the single record stored under `key`.
    ///
    /// # Errors
    /// Returns an error if the path is invalid or the value cannot be read.
    pub fn get_value(&self, collection: &str, key: &str) -> Result<Option<Value>, Error> {
        validate_collection(collection)?;
        validate_key(key)?;

        let connection = self.lock_connection()?;
        let text: Option<String> = connection
            .query_row(
                "SELECT value FROM node WHERE collection = ?1 AND key = ?2",
                params![collection, key],
                |row| row.get(0),
            )
            .optional()?;

        text.map(|text| serde_json::from_str(&text).map_err(Error::from))
            .transpose()
    }

    /// Store `value` under a newly generated key and return that key.
    ///
    /// # Errors
    /// Returns an error if the path is invalid or the value cannot be written.
    pub fn push(&self, collection: &str, value: &Value) -> Result<String, Error> {
        validate_collection(collection)?;

        let key = self
            .push_ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .next_id(now_millis().max(0) as u64, &mut rand::thread_rng());

        self.write_value(collection, &key, value)?;
        self.notify(collection);

        Ok(key)
    }

    /// Replace the record under `key` with `value`.
    ///
    /// # Errors
    /// Returns an error if the path is invalid or the value cannot be written.
    pub fn set(&self, collection: &str, key: &str, value: &Value) -> Result<(), Error> {
        validate_collection(collection)?;
        validate_key(key)?;

        self.write_value(collection, key, value)?;
        self.notify(collection);

        Ok(())
    }

    /// Merge the fields of `changes` into the record under `key`.
    ///
    /// Fields set to `null` are removed. A missing record, or one that is not
    /// an object, is treated as an empty object.
    ///
    /// # Errors
    /// Returns an error if the path is invalid or the value cannot be written.
    pub fn update(&self, collection: &str, key: &str, changes: &Map<String, Value>) -> Result<(), Error> {
        self.merge(collection, key, changes, MissingRecord::Create)?;

        Ok(())
    }

    /// Merge the fields of `changes` into the record under `key` only if that
    /// record exists.
    ///
    /// The existence check and the write happen under one lock, so a record
    /// removed concurrently is never recreated. Returns `false`, and writes
    /// nothing, if there is no record under `key`.
    ///
    /// # Errors
    /// Returns an error if the path is invalid or the value cannot be written.
    pub fn update_existing(
        &self,
        collection: &str,
        key: &str,
        changes: &Map<String, Value>,
    ) -> Result<bool, Error> {
        self.merge(collection, key, changes, MissingRecord::Skip)
    }

    /// Delete the record under `key`. Deleting a missing key succeeds.
    ///
    /// # Errors
    /// Returns an error if the path is invalid or the delete fails.
    pub fn remove(&self, collection: &str, key: &str) -> Result<(), Error> {
        validate_collection(collection)?;
        validate_key(key)?;

        let rows_affected = self.lock_connection()?.execute(
            "DELETE FROM node WHERE collection = ?1 AND key = ?2",
            params![collection, key],
        )?;

        if rows_affected == 0 {
            tracing::debug!("remove {collection}/{key}: no such key");
        }

        self.notify(collection);

        Ok(())
    }

    /// Delete every record under `keys` in a single atomic write.
    ///
    /// Returns the number of records that existed and were deleted.
    ///
    /// # Errors
    /// Returns an error if any path is invalid or the delete fails, in which
    /// case nothing is deleted.
    pub fn remove_many(&self, collection: &str, keys: &[String]) -> Result<usize, Error> {
        validate_collection(collection)?;
        for key in keys {
            validate_key(key)?;
        }

        let removed = {
            let mut connection = self.lock_connection()?;
            let transaction = connection.transaction()?;
            let mut removed = 0;
            {
                let mut statement =
                    transaction.prepare("DELETE FROM node WHERE collection = ?1 AND key = ?2")?;
                for key in keys {
                    removed += statement.execute(params![collection, key])?;
                }
            }
            transaction.commit()?;
            removed
        };

        self.notify(collection);

        Ok(removed)
    }

    /// The number of subscriptions that have not been released.
    pub fn active_subscriptions(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn merge(
        &self,
        collection: &str,
        key: &str,
        changes: &Map<String, Value>,
        missing: MissingRecord,
    ) -> Result<bool, Error> {
        validate_collection(collection)?;
        validate_key(key)?;

        {
            let connection = self.lock_connection()?;
            let existing: Option<String> = connection
                .query_row(
                    "SELECT value FROM node WHERE collection = ?1 AND key = ?2",
                    params![collection, key],
                    |row| row.get(0),
                )
                .optional()?;

            if existing.is_none() && missing == MissingRecord::Skip {
                tracing::debug!("update {collection}/{key}: no such key");
                return Ok(false);
            }

            let mut record = match existing.map(|text| serde_json::from_str::<Value>(&text)) {
                Some(Ok(Value::Object(fields))) => fields,
                Some(Err(error)) => return Err(error.into()),
                _ => Map::new(),
            };
            merge_fields(&mut record, changes);

            upsert(&connection, collection, key, &Value::Object(record))?;
        }

        self.notify(collection);

        Ok(true)
    }

    fn write_value(&self, collection: &str, key: &str, value: &Value) -> Result<(), Error> {
        let connection = self.lock_connection()?;
        upsert(&connection, collection, key, value)
    }

    /// Push the current snapshot to every subscriber of `collection`.
    fn notify(&self, collection: &str) {
        let listeners = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        for listener in listeners.for_collection(collection) {
            let event: SnapshotEvent = self.get(collection, listener.query.as_ref());

            if let Err(error) = &event {
                tracing::error!("could not read snapshot of {collection}: {error}");
            }

            if listener.sender.send(event).is_err() {
                tracing::debug!("subscriber {} has gone away", listener.id);
            }
        }
    }

    fn lock_connection(&self) -> Result<std::sync::MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

/// What a merge does when there is no record under the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MissingRecord {
    Create,
    Skip,
}

fn create_node_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS node (
                collection TEXT NOT NULL,
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                PRIMARY KEY (collection, key)
                )",
        (),
    )?;

    Ok(())
}

fn upsert(connection: &Connection, collection: &str, key: &str, value: &Value) -> Result<(), Error> {
    let text = serde_json::to_string(value)?;
    connection.execute(
        "INSERT INTO node (collection, key, value) VALUES (?1, ?2, ?3)
         ON CONFLICT (collection, key) DO UPDATE SET value = excluded.value",
        params![collection, key, text],
    )?;

    Ok(())
}

fn merge_fields(record: &mut Map<String, Value>, changes: &Map<String, Value>) {
    for (field, value) in changes {
        if value.is_null() {
            record.remove(field);
        } else {
            record.insert(field.clone(), value.clone());
        }
    }
}

fn validate_collection(collection: &str) -> Result<(), Error> {
    if collection.is_empty() || collection.split('/').any(str::is_empty) {
        return Err(Error::InvalidPath(collection.to_owned()));
    }

    Ok(())
}

fn validate_key(key: &str) -> Result<(), Error> {
    if key.is_empty() || key.contains('/') {
        return Err(Error::InvalidPath(key.to_owned()));
    }

    Ok(())
}
