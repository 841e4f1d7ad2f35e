//! Reads and writes transactions in the realtime store.

use serde_json::{Map, Value};

use crate::{
    Error,
    realtime::{Query, RealtimeDb, Subscription},
    session::UserId,
    transaction::core::{Transaction, TransactionBuilder, TransactionId},
};

/// The collection that holds every user's transactions.
pub const TRANSACTIONS_COLLECTION: &str = "transactions";

/// Something that can persist the result of a submitted transaction form.
pub trait TransactionWriter {
    /// Insert a new transaction and return its key.
    fn create(&self, builder: TransactionBuilder) -> Result<TransactionId, Error>;

    /// Overwrite the editable fields of an existing transaction.
    fn update(&self, transaction: &Transaction) -> Result<(), Error>;
}

/// The transactions collection of a [RealtimeDb].
#[derive(Debug, Clone)]
pub struct TransactionStore {
    db: RealtimeDb,
}

impl TransactionStore {
    /// Create a store backed by `db`.
    pub fn new(db: RealtimeDb) -> Self {
        Self { db }
    }

    /// The underlying realtime store.
    pub fn db(&self) -> &RealtimeDb {
        &self.db
    }

    /// Subscribe to the transactions owned by `user_id`.
    pub fn subscribe_for_user(&self, user_id: &UserId) -> Result<Subscription, Error> {
        self.db
            .subscribe(TRANSACTIONS_COLLECTION, Some(user_query(user_id)))
    }

    /// Get a single transaction.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no transaction under `id` or the
    /// stored record cannot be decoded.
    pub fn get(&self, id: &str) -> Result<Transaction, Error> {
        let value = self
            .db
            .get_value(TRANSACTIONS_COLLECTION, id)?
            .ok_or(Error::NotFound)?;

        let mut transaction: Transaction = serde_json::from_value(value).map_err(|error| {
            tracing::warn!("stored transaction {id} is malformed: {error}");
            Error::NotFound
        })?;
        transaction.id = id.to_owned();

        Ok(transaction)
    }

    /// Insert a new transaction and return its key.
    pub fn create(&self, builder: TransactionBuilder) -> Result<TransactionId, Error> {
        let value = serde_json::to_value(&builder)?;
        let id = self.db.push(TRANSACTIONS_COLLECTION, &value)?;

        tracing::debug!("created transaction {id}");

        Ok(id)
    }

    /// Overwrite the editable fields of the transaction with the same ID.
    ///
    /// # Errors
    /// Returns [Error::UpdateMissingTransaction] if no transaction has the ID.
    pub fn update(&self, transaction: &Transaction) -> Result<(), Error> {
        let updated = self.db.update_existing(
            TRANSACTIONS_COLLECTION,
            &transaction.id,
            &editable_fields(transaction),
        )?;

        if updated {
            Ok(())
        } else {
            Err(Error::UpdateMissingTransaction)
        }
    }

    /// Get the owner of the record stored under `id`, reading the raw record
    /// so that records which cannot be decoded still report their owner.
    ///
    /// Returns `None` if there is no record under `id`, and `Some(None)` if
    /// the record has no `userId`.
    pub fn get_owner(&self, id: &str) -> Result<Option<Option<UserId>>, Error> {
        let Some(value) = self.db.get_value(TRANSACTIONS_COLLECTION, id)? else {
            return Ok(None);
        };

        Ok(Some(
            value
                .get("userId")
                .and_then(Value::as_str)
                .map(UserId::new),
        ))
    }

    /// Delete a transaction. Deleting a missing transaction succeeds.
    pub fn delete(&self, id: &str) -> Result<(), Error> {
        self.db.remove(TRANSACTIONS_COLLECTION, id)
    }

    /// Delete every transaction owned by `user_id` in one atomic write and
    /// return how many were deleted.
    pub fn delete_all_for_user(&self, user_id: &UserId) -> Result<usize, Error> {
        let keys: Vec<String> = self
            .db
            .get(TRANSACTIONS_COLLECTION, Some(&user_query(user_id)))?
            .into_keys()
            .collect();

        self.db.remove_many(TRANSACTIONS_COLLECTION, &keys)
    }
}

impl TransactionWriter for TransactionStore {
    fn create(&self, builder: TransactionBuilder) -> Result<TransactionId, Error> {
        TransactionStore::create(self, builder)
    }

    fn update(&self, transaction: &Transaction) -> Result<(), Error> {
        TransactionStore::update(self, transaction)
    }
}

fn user_query(user_id: &UserId) -> Query {
    Query::equal_to("userId", user_id.as_str())
}

/// The fields a form edit may change. A cleared category is sent as `null`
/// so the merge removes it.
fn editable_fields(transaction: &Transaction) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("title".to_owned(), Value::from(transaction.title.as_str()));
    fields.insert("amount".to_owned(), Value::from(transaction.amount));
    fields.insert("type".to_owned(), Value::from(transaction.type_.as_str()));
    fields.insert(
        "category".to_owned(),
        transaction
            .category
            .as_deref()
            .map_or(Value::Null, Value::from),
    );
    fields.insert(
        "date".to_owned(),
        transaction.date.as_deref().map_or(Value::Null, Value::from),
    );

    fields
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use serde_json::json;

    use crate::{
        Error,
        realtime::RealtimeDb,
        session::UserId,
        transaction::core::{Transaction, TransactionType},
    };

    use super::{TRANSACTIONS_COLLECTION, TransactionStore};

    fn get_test_store() -> TransactionStore {
        TransactionStore::new(RealtimeDb::new(Connection::open_in_memory().unwrap()).unwrap())
    }

    fn rent(user: &str) -> crate::transaction::core::TransactionBuilder {
        Transaction::build(
            "Rent",
            500.0,
            TransactionType::Expense,
            "2024-01-05",
            UserId::new(user),
        )
        .category(Some("Home".to_owned()))
        .created_at(1)
    }

    #[test]
    fn create_then_get() {
        let store = get_test_store();

        let id = store.create(rent("alice")).unwrap();
        let transaction = store.get(&id).unwrap();

        assert_eq!(transaction.id, id);
        assert_eq!(transaction.title, "Rent");
        assert_eq!(transaction.user_id, UserId::new("alice"));
    }

    #[test]
    fn get_missing_transaction() {
        let store = get_test_store();

        assert_eq!(store.get("missing"), Err(Error::NotFound));
    }

    #[test]
    fn update_overwrites_editable_fields_only() {
        let store = get_test_store();
        let id = store.create(rent("alice").notes(Some("monthly".to_owned()))).unwrap();
        let mut transaction = store.get(&id).unwrap();
        transaction.title = "Rent (flat)".to_owned();
        transaction.category = None;
        transaction.user_id = UserId::new("mallory");
        transaction.created_at = 99;

        store.update(&transaction).unwrap();

        let stored = store
            .db()
            .get_value(TRANSACTIONS_COLLECTION, &id)
            .unwrap()
            .unwrap();
        assert_eq!(
            stored,
            json!({
                "title": "Rent (flat)",
                "amount": 500.0,
                "type": "expense",
                "date": "2024-01-05",
                "notes": "monthly",
                "userId": "alice",
                "createdAt": 1
            })
        );
    }

    #[test]
    fn update_missing_transaction_fails() {
        let store = get_test_store();
        let id = store.create(rent("alice")).unwrap();
        let mut transaction = store.get(&id).unwrap();
        store.delete(&id).unwrap();
        transaction.title = "Changed".to_owned();

        assert_eq!(
            store.update(&transaction),
            Err(Error::UpdateMissingTransaction)
        );
        assert_eq!(store.get(&id), Err(Error::NotFound));
    }

    #[test]
    fn update_does_not_recreate_deleted_transaction() {
        let store = get_test_store();
        let id = store.create(rent("alice")).unwrap();
        let transaction = store.get(&id).unwrap();
        store.delete(&id).unwrap();

        let _ = store.update(&transaction);

        assert_eq!(store.db().get_value(TRANSACTIONS_COLLECTION, &id).unwrap(), None);
    }

    #[test]
    fn owner_of_malformed_record() {
        let store = get_test_store();
        let id = store
            .db()
            .push(
                TRANSACTIONS_COLLECTION,
                &json!({"title": "Bob's", "type": "transfer", "userId": "bob"}),
            )
            .unwrap();
        let ownerless = store
            .db()
            .push(TRANSACTIONS_COLLECTION, &json!({"title": "Orphan"}))
            .unwrap();

        assert_eq!(store.get(&id), Err(Error::NotFound));
        assert_eq!(store.get_owner(&id), Ok(Some(Some(UserId::new("bob")))));
        assert_eq!(store.get_owner(&ownerless), Ok(Some(None)));
        assert_eq!(store.get_owner("missing"), Ok(None));
    }

    #[test]
    fn delete_missing_transaction_succeeds() {
        let store = get_test_store();

        assert_eq!(store.delete("missing"), Ok(()));
    }

    #[test]
    fn delete_all_only_removes_own_transactions() {
        let store = get_test_store();
        store.create(rent("alice")).unwrap();
        store.create(rent("alice")).unwrap();
        let bobs = store.create(rent("bob")).unwrap();

        let removed = store.delete_all_for_user(&UserId::new("alice")).unwrap();

        assert_eq!(removed, 2);
        let remaining = store.db().get(TRANSACTIONS_COLLECTION, None).unwrap();
        assert_eq!(remaining.keys().collect::<Vec<_>>(), vec![&bobs]);
    }
}
