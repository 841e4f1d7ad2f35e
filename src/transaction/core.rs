//! Defines the core data model for transactions and how it is decoded from
//! store snapshots.

use std::cmp::Ordering;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use time::Date;

use crate::{dates::parse_date, realtime::Snapshot, session::UserId};

/// The label used for transactions without a category.
pub const UNCATEGORIZED_LABEL: &str = "Other";

/// The store key of a transaction.
pub type TransactionId = String;

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned.
    Income,
    /// Money spent.
    #[default]
    Expense,
}

impl TransactionType {
    /// The value stored in the `type` field.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    /// The capitalised name shown to users.
    pub fn label(self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }
}

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// Amounts are always positive and [Transaction::type_] determines the
/// direction. To create a new transaction, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The store key of the transaction.
    #[serde(skip)]
    pub id: TransactionId,
    /// What the transaction was for.
    #[serde(default)]
    pub title: String,
    /// The amount of money spent or earned.
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub amount: f64,
    /// Whether the money was spent or earned.
    #[serde(rename = "type")]
    pub type_: TransactionType,
    /// Free text category such as "Food" or "Rent".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// When the transaction happened as a `YYYY-MM-DD` string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Extra details, kept as stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// The user that owns the transaction.
    pub user_id: UserId,
    /// When the record was created, in milliseconds since the Unix epoch.
    #[serde(default)]
    pub created_at: i64,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        title: &str,
        amount: f64,
        type_: TransactionType,
        date: &str,
        user_id: UserId,
    ) -> TransactionBuilder {
        TransactionBuilder {
            title: title.to_owned(),
            amount,
            type_,
            category: None,
            date: date.to_owned(),
            notes: None,
            user_id,
            created_at: 0,
        }
    }

    /// The category to show for this transaction, [UNCATEGORIZED_LABEL] if
    /// it has none.
    pub fn category_label(&self) -> &str {
        match self.category.as_deref().map(str::trim) {
            Some(category) if !category.is_empty() => category,
            _ => UNCATEGORIZED_LABEL,
        }
    }

    /// The stored date string, or `None` if it is missing or blank.
    pub fn date_str(&self) -> Option<&str> {
        self.date
            .as_deref()
            .map(str::trim)
            .filter(|date| !date.is_empty())
    }

    /// The stored date as a calendar date, if it can be parsed.
    pub fn parsed_date(&self) -> Option<Date> {
        self.date_str().and_then(parse_date)
    }
}

/// A transaction that has not been written to the store yet.
///
/// The store assigns the key when the builder is inserted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBuilder {
    /// What the transaction was for.
    pub title: String,
    /// The amount of money spent or earned, always positive.
    pub amount: f64,
    /// Whether the money was spent or earned.
    #[serde(rename = "type")]
    pub type_: TransactionType,
    /// Free text category, `None` when the user left it blank.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// When the transaction happened as a `YYYY-MM-DD` string.
    pub date: String,
    /// Extra details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// The user that owns the transaction.
    pub user_id: UserId,
    /// When the record was created, in milliseconds since the Unix epoch.
    pub created_at: i64,
}

impl TransactionBuilder {
    /// Set the category for the transaction.
    pub fn category(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }

    /// Set the notes for the transaction.
    pub fn notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes;
        self
    }

    /// Set the creation time in milliseconds since the Unix epoch.
    pub fn created_at(mut self, created_at: i64) -> Self {
        self.created_at = created_at;
        self
    }
}

/// Stored amounts may be numbers or numeric strings. Anything else counts as
/// zero.
fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;

    let amount = match value {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(text) => text.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };

    Ok(if amount.is_finite() { amount } else { 0.0 })
}

// ============================================================================
// SNAPSHOT DECODING
// ============================================================================

/// Convert a store snapshot into transactions sorted by date, newest first.
///
/// Records that cannot be decoded are skipped with a warning. Records with a
/// missing or blank date sort after all dated records, and records with the
/// same date keep their key order.
pub fn transactions_from_snapshot(snapshot: &Snapshot) -> Vec<Transaction> {
    let mut transactions: Vec<Transaction> = snapshot
        .iter()
        .filter_map(
            |(key, value)| match serde_json::from_value::<Transaction>(value.clone()) {
                Ok(mut transaction) => {
                    transaction.id = key.clone();
                    Some(transaction)
                }
                Err(error) => {
                    tracing::warn!("skipping malformed transaction {key}: {error}");
                    None
                }
            },
        )
        .collect();

    transactions.sort_by(compare_newest_first);

    transactions
}

fn compare_newest_first(a: &Transaction, b: &Transaction) -> Ordering {
    match (a.date_str(), b.date_str()) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{realtime::Snapshot, session::UserId};

    use super::{Transaction, TransactionType, UNCATEGORIZED_LABEL, transactions_from_snapshot};

    fn snapshot(entries: &[(&str, serde_json::Value)]) -> Snapshot {
        entries
            .iter()
            .map(|(key, value)| ((*key).to_owned(), value.clone()))
            .collect()
    }

    #[test]
    fn decodes_stored_record() {
        let snapshot = snapshot(&[(
            "a1",
            json!({
                "title": "Rent",
                "amount": 500,
                "type": "expense",
                "category": "Home",
                "date": "2024-01-05",
                "userId": "alice",
                "createdAt": 1704412800000i64
            }),
        )]);

        let transactions = transactions_from_snapshot(&snapshot);

        assert_eq!(
            transactions,
            vec![Transaction {
                id: "a1".to_owned(),
                title: "Rent".to_owned(),
                amount: 500.0,
                type_: TransactionType::Expense,
                category: Some("Home".to_owned()),
                date: Some("2024-01-05".to_owned()),
                notes: None,
                user_id: UserId::new("alice"),
                created_at: 1704412800000,
            }]
        );
    }

    #[test]
    fn coerces_bad_amounts() {
        let snapshot = snapshot(&[
            ("a", json!({"type": "income", "amount": "12.5", "userId": "alice"})),
            ("b", json!({"type": "income", "amount": "lots", "userId": "alice"})),
            ("c", json!({"type": "income", "userId": "alice"})),
            ("d", json!({"type": "income", "amount": null, "userId": "alice"})),
        ]);

        let amounts: Vec<f64> = transactions_from_snapshot(&snapshot)
            .iter()
            .map(|transaction| transaction.amount)
            .collect();

        assert_eq!(amounts, vec![12.5, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn skips_records_with_unknown_type() {
        let snapshot = snapshot(&[
            ("a", json!({"type": "transfer", "amount": 1, "userId": "alice"})),
            ("b", json!({"amount": 1, "userId": "alice"})),
            ("c", json!({"type": "income", "amount": 1, "userId": "alice"})),
        ]);

        let transactions = transactions_from_snapshot(&snapshot);

        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].id, "c");
    }

    #[test]
    fn sorts_newest_first_with_missing_dates_last() {
        let snapshot = snapshot(&[
            ("a", json!({"type": "income", "date": "2024-01-05", "userId": "alice"})),
            ("b", json!({"type": "income", "userId": "alice"})),
            ("c", json!({"type": "income", "date": "2024-03-01", "userId": "alice"})),
            ("d", json!({"type": "income", "date": "", "userId": "alice"})),
            ("e", json!({"type": "income", "date": "2024-01-05", "userId": "alice"})),
        ]);

        let ids: Vec<String> = transactions_from_snapshot(&snapshot)
            .into_iter()
            .map(|transaction| transaction.id)
            .collect();

        assert_eq!(ids, vec!["c", "a", "e", "b", "d"]);
    }

    #[test]
    fn blank_category_is_labelled_other() {
        let mut transaction: Transaction = serde_json::from_value(json!({
            "type": "expense",
            "category": "  ",
            "userId": "alice"
        }))
        .unwrap();

        assert_eq!(transaction.category_label(), UNCATEGORIZED_LABEL);

        transaction.category = None;
        assert_eq!(transaction.category_label(), UNCATEGORIZED_LABEL);

        transaction.category = Some("Food".to_owned());
        assert_eq!(transaction.category_label(), "Food");
    }

    #[test]
    fn builder_serializes_store_field_names() {
        let builder = Transaction::build(
            "Salary",
            1000.0,
            TransactionType::Income,
            "2024-01-05",
            UserId::new("alice"),
        )
        .created_at(42);

        let value = serde_json::to_value(&builder).unwrap();

        assert_eq!(
            value,
            json!({
                "title": "Salary",
                "amount": 1000.0,
                "type": "income",
                "date": "2024-01-05",
                "userId": "alice",
                "createdAt": 42
            })
        );
    }
}
