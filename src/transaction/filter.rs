//! Narrowing a list of transactions down to the ones the user asked to see.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    dates::parse_date,
    transaction::core::{Transaction, TransactionType},
};

/// Which transaction types to show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    /// Show income and expenses.
    #[default]
    All,
    /// Show income only.
    Income,
    /// Show expenses only.
    Expense,
}

impl TypeFilter {
    fn matches(self, type_: TransactionType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Income => type_ == TransactionType::Income,
            TypeFilter::Expense => type_ == TransactionType::Expense,
        }
    }
}

/// The filters from the dashboard's filter form.
///
/// Empty strings mean the filter is not in use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Matched against the title and the category.
    pub search: String,
    /// Restricts the transaction type.
    #[serde(rename = "type")]
    pub type_filter: TypeFilter,
    /// Matched against the category.
    pub category: String,
    /// The earliest date to include, `YYYY-MM-DD`.
    pub start_date: String,
    /// The latest date to include, `YYYY-MM-DD`.
    pub end_date: String,
}

impl FilterCriteria {
    /// Whether any filter is in use.
    pub fn is_active(&self) -> bool {
        !self.search.is_empty()
            || self.type_filter != TypeFilter::All
            || !self.category.is_empty()
            || !self.start_date.trim().is_empty()
            || !self.end_date.trim().is_empty()
    }
}

/// A date bound that is either unused, a valid date, or text that is not a
/// date and therefore cannot be satisfied.
#[derive(Debug, Clone, Copy, PartialEq)]
enum DateBound {
    Unset,
    Date(Date),
    Invalid,
}

impl DateBound {
    fn parse(text: &str) -> Self {
        let text = text.trim();

        if text.is_empty() {
            return DateBound::Unset;
        }

        match parse_date(text) {
            Some(date) => DateBound::Date(date),
            None => {
                tracing::debug!("ignoring unparsable date bound {text:?}");
                DateBound::Invalid
            }
        }
    }
}

/// Get the transactions that satisfy every filter in `criteria`, keeping
/// their order.
///
/// Text filters are case-insensitive substring matches. Date bounds are
/// inclusive, and a transaction without a valid date is excluded whenever a
/// bound is set.
pub fn filter_transactions(
    transactions: &[Transaction],
    criteria: &FilterCriteria,
) -> Vec<Transaction> {
    let search = criteria.search.to_lowercase();
    let category = criteria.category.to_lowercase();
    let start = DateBound::parse(&criteria.start_date);
    let end = DateBound::parse(&criteria.end_date);

    transactions
        .iter()
        .filter(|transaction| {
            matches_search(transaction, &search)
                && criteria.type_filter.matches(transaction.type_)
                && matches_category(transaction, &category)
                && within_bounds(transaction, start, end)
        })
        .cloned()
        .collect()
}

fn matches_search(transaction: &Transaction, search: &str) -> bool {
    search.is_empty()
        || transaction.title.to_lowercase().contains(search)
        || transaction
            .category
            .as_deref()
            .is_some_and(|category| category.to_lowercase().contains(search))
}

fn matches_category(transaction: &Transaction, category: &str) -> bool {
    category.is_empty()
        || transaction
            .category
            .as_deref()
            .is_some_and(|value| value.to_lowercase().contains(category))
}

fn within_bounds(transaction: &Transaction, start: DateBound, end: DateBound) -> bool {
    if start == DateBound::Unset && end == DateBound::Unset {
        return true;
    }

    let Some(date) = transaction.parsed_date() else {
        return false;
    };

    let after_start = match start {
        DateBound::Unset => true,
        DateBound::Date(start) => date >= start,
        DateBound::Invalid => false,
    };
    let before_end = match end {
        DateBound::Unset => true,
        DateBound::Date(end) => date <= end,
        DateBound::Invalid => false,
    };

    after_start && before_end
}
