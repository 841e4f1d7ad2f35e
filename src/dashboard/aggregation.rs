//! Summaries of a list of transactions for the dashboard cards and charts.
//!
//! Every function is a pure reduction over its input, recomputed for each
//! request.

use std::collections::{BTreeMap, HashMap};

use time::{Date, Month};

use crate::{
    dates::format_month_label,
    transaction::{Transaction, TransactionType},
};

/// Income, expense and their difference.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Totals {
    pub income: f64,
    pub expense: f64,
    /// `income - expense`.
    pub balance: f64,
}

/// Income and expense for one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MonthlySummary {
    pub year: i32,
    pub month: Month,
    /// The short month and year, e.g. "Jan 2024".
    pub label: String,
    pub income: f64,
    pub expense: f64,
}

/// The total spent in one category.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// Sums income and expense amounts.
///
/// Dates play no part, so undated transactions are counted.
pub(crate) fn calculate_totals(transactions: &[Transaction]) -> Totals {
    let mut income = 0.0;
    let mut expense = 0.0;

    for transaction in transactions {
        match transaction.type_ {
            TransactionType::Income => income += transaction.amount,
            TransactionType::Expense => expense += transaction.amount,
        }
    }

    Totals {
        income,
        expense,
        balance: income - expense,
    }
}

/// Groups income and expense by month.
///
/// # Returns
/// One entry per month that has at least one transaction, oldest first.
/// Transactions without a valid date are left out.
pub(crate) fn monthly_series(transactions: &[Transaction]) -> Vec<MonthlySummary> {
    // Keyed by the first day of the month so the map iterates in date order.
    let mut months: BTreeMap<Date, (f64, f64)> = BTreeMap::new();

    for transaction in transactions {
        let Some(date) = transaction.parsed_date() else {
            continue;
        };
        let Ok(month) = date.replace_day(1) else {
            continue;
        };

        let (income, expense) = months.entry(month).or_insert((0.0, 0.0));
        match transaction.type_ {
            TransactionType::Income => *income += transaction.amount,
            TransactionType::Expense => *expense += transaction.amount,
        }
    }

    months
        .into_iter()
        .map(|(date, (income, expense))| MonthlySummary {
            year: date.year(),
            month: date.month(),
            label: format_month_label(date),
            income,
            expense,
        })
        .collect()
}

/// Sums expenses per category, largest first.
///
/// Transactions without a category are grouped under "Other". Categories with
/// the same total are ordered by name.
pub(crate) fn expense_by_category(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: HashMap<&str, f64> = HashMap::new();

    for transaction in transactions
        .iter()
        .filter(|transaction| transaction.type_ == TransactionType::Expense)
    {
        *totals.entry(transaction.category_label()).or_insert(0.0) += transaction.amount;
    }

    let mut categories: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_owned(),
            total,
        })
        .collect();

    categories.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });

    categories
}

/// The total amount of money that moved in either direction.
pub(crate) fn total_turnover(transactions: &[Transaction]) -> f64 {
    transactions
        .iter()
        .map(|transaction| transaction.amount)
        .sum()
}
