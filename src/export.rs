//! Exports the filtered transactions as a CSV file.

use std::sync::Arc;

use axum::{
    extract::{FromRef, Query, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::{
    AppState, Error,
    cache::TransactionCache,
    transaction::{FilterCriteria, Transaction, filter_transactions},
};

/// The name of the downloaded file.
pub const EXPORT_FILE_NAME: &str = "transactions_export.csv";

const HEADER: [&str; 6] = ["Title", "Amount", "Type", "Category", "Date", "Notes"];

/// The state needed to export transactions.
#[derive(Debug, Clone)]
pub struct ExportState {
    /// The current user's transactions.
    pub cache: Arc<TransactionCache>,
}

impl FromRef<AppState> for ExportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cache: state.cache.clone(),
        }
    }
}

/// A route handler that downloads the transactions matching the dashboard
/// filters as CSV.
///
/// If no transactions match, an error alert is returned instead of a file.
pub async fn export_transactions_endpoint(
    State(state): State<ExportState>,
    Query(criteria): Query<FilterCriteria>,
) -> Response {
    let snapshot = state.cache.current();
    let transactions = filter_transactions(&snapshot.transactions, &criteria);

    if transactions.is_empty() {
        tracing::debug!("nothing to export for filters {criteria:?}");
        return Error::NoTransactionsToExport.into_alert_response();
    }

    let csv = match transactions_to_csv(&transactions) {
        Ok(csv) => csv,
        Err(error) => return error.into_alert_response(),
    };

    tracing::info!("exported {} transactions", transactions.len());

    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        csv,
    )
        .into_response()
}

/// Write `transactions` as CSV with a header row.
///
/// Fields are quoted when they contain a comma, a quote or a line break, and
/// quotes inside fields are doubled. Missing categories, dates and notes are
/// written as empty fields.
pub fn transactions_to_csv(transactions: &[Transaction]) -> Result<String, Error> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(HEADER).map_err(csv_error)?;

    for transaction in transactions {
        let amount = transaction.amount.to_string();

        writer
            .write_record([
                transaction.title.as_str(),
                amount.as_str(),
                transaction.type_.as_str(),
                transaction.category.as_deref().unwrap_or_default(),
                transaction.date.as_deref().unwrap_or_default(),
                transaction.notes.as_deref().unwrap_or_default(),
            ])
            .map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::CsvExportError(error.to_string()))?;

    String::from_utf8(bytes).map_err(|error| Error::CsvExportError(error.to_string()))
}

fn csv_error(error: csv::Error) -> Error {
    tracing::error!("could not write CSV record: {error}");
    Error::CsvExportError(error.to_string())
}
