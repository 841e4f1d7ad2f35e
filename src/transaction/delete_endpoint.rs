use axum::{
    extract::{Path, State},
    response::Response,
};

use crate::{
    Error,
    transaction::create_endpoint::{TransactionState, redirect_to_dashboard},
};

/// A route handler for deleting a transaction, redirects to the dashboard.
///
/// Deleting a transaction that no longer exists succeeds so that a stale page
/// can still be cleared.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<String>,
) -> Response {
    match state.store.get_owner(&transaction_id) {
        Ok(None) => {
            tracing::debug!("transaction {transaction_id} was already deleted");
            return redirect_to_dashboard();
        }
        Ok(Some(owner)) if owner.as_ref() != Some(&state.session.user_id) => {
            tracing::warn!(
                "user {} tried to delete transaction {transaction_id} owned by {owner:?}",
                state.session.user_id,
            );
            return Error::NotFound.into_alert_response();
        }
        Ok(Some(_)) => {}
        Err(error) => {
            tracing::error!("Could not get transaction {transaction_id}: {error}");
            return error.into_alert_response();
        }
    }

    if let Err(error) = state.store.delete(&transaction_id) {
        tracing::error!("Could not delete transaction {transaction_id}: {error}");
        return error.into_alert_response();
    }

    tracing::info!(
        "user {} deleted transaction {transaction_id}",
        state.session.user_id
    );

    redirect_to_dashboard()
}

/// A route handler for deleting all of the current user's transactions,
/// redirects to the dashboard.
pub async fn delete_all_transactions_endpoint(
    State(state): State<TransactionState>,
) -> Response {
    match state.store.delete_all_for_user(&state.session.user_id) {
        Ok(count) => {
            tracing::info!(
                "user {} deleted all {count} of their transactions",
                state.session.user_id
            );
            redirect_to_dashboard()
        }
        Err(error) => {
            tracing::error!(
                "Could not delete transactions for {}: {error}",
                state.session.user_id
            );
            error.into_alert_response()
        }
    }
}
