//! Defines the endpoint for creating a new transaction.

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;

use crate::{
    AppState, Error,
    dates::now_millis,
    endpoints,
    session::Session,
    transaction::{
        controller::{FormController, SubmitOutcome, TransactionFormFields},
        form::{FormAction, transaction_form},
        store::TransactionStore,
    },
};

/// The state needed to write the current user's transactions.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The signed-in user.
    pub session: Session,
    /// Where transactions are written.
    pub store: TransactionStore,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            session: state.session.clone(),
            store: state.store.clone(),
        }
    }
}

/// A route handler for creating a new transaction, redirects to the dashboard on success.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    Form(fields): Form<TransactionFormFields>,
) -> Response {
    let mut controller = FormController::new();
    controller.open_create();
    controller.set_fields(fields);

    submit_form(controller, FormAction::Create, &state)
}

/// Submit `controller` and turn the outcome into a response.
///
/// Validation errors re-render the form with a 422 so htmx swaps it in place.
pub(super) fn submit_form(
    mut controller: FormController,
    action: FormAction<'_>,
    state: &TransactionState,
) -> Response {
    match controller.submit(&state.session, now_millis(), &state.store) {
        Ok(SubmitOutcome::Created(id)) => {
            tracing::info!("user {} created transaction {id}", state.session.user_id);
            redirect_to_dashboard()
        }
        Ok(SubmitOutcome::Updated(id)) => {
            tracing::info!("user {} updated transaction {id}", state.session.user_id);
            redirect_to_dashboard()
        }
        Err(Error::InvalidTransaction(error)) => {
            tracing::debug!("rejected transaction form: {error}");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                transaction_form(controller.fields(), controller.error(), action),
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("could not save transaction: {error}");
            error.into_alert_response()
        }
    }
}

pub(super) fn redirect_to_dashboard() -> Response {
    (
        HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::{extract::State, http::StatusCode};
    use axum_extra::extract::Form;
    use rusqlite::Connection;

    use crate::{
        endpoints,
        realtime::RealtimeDb,
        session::{Session, UserId},
        test_utils::{
            assert_form_error_message, assert_form_input_with_value, assert_hx_redirect,
            must_get_form, parse_html_fragment,
        },
        transaction::{
            controller::TransactionFormFields,
            core::{Transaction, TransactionType},
            store::{TRANSACTIONS_COLLECTION, TransactionStore},
            transactions_from_snapshot,
        },
    };

    use super::{TransactionState, create_transaction_endpoint};

    fn get_test_state() -> TransactionState {
        let db = RealtimeDb::new(Connection::open_in_memory().unwrap()).unwrap();

        TransactionState {
            session: Session::new(UserId::new("alice"), "Alice Jones"),
            store: TransactionStore::new(db),
        }
    }

    fn stored_transactions(state: &TransactionState) -> Vec<Transaction> {
        let snapshot = state
            .store
            .db()
            .get(TRANSACTIONS_COLLECTION, None)
            .unwrap();

        transactions_from_snapshot(&snapshot)
    }

    #[tokio::test]
    async fn can_create_transaction() {
        let state = get_test_state();
        let fields = TransactionFormFields {
            title: "Salary".to_owned(),
            amount: "3000".to_owned(),
            type_: TransactionType::Income,
            category: "Work".to_owned(),
            date: "2024-02-01".to_owned(),
        };

        let response = create_transaction_endpoint(State(state.clone()), Form(fields)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::DASHBOARD_VIEW);
        let transactions = stored_transactions(&state);
        assert_eq!(transactions.len(), 1);
        let transaction = &transactions[0];
        assert_eq!(transaction.title, "Salary");
        assert_eq!(transaction.amount, 3000.0);
        assert_eq!(transaction.type_, TransactionType::Income);
        assert_eq!(transaction.category.as_deref(), Some("Work"));
        assert_eq!(transaction.date.as_deref(), Some("2024-02-01"));
        assert_eq!(transaction.user_id, UserId::new("alice"));
        assert!(transaction.created_at > 0);
    }

    #[tokio::test]
    async fn invalid_form_is_returned_with_error() {
        let state = get_test_state();
        let fields = TransactionFormFields {
            title: "Coffee".to_owned(),
            amount: "0".to_owned(),
            date: "2024-02-01".to_owned(),
            ..Default::default()
        };

        let response = create_transaction_endpoint(State(state.clone()), Form(fields)).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_form_error_message(&form, "Please enter a valid amount greater than 0.");
        assert_form_input_with_value(&form, "title", "text", "Coffee");
        assert!(stored_transactions(&state).is_empty());
    }
}
