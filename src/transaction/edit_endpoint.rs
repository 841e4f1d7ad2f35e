//! Defines the endpoint for updating an existing transaction.

use axum::{
    extract::{Path, State},
    response::Response,
};
use axum_extra::extract::Form;

use crate::{
    Error,
    transaction::{
        controller::{FormController, TransactionFormFields},
        create_endpoint::{TransactionState, submit_form},
        form::FormAction,
    },
};

/// A route handler for updating a transaction, redirects to the dashboard on success.
///
/// The owner, creation time and notes of the transaction are kept. A
/// transaction that is missing, or owned by another user, cannot be updated.
pub async fn edit_transaction_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<String>,
    Form(fields): Form<TransactionFormFields>,
) -> Response {
    let original = match state.store.get(&transaction_id) {
        Ok(transaction) if transaction.user_id == state.session.user_id => transaction,
        Ok(_) | Err(Error::NotFound) => {
            tracing::warn!("tried to update missing transaction {transaction_id}");
            return Error::UpdateMissingTransaction.into_alert_response();
        }
        Err(error) => {
            tracing::error!("could not get transaction {transaction_id}: {error}");
            return error.into_alert_response();
        }
    };

    let mut controller = FormController::new();
    controller.open_edit(original);
    controller.set_fields(fields);

    submit_form(controller, FormAction::Edit(&transaction_id), &state)
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use axum_extra::extract::Form;
    use rusqlite::Connection;

    use crate::{
        endpoints,
        realtime::RealtimeDb,
        session::{Session, UserId},
        test_utils::{
            assert_form_error_message, assert_hx_endpoint, assert_hx_redirect, must_get_form,
            parse_html_fragment,
        },
        transaction::{
            controller::TransactionFormFields,
            core::{Transaction, TransactionType},
            create_endpoint::TransactionState,
            store::TransactionStore,
        },
    };

    use super::edit_transaction_endpoint;

    fn get_test_state() -> TransactionState {
        let db = RealtimeDb::new(Connection::open_in_memory().unwrap()).unwrap();

        TransactionState {
            session: Session::new(UserId::new("alice"), "Alice Jones"),
            store: TransactionStore::new(db),
        }
    }

    fn create_rent(state: &TransactionState, owner: &str) -> String {
        state
            .store
            .create(
                Transaction::build(
                    "Rent",
                    950.0,
                    TransactionType::Expense,
                    "2024-03-01",
                    UserId::new(owner),
                )
                .notes(Some("monthly".to_owned()))
                .created_at(42),
            )
            .unwrap()
    }

    fn new_fields() -> TransactionFormFields {
        TransactionFormFields {
            title: "Rent (March)".to_owned(),
            amount: "975.50".to_owned(),
            type_: TransactionType::Expense,
            category: "Housing".to_owned(),
            date: "2024-03-02".to_owned(),
        }
    }

    #[tokio::test]
    async fn can_update_transaction() {
        let state = get_test_state();
        let id = create_rent(&state, "alice");

        let response =
            edit_transaction_endpoint(State(state.clone()), Path(id.clone()), Form(new_fields()))
                .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::DASHBOARD_VIEW);
        let updated = state.store.get(&id).unwrap();
        assert_eq!(
            updated,
            Transaction {
                id: id.clone(),
                title: "Rent (March)".to_owned(),
                amount: 975.5,
                type_: TransactionType::Expense,
                category: Some("Housing".to_owned()),
                date: Some("2024-03-02".to_owned()),
                notes: Some("monthly".to_owned()),
                user_id: UserId::new("alice"),
                created_at: 42,
            }
        );
    }

    #[tokio::test]
    async fn invalid_update_returns_form() {
        let state = get_test_state();
        let id = create_rent(&state, "alice");
        let fields = TransactionFormFields {
            title: "   ".to_owned(),
            ..new_fields()
        };

        let response =
            edit_transaction_endpoint(State(state.clone()), Path(id.clone()), Form(fields)).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, &format!("/api/transactions/{id}"), "hx-put");
        assert_form_error_message(&form, "Title is required.");
        assert_eq!(state.store.get(&id).unwrap().title, "Rent");
    }

    #[tokio::test]
    async fn missing_transaction_is_not_updated() {
        let state = get_test_state();

        let response = edit_transaction_endpoint(
            State(state.clone()),
            Path("missing".to_owned()),
            Form(new_fields()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(state.store.get("missing").is_err());
    }

    #[tokio::test]
    async fn cannot_update_other_users_transaction() {
        let state = get_test_state();
        let id = create_rent(&state, "bob");

        let response =
            edit_transaction_endpoint(State(state.clone()), Path(id.clone()), Form(new_fields()))
                .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(state.store.get(&id).unwrap().title, "Rent");
    }
}
