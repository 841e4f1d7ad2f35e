use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use maud::html;

use crate::{
    Error, endpoints,
    html::{FORM_CONTAINER_STYLE, base, dollar_input_styles},
    navigation::NavBar,
    not_found::NotFoundError,
    transaction::{
        controller::FormController,
        create_endpoint::TransactionState,
        form::{FormAction, transaction_form},
    },
};

/// Renders the page for editing a transaction.
///
/// Transactions owned by other users are reported as not found.
pub async fn get_edit_transaction_page(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<String>,
) -> Response {
    let transaction = match state.store.get(&transaction_id) {
        Ok(transaction) if transaction.user_id == state.session.user_id => transaction,
        Ok(_) | Err(Error::NotFound) => return NotFoundError.into_response(),
        Err(error) => {
            tracing::error!("Failed to retrieve transaction {transaction_id}: {error}");
            return error.into_response();
        }
    };

    let mut controller = FormController::new();
    controller.open_edit(transaction);

    let nav_bar = NavBar::new(endpoints::EDIT_TRANSACTION_VIEW).into_html();
    let form = transaction_form(
        controller.fields(),
        None,
        FormAction::Edit(&transaction_id),
    );

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            div class="w-full max-w-md" { (form) }
        }
    };

    base("Edit Transaction", &[dollar_input_styles()], &content).into_response()
}
