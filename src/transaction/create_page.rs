use axum::response::{IntoResponse, Response};
use maud::html;

use crate::{
    endpoints,
    html::{FORM_CONTAINER_STYLE, base, dollar_input_styles},
    navigation::NavBar,
    transaction::{
        controller::FormController,
        form::{FormAction, transaction_form},
    },
};

/// Renders the page for adding a transaction.
pub async fn get_new_transaction_page() -> Response {
    let mut controller = FormController::new();
    controller.open_create();

    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW).into_html();
    let form = transaction_form(controller.fields(), None, FormAction::Create);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            div class="w-full max-w-md" { (form) }
        }
    };

    base("Add Transaction", &[dollar_input_styles()], &content).into_response()
}

#[cfg(test)]
mod tests {
    use crate::{
        endpoints,
        test_utils::{
            assert_form_input, assert_form_input_with_value, assert_form_submit_button_with_text,
            assert_hx_endpoint, assert_status_ok, assert_valid_html, must_get_form,
            parse_html_document,
        },
    };

    use super::get_new_transaction_page;

    #[tokio::test]
    async fn renders_blank_form() {
        let response = get_new_transaction_page().await;

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::TRANSACTIONS_API, "hx-post");
        assert_form_input_with_value(&form, "title", "text", "");
        assert_form_input(&form, "amount", "number");
        assert_form_input(&form, "date", "date");
        assert_form_submit_button_with_text(&form, "Add Transaction");
    }
}
