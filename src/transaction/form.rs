use maud::{Markup, html};

use crate::{
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE,
        FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, loading_spinner,
    },
    transaction::{
        controller::{TransactionFormFields, ValidationError},
        core::TransactionType,
    },
};

/// Where the transaction form sends its values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormAction<'a> {
    /// POST a new transaction.
    Create,
    /// PUT changes to the transaction with this ID.
    Edit(&'a str),
}

/// The transaction form with `fields` filled in.
///
/// A 422 response replaces the form in place so the validation message shows
/// up next to the fields. Any other error goes to the alert container.
pub fn transaction_form(
    fields: &TransactionFormFields,
    error: Option<&ValidationError>,
    action: FormAction<'_>,
) -> Markup {
    let spinner = loading_spinner();
    let (heading, submit_text) = match action {
        FormAction::Create => ("Add New Transaction", "Add Transaction"),
        FormAction::Edit(_) => ("Edit Transaction", "Save Changes"),
    };
    let edit_endpoint = match action {
        FormAction::Create => None,
        FormAction::Edit(id) => Some(format_endpoint(endpoints::TRANSACTION, id)),
    };
    let create_endpoint = edit_endpoint.is_none().then_some(endpoints::TRANSACTIONS_API);

    html! {
        form
            hx-post=[create_endpoint]
            hx-put=[edit_endpoint]
            hx-target-422="this"
            hx-target-error="#alert-container"
            hx-swap="outerHTML"
            class="w-full space-y-4 md:space-y-6"
        {
            h2 class="text-xl font-bold" { (heading) }

            div
            {
                label for="title" class=(FORM_LABEL_STYLE) { "Title" }

                input
                    name="title"
                    id="title"
                    type="text"
                    placeholder="e.g. Salary, Grocery shopping"
                    required
                    autofocus
                    value=(fields.title)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                // w-full needed to ensure input takes the full width when prefilled with a value
                div class="input-wrapper w-full"
                {
                    input
                        name="amount"
                        id="amount"
                        type="number"
                        step="0.01"
                        min="0"
                        placeholder="Enter amount"
                        required
                        value=(fields.amount)
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            (type_fieldset(fields.type_))

            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                input
                    name="category"
                    id="category"
                    type="text"
                    placeholder="e.g. Food, Rent, Travel"
                    value=(fields.category)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                input
                    name="date"
                    id="date"
                    type="date"
                    required
                    value=(fields.date)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if let Some(error) = error {
                p id="form-error" class=(FORM_ERROR_STYLE) { (error) }
            }

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span id="indicator" class="inline htmx-indicator" { (spinner) }
                " " (submit_text)
            }

            a href=(endpoints::DASHBOARD_VIEW) class=(BUTTON_SECONDARY_STYLE) role="button"
            {
                "Cancel"
            }
        }
    }
}

fn type_fieldset(selected: TransactionType) -> Markup {
    let is_expense = selected == TransactionType::Expense;

    html! {
        fieldset class="space-y-2"
        {
            legend class=(FORM_LABEL_STYLE) { "Type" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                div class="flex items-center gap-3"
                {
                    input
                        name="type"
                        id="transaction-type-expense"
                        type="radio"
                        value="expense"
                        checked[is_expense]
                        required
                        tabindex="0"
                        class=(FORM_RADIO_INPUT_STYLE);

                    label for="transaction-type-expense" class=(FORM_RADIO_LABEL_STYLE)
                    {
                        "Expense"
                    }
                }

                div class="flex items-center gap-3"
                {
                    input
                        name="type"
                        id="transaction-type-income"
                        type="radio"
                        value="income"
                        checked[!is_expense]
                        required
                        tabindex="0"
                        class=(FORM_RADIO_INPUT_STYLE);

                    label for="transaction-type-income" class=(FORM_RADIO_LABEL_STYLE)
                    {
                        "Income"
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::{
        endpoints,
        test_utils::{
            assert_form_error_message, assert_form_input, assert_form_input_with_value,
            assert_form_submit_button_with_text, assert_hx_endpoint, assert_valid_html,
            must_get_form,
        },
        transaction::{
            controller::{TransactionFormFields, ValidationError},
            core::TransactionType,
        },
    };

    use super::{FormAction, transaction_form};

    fn render(
        fields: &TransactionFormFields,
        error: Option<&ValidationError>,
        action: FormAction<'_>,
    ) -> Html {
        Html::parse_fragment(&transaction_form(fields, error, action).into_string())
    }

    #[test]
    fn create_form_posts_blank_fields() {
        let html = render(&TransactionFormFields::blank(), None, FormAction::Create);

        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::TRANSACTIONS_API, "hx-post");
        assert!(form.value().attr("hx-put").is_none());
        assert_form_input(&form, "title", "text");
        assert_form_input(&form, "amount", "number");
        assert_form_input(&form, "date", "date");
        assert_form_submit_button_with_text(&form, "Add Transaction");
    }

    #[test]
    fn edit_form_puts_to_transaction() {
        let fields = TransactionFormFields {
            title: "Rent".to_owned(),
            amount: "950.00".to_owned(),
            type_: TransactionType::Expense,
            category: "Housing".to_owned(),
            date: "2024-03-01".to_owned(),
        };

        let html = render(&fields, None, FormAction::Edit("abc"));

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, "/api/transactions/abc", "hx-put");
        assert!(form.value().attr("hx-post").is_none());
        assert_form_input_with_value(&form, "title", "text", "Rent");
        assert_form_input_with_value(&form, "amount", "number", "950.00");
        assert_form_input_with_value(&form, "date", "date", "2024-03-01");
        assert_form_submit_button_with_text(&form, "Save Changes");
    }

    #[test]
    fn checks_selected_type() {
        let cases = [
            (TransactionType::Expense, "expense"),
            (TransactionType::Income, "income"),
        ];

        for (type_, expected) in cases {
            let fields = TransactionFormFields {
                type_,
                ..Default::default()
            };
            let html = render(&fields, None, FormAction::Create);

            let checked: Vec<&str> = html
                .select(&Selector::parse("input[type=radio][checked]").unwrap())
                .filter_map(|input| input.value().attr("value"))
                .collect();
            assert_eq!(checked, vec![expected]);
        }
    }

    #[test]
    fn shows_validation_message() {
        let html = render(
            &TransactionFormFields::blank(),
            Some(&ValidationError::InvalidAmount),
            FormAction::Create,
        );

        let form = must_get_form(&html);
        assert_form_error_message(&form, "Please enter a valid amount greater than 0.");
    }
}
