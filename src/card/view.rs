use maud::{Markup, html};

use crate::{
    card::core::{CardForm, CardInfo, CardValidationError},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, link,
        loading_spinner,
    },
};

/// The card as it appears on the dashboard.
pub fn card_widget(card: &CardInfo) -> Markup {
    html! {
        div class="w-full rounded-lg bg-white dark:bg-gray-800 p-6 shadow-md"
        {
            div class="flex justify-between items-baseline mb-4"
            {
                h3 class="text-xl font-semibold" { "My Card" }
                (link(endpoints::EDIT_CARD_VIEW, "Edit card"))
            }

            div
                id="card-widget"
                class="rounded-xl p-6 text-white bg-gradient-to-br from-blue-600 to-indigo-800 shadow-lg"
            {
                p class="text-lg tracking-widest mb-3" { "**** **** **** " (card.last_four) }

                div class="flex justify-between text-xs uppercase tracking-wider"
                {
                    span { (card.name) }
                    span class="font-mono" { (card.expiry) }
                }
            }
        }
    }
}

/// The card form, with the message from a rejected submission if there is one.
pub fn card_form(fields: &CardForm, error: Option<&CardValidationError>) -> Markup {
    let spinner = loading_spinner();

    html! {
        form
            hx-put=(endpoints::CARD_API)
            hx-target-422="this"
            hx-target-error="#alert-container"
            hx-swap="outerHTML"
            class="w-full space-y-4 md:space-y-6"
        {
            h2 class="text-xl font-bold" { "Update Card Details" }

            p class="text-sm text-gray-600 dark:text-gray-400" { "Set your card display information." }

            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Cardholder Name" }

                input
                    name="name"
                    id="name"
                    type="text"
                    placeholder="e.g. John Doe"
                    required
                    autofocus
                    value=(fields.name)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="last_four" class=(FORM_LABEL_STYLE) { "Last 4 Digits" }

                input
                    name="last_four"
                    id="last_four"
                    type="text"
                    inputmode="numeric"
                    placeholder="e.g. 1234"
                    maxlength="4"
                    required
                    value=(fields.last_four)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="expiry" class=(FORM_LABEL_STYLE) { "Expiry" }

                input
                    name="expiry"
                    id="expiry"
                    type="text"
                    placeholder="MM/YY"
                    required
                    value=(fields.expiry)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if let Some(error) = error {
                p id="form-error" class=(FORM_ERROR_STYLE) { (error) }
            }

            button type="submit" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span id="indicator" class="inline htmx-indicator" { (spinner) }
                " Update Card"
            }

            (link(endpoints::DASHBOARD_VIEW, "Cancel"))
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::Html;

    use crate::{
        card::core::{CardForm, CardInfo, CardValidationError},
        endpoints,
        test_utils::{
            assert_form_error_message, assert_form_input_with_value, assert_hx_endpoint,
            must_get_form,
        },
    };

    use super::{card_form, card_widget};

    #[test]
    fn widget_masks_card_number() {
        let html = card_widget(&CardInfo::default()).into_string();

        assert!(html.contains("**** **** **** 5491"));
        assert!(html.contains("James Smith"));
        assert!(html.contains("12/28"));
    }

    #[test]
    fn form_is_prefilled_and_shows_error() {
        let fields = CardForm::from_card(&CardInfo::default());

        let html = Html::parse_fragment(
            &card_form(&fields, Some(&CardValidationError::InvalidLastFour)).into_string(),
        );

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::CARD_API, "hx-put");
        assert_form_input_with_value(&form, "name", "text", "James Smith");
        assert_form_input_with_value(&form, "last_four", "text", "5491");
        assert_form_input_with_value(&form, "expiry", "text", "12/28");
        assert_form_error_message(&form, "Last four digits must be exactly 4 numbers.");
    }
}
