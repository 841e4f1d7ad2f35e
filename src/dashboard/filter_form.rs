use maud::{Markup, html};

use crate::{
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE},
    transaction::{FilterCriteria, TypeFilter},
};

/// The search and filter controls above the transaction list.
///
/// The form submits with GET so the filters live in the URL and survive a
/// reload.
pub(super) fn filter_form(criteria: &FilterCriteria) -> Markup {
    let type_options = [
        (TypeFilter::All, "all", "All Types"),
        (TypeFilter::Income, "income", "Income"),
        (TypeFilter::Expense, "expense", "Expense"),
    ];

    html! {
        form
            id="filters"
            method="get"
            action=(endpoints::DASHBOARD_VIEW)
            class="w-full grid grid-cols-1 md:grid-cols-2 lg:grid-cols-6 gap-3 items-end
                bg-gray-50 dark:bg-gray-800 p-4 rounded-lg mb-4"
        {
            div class="lg:col-span-2"
            {
                label for="search" class=(FORM_LABEL_STYLE) { "Search" }
                input
                    id="search"
                    name="search"
                    type="search"
                    placeholder="Search transactions..."
                    value=(criteria.search)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="type" class=(FORM_LABEL_STYLE) { "Type" }
                select id="type" name="type" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for (filter, value, label) in type_options {
                        option value=(value) selected[criteria.type_filter == filter] { (label) }
                    }
                }
            }

            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }
                input
                    id="category"
                    name="category"
                    type="text"
                    placeholder="e.g. Food"
                    value=(criteria.category)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="start_date" class=(FORM_LABEL_STYLE) { "From" }
                input
                    id="start_date"
                    name="start_date"
                    type="date"
                    value=(criteria.start_date)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="end_date" class=(FORM_LABEL_STYLE) { "To" }
                input
                    id="end_date"
                    name="end_date"
                    type="date"
                    value=(criteria.end_date)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="lg:col-span-6 flex items-center gap-4"
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Apply Filters" }

                @if criteria.is_active() {
                    a href=(endpoints::DASHBOARD_VIEW) class=(LINK_STYLE) { "Clear" }
                }
            }
        }
    }
}
