//! HTML rendering for the dashboard's transaction list.

use maud::{Markup, html};

use crate::{
    dates::format_display_date,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, CATEGORY_BADGE_STYLE, LINK_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency, loading_spinner,
    },
    transaction::core::{Transaction, TransactionType},
};

/// What the list should show when there are no rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ListState {
    /// The first snapshot has not arrived yet.
    Loading,
    /// The user has no transactions at all.
    NoTransactions,
    /// The user has transactions, but the filters hide all of them.
    NoMatches,
    /// There are rows to show.
    Ready,
}

impl ListState {
    /// Work out the list state from the cache and the filtered rows.
    pub fn new(loading: bool, total: usize, shown: usize) -> Self {
        match (loading, total, shown) {
            (true, _, _) => ListState::Loading,
            (false, 0, _) => ListState::NoTransactions,
            (false, _, 0) => ListState::NoMatches,
            _ => ListState::Ready,
        }
    }
}

fn amount_class(type_: TransactionType) -> &'static str {
    match type_ {
        TransactionType::Income => "text-green-700 dark:text-green-300",
        TransactionType::Expense => "text-red-700 dark:text-red-300",
    }
}

fn signed_amount(transaction: &Transaction) -> String {
    let sign = match transaction.type_ {
        TransactionType::Income => "+",
        TransactionType::Expense => "-",
    };

    format!("{sign}{}", format_currency(transaction.amount.abs()))
}

/// The table of `transactions`, or a message explaining why it is empty.
pub fn transaction_list(transactions: &[Transaction], state: ListState) -> Markup {
    html! {
        div class="overflow-x-auto rounded bg-white dark:bg-gray-800 shadow-md"
        {
            table id="transactions-table" class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Title" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class="px-6 py-4 text-right" { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @for transaction in transactions {
                        (transaction_row_view(transaction))
                    }

                    @if state != ListState::Ready {
                        tr
                        {
                            td colspan="5" data-empty-state="true" class="px-6 py-4 text-center"
                            {
                                (empty_message(state))
                            }
                        }
                    }
                }
            }
        }
    }
}

fn empty_message(state: ListState) -> Markup {
    match state {
        ListState::Loading => html! {
            span class="inline-flex items-center gap-2"
            {
                (loading_spinner())
                "Loading transactions..."
            }
        },
        ListState::NoTransactions => html! {
            p class="font-semibold text-gray-900 dark:text-white" { "No Transactions Yet" }
            p
            {
                "Start tracking your finances by adding your first income or expense transaction. "
                a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE) { "Add a transaction" }
            }
        },
        ListState::NoMatches => html! { "No transactions match your filters." },
        ListState::Ready => html! {},
    }
}

fn transaction_row_view(transaction: &Transaction) -> Markup {
    let edit_url = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, &transaction.id);
    let delete_url = format_endpoint(endpoints::TRANSACTION, &transaction.id);
    let confirm_message = format!(
        "Are you sure you want to delete the transaction '{}'? This cannot be undone.",
        transaction.title
    );

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-row="true"
        {
            td class=(TABLE_CELL_STYLE)
            {
                @match transaction.date_str() {
                    Some(date) => {
                        time datetime=(date) { (format_display_date(Some(date))) }
                    }
                    None => { "-" }
                }
            }
            td class="px-6 py-4 font-medium text-gray-900 dark:text-white" { (transaction.title) }
            td class=(TABLE_CELL_STYLE)
            {
                span class=(CATEGORY_BADGE_STYLE) { (transaction.category_label()) }
            }
            td class={ "px-6 py-4 text-right tabular-nums " (amount_class(transaction.type_)) }
            {
                (signed_amount(transaction))
            }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    a href=(edit_url) class=(LINK_STYLE) { "Edit" }

                    button
                        type="button"
                        hx-delete=(delete_url)
                        hx-confirm=(confirm_message)
                        hx-target-error="#alert-container"
                        class=(BUTTON_DELETE_STYLE)
                    {
                        "Delete"
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
        session::UserId,
        test_utils::assert_valid_html,
        transaction::core::{Transaction, TransactionType},
    };

    use super::{ListState, transaction_list};

    fn transaction(id: &str, title: &str, type_: TransactionType, amount: f64) -> Transaction {
        Transaction {
            id: id.to_owned(),
            title: title.to_owned(),
            amount,
            type_,
            category: None,
            date: Some("2024-01-15".to_owned()),
            notes: None,
            user_id: UserId::new("alice"),
            created_at: 0,
        }
    }

    fn render(transactions: &[Transaction], state: ListState) -> Html {
        let html = Html::parse_fragment(&transaction_list(transactions, state).into_string());
        assert_valid_html(&html);
        html
    }

    fn empty_state_text(html: &Html) -> Option<String> {
        html.select(&Selector::parse("[data-empty-state]").unwrap())
            .next()
            .map(|cell| cell.text().collect::<String>().trim().to_owned())
    }

    #[test]
    fn list_state_follows_counts() {
        assert_eq!(ListState::new(true, 3, 3), ListState::Loading);
        assert_eq!(ListState::new(false, 0, 0), ListState::NoTransactions);
        assert_eq!(ListState::new(false, 3, 0), ListState::NoMatches);
        assert_eq!(ListState::new(false, 3, 1), ListState::Ready);
    }

    #[test]
    fn renders_rows_with_actions() {
        let transactions = [
            transaction("a1", "Salary", TransactionType::Income, 3000.0),
            transaction("b2", "Groceries", TransactionType::Expense, 42.5),
        ];

        let html = render(&transactions, ListState::Ready);

        let rows: Vec<_> = html
            .select(&Selector::parse("tr[data-transaction-row]").unwrap())
            .collect();
        assert_eq!(rows.len(), 2);
        let first_row = rows[0].text().collect::<String>();
        assert!(first_row.contains("Salary"));
        assert!(first_row.contains("+$3,000.00"));
        assert!(first_row.contains("Other"));
        assert!(first_row.contains("15 Jan 2024"), "got {first_row}");
        let second_row = rows[1].text().collect::<String>();
        assert!(second_row.contains("-$42.50"));

        let edit = rows[0]
            .select(&Selector::parse("a").unwrap())
            .next()
            .unwrap();
        assert_eq!(edit.value().attr("href"), Some("/transactions/a1/edit"));
        let delete = rows[1]
            .select(&Selector::parse("button").unwrap())
            .next()
            .unwrap();
        assert_eq!(delete.value().attr("hx-delete"), Some("/api/transactions/b2"));
        assert!(delete.value().attr("hx-confirm").is_some());
        assert_eq!(empty_state_text(&html), None);
    }

    #[test]
    fn explains_empty_list() {
        let cases = [
            (ListState::Loading, "Loading transactions..."),
            (ListState::NoMatches, "No transactions match your filters."),
        ];

        for (state, want) in cases {
            let html = render(&[], state);

            assert_eq!(empty_state_text(&html).as_deref(), Some(want));
        }

        let html = render(&[], ListState::NoTransactions);
        assert!(
            empty_state_text(&html)
                .unwrap()
                .starts_with("No Transactions Yet")
        );
    }
}
