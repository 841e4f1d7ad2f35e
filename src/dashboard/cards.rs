//! Summary cards for the top of the dashboard.

use maud::{Markup, html};

use crate::{dashboard::aggregation::Totals, html::format_currency};

const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg p-4 shadow-md flex flex-col gap-1";
const LABEL_STYLE: &str = "text-sm text-gray-600 dark:text-gray-400";

fn signed_class(value: f64) -> &'static str {
    if value < 0.0 {
        "text-red-700 dark:text-red-300"
    } else {
        "text-green-700 dark:text-green-300"
    }
}

fn summary_card(id: &str, label: &str, value: f64, value_class: &str) -> Markup {
    html! {
        div id=(id) class=(CARD_STYLE)
        {
            p class=(LABEL_STYLE) { (label) }
            p class={ "text-2xl font-bold tabular-nums " (value_class) }
            {
                (format_currency(value))
            }
        }
    }
}

/// The balance, income, expense and net profit of the filtered transactions.
///
/// Net profit is the same figure as the balance.
pub(super) fn summary_cards_view(totals: &Totals) -> Markup {
    html! {
        section class="w-full grid grid-cols-2 lg:grid-cols-4 gap-4 mb-4"
        {
            (summary_card("total-balance", "Total Balance", totals.balance, "text-gray-900 dark:text-white"))
            (summary_card("total-income", "Total Income", totals.income, "text-green-700 dark:text-green-300"))
            (summary_card("total-expense", "Total Expense", totals.expense, "text-red-700 dark:text-red-300"))
            (summary_card("net-profit", "Net Profit", totals.balance, signed_class(totals.balance)))
        }
    }
}

/// The headline figure above the charts: every amount added up, whichever
/// direction it moved.
pub(super) fn turnover_view(turnover: f64) -> Markup {
    html! {
        div id="money-moved" class="w-full mb-4 text-center"
        {
            p class="text-3xl font-bold tabular-nums" { (format_currency(turnover)) }
            p class="text-xs font-semibold uppercase tracking-wider text-gray-600 dark:text-gray-400"
            {
                "Money moved"
            }
        }
    }
}
