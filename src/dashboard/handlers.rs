//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - The route handler for displaying the dashboard
//! - HTML view functions for rendering the dashboard UI
//! - The state used by the handler

use std::sync::Arc;

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, Error,
    cache::TransactionCache,
    card::{CardInfo, CardPreferences, card_widget},
    dashboard::{
        aggregation::{
            Totals, calculate_totals, expense_by_category, monthly_series, total_turnover,
        },
        cards::{summary_cards_view, turnover_view},
        charts::{
            DashboardChart, charts_script, charts_view, expense_category_chart,
            money_flow_chart, monthly_trend_chart,
        },
        filter_form::filter_form,
    },
    endpoints,
    export::EXPORT_FILE_NAME,
    html::{
        BUTTON_DELETE_STYLE, ECHARTS_URL, HeadElement, LINK_STYLE, PAGE_CONTAINER_STYLE, base,
        loading_spinner,
    },
    navigation::NavBar,
    session::{Session, greeting},
    timezone::local_now,
    transaction::{
        FilterCriteria, ListState, Transaction, filter_transactions, transaction_list,
    },
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The signed-in user.
    pub session: Session,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The current user's transactions.
    pub cache: Arc<TransactionCache>,
    /// The card shown next to the charts.
    pub cards: CardPreferences,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            session: state.session.clone(),
            local_timezone: state.local_timezone.clone(),
            cache: state.cache.clone(),
            cards: state.cards.clone(),
        }
    }
}

/// Holds all the data needed to render the dashboard.
struct DashboardData<'a> {
    greeting: String,
    criteria: &'a FilterCriteria,
    totals: Totals,
    turnover: f64,
    charts: Vec<DashboardChart>,
    card: CardInfo,
    transactions: Vec<Transaction>,
    list_state: ListState,
    loading: bool,
}

/// Display a page with an overview of the user's transactions.
///
/// The summary cards, charts and list all reflect the filters in the query
/// string.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Query(criteria): Query<FilterCriteria>,
) -> Result<Response, Error> {
    let now = local_now(&state.local_timezone)?;
    let card = state.cards.current()?;
    let snapshot = state.cache.current();

    let transactions = filter_transactions(&snapshot.transactions, &criteria);
    let list_state = ListState::new(
        snapshot.loading,
        snapshot.transactions.len(),
        transactions.len(),
    );

    let data = DashboardData {
        greeting: format!(
            "{}, {}",
            greeting(now.hour()),
            state.session.first_name()
        ),
        criteria: &criteria,
        totals: calculate_totals(&transactions),
        turnover: total_turnover(&transactions),
        charts: build_dashboard_charts(&transactions),
        card,
        transactions,
        list_state,
        loading: snapshot.loading,
    };

    Ok(dashboard_view(NavBar::new(endpoints::DASHBOARD_VIEW), data).into_response())
}

/// Creates the dashboard charts from the filtered transactions.
///
/// Charts that would have nothing to plot are left out.
fn build_dashboard_charts(transactions: &[Transaction]) -> Vec<DashboardChart> {
    if transactions.is_empty() {
        return Vec::new();
    }

    let mut charts = Vec::with_capacity(3);

    let months = monthly_series(transactions);
    if !months.is_empty() {
        charts.push(DashboardChart {
            id: "monthly-trend-chart",
            options: monthly_trend_chart(&months).to_string(),
        });
    }

    charts.push(DashboardChart {
        id: "money-flow-chart",
        options: money_flow_chart(&calculate_totals(transactions)).to_string(),
    });

    let categories = expense_by_category(transactions);
    if !categories.is_empty() {
        charts.push(DashboardChart {
            id: "expense-category-chart",
            options: expense_category_chart(&categories).to_string(),
        });
    }

    charts
}

fn export_url(criteria: &FilterCriteria) -> String {
    match serde_urlencoded::to_string(criteria) {
        Ok(query) => format!("{}?{query}", endpoints::EXPORT_TRANSACTIONS),
        Err(error) => {
            tracing::error!("could not encode filters for export link: {error}");
            endpoints::EXPORT_TRANSACTIONS.to_owned()
        }
    }
}

fn no_charts_view(loading: bool) -> Markup {
    html! {
        div
            id="charts"
            class="w-full flex flex-col items-center justify-center min-h-[200px] rounded bg-white dark:bg-gray-800 shadow-md p-6 text-center"
        {
            @if loading {
                p { (loading_spinner()) "Loading your dashboard..." }
            } @else {
                h3 class="text-lg font-semibold" { "No Analytics Data" }
                p class="text-sm text-gray-600 dark:text-gray-400"
                {
                    "Add transactions to see income vs expense charts and spending trends."
                }
            }
        }
    }
}

/// The export link and reset button above the transaction list.
fn list_actions_view(data: &DashboardData) -> Markup {
    let export_url = export_url(data.criteria);

    html! {
        div class="flex flex-wrap items-center gap-4"
        {
            a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE) { "Add Transaction" }

            @if data.transactions.is_empty() {
                // Nothing to download, ask the server so it can explain why.
                button
                    id="export-button"
                    type="button"
                    hx-get=(export_url)
                    hx-target-error="#alert-container"
                    class=(LINK_STYLE)
                {
                    "Export CSV"
                }
            } @else {
                a id="export-link" href=(export_url) download=(EXPORT_FILE_NAME) class=(LINK_STYLE)
                {
                    "Export CSV"
                }
            }

            button
                id="reset-button"
                type="button"
                hx-delete=(endpoints::TRANSACTIONS_API)
                hx-confirm="This will permanently delete ALL your transactions. Are you absolutely sure?"
                hx-target-error="#alert-container"
                class=(BUTTON_DELETE_STYLE)
            {
                "Reset All"
            }
        }
    }
}

/// Renders the main dashboard page.
fn dashboard_view(nav_bar: NavBar, data: DashboardData) -> Markup {
    let nav_bar = nav_bar.into_html();
    let charts = if data.charts.is_empty() {
        no_charts_view(data.loading)
    } else {
        charts_view(&data.charts)
    };
    let list_actions = list_actions_view(&data);

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            header class="w-full mb-6"
            {
                h1 id="greeting" class="text-3xl font-bold tracking-tight" { (data.greeting) }
            }

            (summary_cards_view(&data.totals))

            div class="w-full grid grid-cols-1 lg:grid-cols-3 gap-4 mb-8"
            {
                div class="lg:col-span-2"
                {
                    @if !data.transactions.is_empty() {
                        (turnover_view(data.turnover))
                    }

                    (charts)
                }

                div { (card_widget(&data.card)) }
            }

            section id="transactions" class="w-full space-y-4"
            {
                header class="flex justify-between flex-wrap items-end gap-2"
                {
                    h2 class="text-xl font-bold" { "Transactions" }
                    (list_actions)
                }

                (filter_form(data.criteria))

                (transaction_list(&data.transactions, data.list_state))
            }
        }
    );

    let scripts = if data.charts.is_empty() {
        Vec::new()
    } else {
        vec![
            HeadElement::ScriptLink(ECHARTS_URL.to_owned()),
            charts_script(&data.charts),
        ]
    };

    base("Dashboard", &scripts, &content)
}
