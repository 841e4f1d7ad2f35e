//! Dashboard module
//!
//! Provides the landing page: a greeting, summary cards and charts for the
//! filtered transactions, the dashboard card and the transaction list.

mod aggregation;
mod cards;
mod charts;
mod filter_form;
mod handlers;

pub use handlers::get_dashboard_page;
