//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and how it is decoded from store snapshots
//! - The store functions for creating, updating and deleting transactions
//! - The filter engine and the form controller
//! - View handlers and endpoints for the transaction pages and list

mod controller;
mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod filter;
mod form;
mod list;
mod store;

pub use controller::ValidationError;
pub use core::{Transaction, TransactionType, transactions_from_snapshot};
pub use create_endpoint::create_transaction_endpoint;
pub use create_page::get_new_transaction_page;
pub use delete_endpoint::{delete_all_transactions_endpoint, delete_transaction_endpoint};
pub use edit_endpoint::edit_transaction_endpoint;
pub use edit_page::get_edit_transaction_page;
pub use filter::{FilterCriteria, TypeFilter, filter_transactions};
pub use list::{ListState, transaction_list};
pub use store::TransactionStore;
