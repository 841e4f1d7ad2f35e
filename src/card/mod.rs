//! The payment card shown on the dashboard.
//!
//! The card is display text chosen by the user. It is kept in a local JSON
//! file so it can be rendered without waiting for the store.

mod core;
mod edit_endpoint;
mod edit_page;
mod preferences;
mod view;

pub use core::{CardInfo, CardValidationError};
pub use edit_endpoint::update_card_endpoint;
pub use edit_page::get_edit_card_page;
pub use preferences::CardPreferences;
pub use view::card_widget;
