//! Defines the route handler for the page for editing the dashboard card.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::html;

use crate::{
    AppState, Error,
    card::{core::CardForm, preferences::CardPreferences, view::card_form},
    endpoints,
    html::{FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
};

/// The state needed to show or save the card.
#[derive(Debug, Clone)]
pub struct CardState {
    pub cards: CardPreferences,
}

impl FromRef<AppState> for CardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cards: state.cards.clone(),
        }
    }
}

/// Renders the card form filled in with the current card.
pub async fn get_edit_card_page(State(state): State<CardState>) -> Result<Response, Error> {
    let card = state.cards.current()?;
    let nav_bar = NavBar::new(endpoints::EDIT_CARD_VIEW).into_html();
    let form = card_form(&CardForm::from_card(&card), None);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            (form)
        }
    };

    Ok(base("Edit Card", &[], &content).into_response())
}
