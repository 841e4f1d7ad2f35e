//! Defines the endpoint for saving the dashboard card.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;

use crate::{
    card::{core::CardForm, edit_page::CardState, view::card_form},
    endpoints,
};

/// Saves the card and redirects to the dashboard.
///
/// Invalid input is answered with the form and its error message so htmx can
/// swap it in place.
pub async fn update_card_endpoint(
    State(state): State<CardState>,
    Form(form): Form<CardForm>,
) -> Response {
    let card = match form.validate() {
        Ok(card) => card,
        Err(error) => {
            tracing::debug!("rejected card form: {error}");
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                card_form(&form, Some(&error)),
            )
                .into_response();
        }
    };

    if let Err(error) = state.cards.save(card) {
        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::{extract::State, http::StatusCode};
    use axum_extra::extract::Form;
    use rusqlite::Connection;

    use crate::{
        card::{
            core::{CardForm, CardInfo},
            edit_page::CardState,
            preferences::CardPreferences,
        },
        endpoints,
        realtime::RealtimeDb,
        session::UserId,
        test_utils::{
            assert_form_error_message, assert_hx_redirect, must_get_form, parse_html_fragment,
        },
    };

    use super::update_card_endpoint;

    fn get_test_state(dir: &tempfile::TempDir) -> CardState {
        let db = RealtimeDb::new(Connection::open_in_memory().unwrap()).unwrap();

        CardState {
            cards: CardPreferences::load(dir.path().join("card.json"), db, UserId::new("alice")),
        }
    }

    #[tokio::test]
    async fn saves_card_and_redirects() {
        let dir = tempfile::tempdir().unwrap();
        let state = get_test_state(&dir);
        let form = CardForm {
            name: "Ada Lovelace".to_owned(),
            last_four: "1234".to_owned(),
            expiry: "01/30".to_owned(),
        };

        let response = update_card_endpoint(State(state.clone()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::DASHBOARD_VIEW);
        assert_eq!(
            state.cards.current(),
            Ok(CardInfo {
                name: "Ada Lovelace".to_owned(),
                last_four: "1234".to_owned(),
                expiry: "01/30".to_owned(),
            })
        );
    }

    #[tokio::test]
    async fn invalid_card_returns_form_with_error() {
        let dir = tempfile::tempdir().unwrap();
        let state = get_test_state(&dir);
        let form = CardForm {
            name: "Ada Lovelace".to_owned(),
            last_four: "12ab".to_owned(),
            expiry: "01/30".to_owned(),
        };

        let response = update_card_endpoint(State(state.clone()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_form_error_message(&form, "Last four digits must be exactly 4 numbers.");
        assert_eq!(state.cards.current(), Ok(CardInfo::default()));
    }

    #[test]
    fn card_form_decodes_from_url_encoding() {
        let form: CardForm =
            serde_html_form::from_str("name=Ada&last_four=1234&expiry=01%2F30").unwrap();

        assert_eq!(form.expiry, "01/30");
        assert_eq!(form.last_four, "1234");
    }
}
