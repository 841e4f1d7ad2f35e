//! Alert messages shown in the corner of the page after an htmx request.
//!
//! An alert replaces the page's `#alert-container` out-of-band, so it can be
//! returned from any endpoint regardless of the element the request targets.

use maud::{Markup, html};

/// An error message with optional details.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub message: String,
    pub details: String,
}

impl Alert {
    /// Render the alert as a replacement for the alert container.
    pub fn into_html(self) -> Markup {
        let Alert { message, details } = self;

        html! {
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div
                    class="p-4 mb-4 rounded-lg border border-red-300 bg-red-50 \
                    text-red-800 dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
                    role="alert"
                {
                    div class="flex items-start justify-between gap-4"
                    {
                        p class="font-semibold" { (message) }

                        button
                            type="button"
                            aria-label="Dismiss"
                            class="bg-transparent border-none cursor-pointer"
                            onclick="this.closest('#alert-container').classList.add('hidden')"
                        {
                            "×"
                        }
                    }

                    @if !details.is_empty() {
                        p class="mt-1 text-sm" { (details) }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::Alert;

    #[test]
    fn alert_replaces_container() {
        let markup = Alert {
            message: "Could not save".to_owned(),
            details: "Try again.".to_owned(),
        }
        .into_html()
        .into_string();

        let html = Html::parse_fragment(&markup);
        let container = html
            .select(&Selector::parse("#alert-container").unwrap())
            .next()
            .expect("alert container missing");
        assert_eq!(container.value().attr("hx-swap-oob"), Some("true"));

        let text = container.text().collect::<String>();
        assert!(text.contains("Could not save"));
        assert!(text.contains("Try again."));
    }

    #[test]
    fn empty_details_are_omitted() {
        let markup = Alert {
            message: "Saved".to_owned(),
            details: String::new(),
        }
        .into_html()
        .into_string();

        let html = Html::parse_fragment(&markup);
        let paragraphs = html.select(&Selector::parse("p").unwrap()).count();
        assert_eq!(paragraphs, 1);
    }
}
