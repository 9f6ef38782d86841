//! Alert messages rendered as HTML fragments for HTMX swaps.
//!
//! Alerts are swapped into the `#alert-container` element of the base page
//! template, either as the error target of a form (`hx-target-error`) or as
//! the response to a delete request.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

/// An alert message to display to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// An error alert with a headline and an explanation of what to do next.
    Error {
        /// The headline of the alert.
        message: String,
        /// The explanation displayed under the headline.
        details: String,
    },
    /// A success alert with only a headline.
    SuccessSimple {
        /// The headline of the alert.
        message: String,
    },
}

impl Alert {
    /// Render the alert as an HTML fragment.
    pub fn into_html(self) -> Markup {
        // Template adapted from https://flowbite.com/docs/components/alerts/
        match self {
            Alert::Error { message, details } => html!(
                div
                    id="alert-container"
                    hx-swap-oob="true"
                    class="w-full max-w-md px-4"
                    style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
                {
                    div
                        role="alert"
                        class="p-4 mb-4 text-red-800 rounded-lg bg-red-50
                        dark:bg-gray-800 dark:text-red-400 shadow-lg"
                    {
                        p class="font-medium" { (message) }

                        @if !details.is_empty() {
                            p { (details) }
                        }
                    }
                }
            ),
            Alert::SuccessSimple { message } => html!(
                div
                    id="alert-container"
                    hx-swap-oob="true"
                    class="w-full max-w-md px-4"
                    style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
                {
                    div
                        role="alert"
                        class="p-4 mb-4 text-green-800 rounded-lg bg-green-50
                        dark:bg-gray-800 dark:text-green-400 shadow-lg"
                    {
                        p class="font-medium" { (message) }
                    }
                }
            ),
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}

#[cfg(test)]
mod alert_tests {
    use super::Alert;

    #[test]
    fn error_alert_contains_message_and_details() {
        let markup = Alert::Error {
            message: "Could not delete expense".to_owned(),
            details: "The expense could not be found.".to_owned(),
        }
        .into_html();

        let html = markup.into_string();
        assert!(html.contains("Could not delete expense"));
        assert!(html.contains("The expense could not be found."));
        assert!(html.contains("role=\"alert\""));
    }

    #[test]
    fn success_alert_contains_message() {
        let markup = Alert::SuccessSimple {
            message: "Expense deleted successfully".to_owned(),
        }
        .into_html();

        assert!(markup.into_string().contains("Expense deleted successfully"));
    }
}
