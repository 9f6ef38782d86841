//! Defines the 404 Not Found page and its route handler.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// A route handler that renders the 404 Not Found page.
pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

/// Render the 404 Not Found page with a 404 status code.
pub fn get_404_not_found_response() -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(
            error_view(
                "Not Found",
                "404",
                "Sorry, the page you are looking for does not exist.",
                "Check the address for typos or head back to the expenses page.",
            )
            .into_string(),
        ),
    )
        .into_response()
}
