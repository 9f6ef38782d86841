//! BukuKas is a single-user web app for keeping a cash-disbursement ledger
//! ("buku kas pengeluaran").
//!
//! Each expense records a date, a job description, an expense description,
//! a quantity, a unit, a unit price, the computed total and a free-form note.
//! Every record is assigned a sequential voucher-style identifier derived
//! from the customer code and the month of the expense. Records can be
//! listed, searched, edited, deleted, exported as CSV and printed as a
//! standalone HTML voucher.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod db;
mod endpoints;
mod expense;
mod html;
mod internal_server_error;
mod navigation;
mod not_found;
mod routing;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use routing::build_router;

use crate::{
    alert::Alert,
    internal_server_error::{InternalServerError, render_internal_server_error},
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An expense was submitted without a customer code.
    ///
    /// The customer code forms the prefix of the transaction ID, so it must
    /// not be empty. The error is reported to the user before anything is
    /// persisted.
    #[error("the customer code must not be empty")]
    EmptyCustomerCode,

    /// An expense was submitted with a unit label outside the fixed set.
    #[error("\"{0}\" is not a valid unit")]
    InvalidUnit(String),

    /// An expense was submitted with a quantity below one.
    #[error("the quantity must be at least 1, got {0}")]
    InvalidQuantity(i64),

    /// An expense was submitted with a negative unit price.
    #[error("the unit price must not be negative, got {0}")]
    InvalidUnitPrice(i64),

    /// The total price does not fit in a 64-bit integer.
    #[error("the total price is too large")]
    TotalPriceOverflow,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to delete an expense that does not exist
    #[error("tried to delete an expense that is not in the database")]
    DeleteMissingExpense,

    /// Tried to update an expense that does not exist
    #[error("tried to update an expense that is not in the database")]
    UpdateMissingExpense,

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The expense ledger could not be written as CSV.
    #[error("could not write the CSV export")]
    CsvError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => {
                render_internal_server_error(InternalServerError {
                    description: "Invalid Timezone Settings",
                    fix: &format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to a valid, canonical timezone string"
                    ),
                })
            }
            Error::DatabaseLockError => render_internal_server_error(Default::default()),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render_internal_server_error(Default::default())
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub(crate) fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::EmptyCustomerCode => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Alert::Error {
                    message: "Missing customer code".to_owned(),
                    details: "Enter a customer code so a transaction ID can be generated. \
                    Nothing has been saved."
                        .to_owned(),
                },
            ),
            Error::InvalidUnit(unit) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid unit".to_owned(),
                    details: format!(
                        "\"{unit}\" is not one of the available units. Pick a unit from the list."
                    ),
                },
            ),
            Error::InvalidQuantity(quantity) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Alert::Error {
                    message: "Invalid quantity".to_owned(),
                    details: format!(
                        "The quantity must be at least 1, got {quantity}. Nothing has been saved."
                    ),
                },
            ),
            Error::InvalidUnitPrice(unit_price) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Alert::Error {
                    message: "Invalid unit price".to_owned(),
                    details: format!(
                        "The unit price must not be negative, got {unit_price}. \
                    Nothing has been saved."
                    ),
                },
            ),
            Error::TotalPriceOverflow => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Alert::Error {
                    message: "Total price too large".to_owned(),
                    details: "The quantity times the unit price does not fit in a 64-bit \
                    number. Nothing has been saved."
                        .to_owned(),
                },
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to a valid, canonical timezone string"
                    ),
                },
            ),
            Error::UpdateMissingExpense => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update expense".to_owned(),
                    details: "The expense could not be found.".to_owned(),
                },
            ),
            Error::DeleteMissingExpense => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete expense".to_owned(),
                    details: "The expense could not be found. \
                    Try refreshing the page to see if the expense has already been deleted."
                        .to_owned(),
                },
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details:
                        "An unexpected error occurred, check the server logs for more details."
                            .to_owned(),
                },
            ),
        };

        (status_code, alert.into_html()).into_response()
    }
}
