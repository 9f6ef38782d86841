//! Defines the endpoint for downloading the expense ledger as CSV.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    expense::{Expense, core::list_expenses},
    internal_server_error::render_internal_server_error,
};

/// The state needed to export expenses.
#[derive(Debug, Clone)]
pub struct ExportExpensesState {
    /// The database connection for reading expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExportExpensesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters accepted by the CSV export.
#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    /// The search term of the listing being exported.
    pub q: Option<String>,
}

/// A route handler that responds with the filtered ledger as a CSV download.
pub async fn export_expenses_endpoint(
    State(state): State<ExportExpensesState>,
    Query(query): Query<ExportQuery>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return render_internal_server_error(Default::default());
        }
    };

    let expenses = match list_expenses(&connection, query.q.as_deref()) {
        Ok(expenses) => expenses,
        Err(error) => {
            tracing::error!("could not list expenses for CSV export: {error}");
            return render_internal_server_error(Default::default());
        }
    };

    let csv_text = match expenses_to_csv(&expenses) {
        Ok(csv_text) => csv_text,
        Err(error) => {
            tracing::error!("could not serialize expenses to CSV: {error}");
            return render_internal_server_error(Default::default());
        }
    };

    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"expenses.csv\"",
            ),
        ],
        csv_text,
    )
        .into_response()
}

fn expenses_to_csv(expenses: &[Expense]) -> Result<String, Error> {
    let mut writer = csv::Writer::from_writer(vec![]);

    writer
        .write_record([
            "id",
            "date",
            "job_description",
            "expense_description",
            "quantity",
            "unit",
            "unit_price",
            "total_price",
            "note",
        ])
        .map_err(|_| Error::CsvError)?;

    for expense in expenses {
        writer
            .write_record([
                expense.id.as_str(),
                &expense
                    .date
                    .map(|date| date.to_string())
                    .unwrap_or_default(),
                &expense.job_description,
                &expense.expense_description,
                &expense.quantity.to_string(),
                &expense.unit,
                &expense.unit_price.to_string(),
                &expense.total_price.to_string(),
                &expense.note,
            ])
            .map_err(|_| Error::CsvError)?;
    }

    let bytes = writer.into_inner().map_err(|_| Error::CsvError)?;

    String::from_utf8(bytes).map_err(|_| Error::CsvError)
}
