//! Defines the endpoint for updating an expense.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error, endpoints,
    expense::core::{compute_total_price, validate_expense_input},
};

/// The state needed to update an expense.
#[derive(Debug, Clone)]
pub struct EditExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for updating an expense. The id comes from the URL.
#[derive(Debug, Deserialize)]
pub struct EditExpenseForm {
    /// The date of the expense.
    pub date: Date,
    /// The job the expense belongs to.
    pub job_description: String,
    /// What was bought.
    pub expense_description: String,
    /// How many units were bought.
    pub quantity: i64,
    /// The unit label, one of [UNITS](crate::expense::UNITS).
    pub unit: String,
    /// The price per unit in whole rupiah.
    pub unit_price: i64,
    /// A free-form note.
    pub note: String,
}

/// A route handler for updating an expense, redirects to the expenses view on
/// success.
///
/// The total price is recomputed from the submitted quantity and unit price.
/// Ids carry no unique constraint, so the update addresses every row that
/// shares the id.
pub async fn edit_expense_endpoint(
    State(state): State<EditExpenseState>,
    Path(expense_id): Path<String>,
    Form(form): Form<EditExpenseForm>,
) -> Response {
    if let Err(error) = validate_expense_input(&form.unit, form.quantity, form.unit_price) {
        return error.into_alert_response();
    }

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_expense(&expense_id, &form, &connection) {
        Ok(rows_affected) if rows_affected != 0 => (
            HxRedirect(endpoints::EXPENSES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Ok(_) => Error::UpdateMissingExpense.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not update expense {expense_id}: {error}");
            error.into_alert_response()
        }
    }
}

type RowsAffected = usize;

fn update_expense(
    id: &str,
    form: &EditExpenseForm,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    let total_price = compute_total_price(form.quantity, form.unit_price)?;

    connection
        .execute(
            "UPDATE expense SET
                date = :date,
                job_description = :job_description,
                expense_description = :expense_description,
                quantity = :quantity,
                unit = :unit,
                unit_price = :unit_price,
                total_price = :total_price,
                note = :note
            WHERE id = :id",
            rusqlite::named_params! {
                ":date": form.date.to_string(),
                ":job_description": form.job_description,
                ":expense_description": form.expense_description,
                ":quantity": form.quantity,
                ":unit": form.unit,
                ":unit_price": form.unit_price,
                ":total_price": total_price,
                ":note": form.note,
                ":id": id,
            },
        )
        .map_err(Error::from)
}
