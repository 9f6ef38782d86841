//! Defines the endpoint for creating a new expense.
use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error, endpoints,
    expense::{
        Expense,
        core::{compute_total_price, validate_expense_input},
        generate_transaction_id,
    },
};

/// The state needed to create an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating an expense.
///
/// The customer code is only used to derive the transaction id and is not
/// stored on the record itself.
#[derive(Debug, Deserialize)]
pub struct ExpenseForm {
    /// The customer code that prefixes the transaction id.
    pub customer_code: String,
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

/// A route handler for creating a new expense, redirects to the expenses view
/// on success.
///
/// The transaction id is generated while the connection lock is held so the
/// count-then-insert sequence cannot interleave with another insert.
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseState>,
    Form(form): Form<ExpenseForm>,
) -> Response {
    if form.customer_code.trim().is_empty() {
        return Error::EmptyCustomerCode.into_alert_response();
    }

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

    match create_expense(&form, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::EXPENSES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not create expense with {form:?}: {error}");
            error.into_alert_response()
        }
    }
}

pub(crate) fn create_expense(
    form: &ExpenseForm,
    connection: &Connection,
) -> Result<Expense, Error> {
    let existing_ids: Vec<String> = connection
        .prepare("SELECT id FROM expense")?
        .query_map([], |row| row.get::<_, Option<String>>(0))?
        .filter_map(|id_result| id_result.transpose())
        .collect::<Result<_, _>>()?;

    let id = generate_transaction_id(&form.customer_code, form.date, &existing_ids);
    let total_price = compute_total_price(form.quantity, form.unit_price)?;

    connection.execute(
        "INSERT INTO expense (id, date, job_description, expense_description, \
        quantity, unit, unit_price, total_price, note) \
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        (
            &id,
            form.date.to_string(),
            &form.job_description,
            &form.expense_description,
            form.quantity,
            &form.unit,
            form.unit_price,
            total_price,
            &form.note,
        ),
    )?;

    Ok(Expense {
        id,
        date: Some(form.date),
        job_description: form.job_description.clone(),
        expense_description: form.expense_description.clone(),
        quantity: form.quantity,
        unit: form.unit.clone(),
        unit_price: form.unit_price,
        total_price,
        note: form.note.clone(),
    })
}
