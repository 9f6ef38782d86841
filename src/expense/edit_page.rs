//! Defines the route handler for the page for editing an expense.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    expense::{Expense, UNITS, core::get_expense},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
    },
    internal_server_error::render_internal_server_error,
    navigation::NavBar,
    not_found::get_404_not_found_response,
};

fn edit_expense_view(expense: &Expense) -> Markup {
    let edit_url = format_endpoint(endpoints::EXPENSE, &expense.id);
    let nav_bar = NavBar::new(endpoints::EXPENSES_VIEW).into_html();
    let date_value = expense
        .date
        .map(|date| date.to_string())
        .unwrap_or_default();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(edit_url)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Edit Expense " (expense.id) }

                div
                {
                    label
                        for="date"
                        class=(FORM_LABEL_STYLE)
                    {
                        "Date"
                    }

                    input
                        name="date"
                        id="date"
                        type="date"
                        required
                        value=(date_value)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label
                        for="job_description"
                        class=(FORM_LABEL_STYLE)
                    {
                        "Job Description"
                    }

                    input
                        name="job_description"
                        id="job_description"
                        type="text"
                        value=(expense.job_description)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label
                        for="expense_description"
                        class=(FORM_LABEL_STYLE)
                    {
                        "Expense Description"
                    }

                    input
                        name="expense_description"
                        id="expense_description"
                        type="text"
                        value=(expense.expense_description)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label
                        for="quantity"
                        class=(FORM_LABEL_STYLE)
                    {
                        "Quantity"
                    }

                    input
                        name="quantity"
                        id="quantity"
                        type="number"
                        min="1"
                        step="1"
                        required
                        value=(expense.quantity)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label
                        for="unit"
                        class=(FORM_LABEL_STYLE)
                    {
                        "Unit"
                    }

                    select
                        name="unit"
                        id="unit"
                        class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for unit in UNITS {
                            @if unit == expense.unit {
                                option value=(unit) selected { (unit) }
                            } @else {
                                option value=(unit) { (unit) }
                            }
                        }
                    }
                }

                div
                {
                    label
                        for="unit_price"
                        class=(FORM_LABEL_STYLE)
                    {
                        "Unit Price (Rp)"
                    }

                    input
                        name="unit_price"
                        id="unit_price"
                        type="number"
                        min="0"
                        step="1"
                        required
                        value=(expense.unit_price)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label
                        for="note"
                        class=(FORM_LABEL_STYLE)
                    {
                        "Note"
                    }

                    input
                        name="note"
                        id="note"
                        type="text"
                        value=(expense.note)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button type="submit" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    "Save Changes"
                }
            }
        }
    };

    base("Edit Expense", &content)
}

/// The state needed for the edit expense page.
#[derive(Debug, Clone)]
pub struct EditExpensePageState {
    /// The database connection for accessing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditExpensePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for editing an expense.
///
/// Responds with the 404 page when no expense matches `expense_id`.
pub async fn get_edit_expense_page(
    State(state): State<EditExpensePageState>,
    Path(expense_id): Path<String>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return render_internal_server_error(Default::default());
        }
    };

    let expense = match get_expense(&expense_id, &connection) {
        Ok(expense) => expense,
        Err(Error::NotFound) => {
            return get_404_not_found_response();
        }
        Err(error) => {
            tracing::error!("Failed to retrieve expense {expense_id}: {error}");
            return render_internal_server_error(Default::default());
        }
    };

    edit_expense_view(&expense).into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;

    use crate::{
        endpoints::{self, format_endpoint},
        expense::core::{insert_test_expense, test_expense},
        initialize_db,
        test_utils::{
            assert_form_input_with_value, assert_hx_endpoint, assert_status_ok, assert_valid_html,
            must_get_form, parse_html_document,
        },
    };

    use super::{EditExpensePageState, get_edit_expense_page};

    fn get_test_state() -> EditExpensePageState {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).unwrap();

        EditExpensePageState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn renders_prefilled_form() {
        let state = get_test_state();
        let expense = test_expense("TOKO0825001");
        {
            let connection = state.db_connection.lock().unwrap();
            insert_test_expense(&connection, &expense);
        }

        let response =
            get_edit_expense_page(State(state), Path("TOKO0825001".to_owned())).await;

        assert_status_ok(&response);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let form = must_get_form(&document);
        assert_hx_endpoint(
            &form,
            &format_endpoint(endpoints::EXPENSE, "TOKO0825001"),
            "hx-put",
        );
        assert_form_input_with_value(&form, "date", "date", "2025-08-14");
        assert_form_input_with_value(&form, "quantity", "number", "10");
        assert_form_input_with_value(&form, "unit_price", "number", "65000");
        assert_form_input_with_value(&form, "note", "text", "paid cash");
    }

    #[tokio::test]
    async fn missing_expense_renders_404() {
        let state = get_test_state();

        let response = get_edit_expense_page(State(state), Path("NOPE0825001".to_owned())).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
