//! Defines the route handler for the page for creating a new expense.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::Date;

use crate::{
    AppState, Error, endpoints,
    expense::UNITS,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
    timezone::local_date_today,
};

fn create_expense_view(today: Date) -> Markup {
    let create_expense_route = endpoints::EXPENSES_API;
    let nav_bar = NavBar::new(endpoints::NEW_EXPENSE_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(create_expense_route)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "New Expense" }

                div
                {
                    label
                        for="customer_code"
                        class=(FORM_LABEL_STYLE)
                    {
                        "Customer Code"
                    }

                    input
                        name="customer_code"
                        id="customer_code"
                        type="text"
                        placeholder="TOKO"
                        required
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);
                }

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
                        value=(today)
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
                        placeholder="Job Description"
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
                        placeholder="Expense Description"
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
                        value="1"
                        required
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
                            option value=(unit) { (unit) }
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
                        placeholder="0"
                        required
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
                        placeholder="Note"
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button type="submit" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    "Add Expense"
                }
            }
        }
    };

    base("New Expense", &content)
}

/// The state needed for the new expense page.
#[derive(Debug, Clone)]
pub struct CreateExpensePageState {
    /// The local timezone as a canonical timezone name, e.g. "Asia/Jakarta".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateExpensePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Renders the page for creating an expense.
pub async fn get_create_expense_page(
    State(state): State<CreateExpensePageState>,
) -> Result<Response, Error> {
    let today = local_date_today(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone)
    })?;

    Ok(create_expense_view(today).into_response())
}
