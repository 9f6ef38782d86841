//! Displays the expense ledger with search, a grand total and row actions.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    expense::{Expense, core::list_expenses},
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, edit_delete_action_links, format_rupiah,
    },
    navigation::NavBar,
};

/// The state needed for the [get_expenses_page](crate::expense::get_expenses_page) route handler.
#[derive(Debug, Clone)]
pub struct ExpensesPageState {
    /// The database connection for reading expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExpensesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters accepted by the expenses page.
#[derive(Debug, Default, Deserialize)]
pub struct ExpensesQuery {
    /// A search term matched against the id, the descriptions and the note.
    pub q: Option<String>,
}

/// An expense plus the URLs for its row actions.
#[derive(Debug, PartialEq)]
struct ExpenseTableRow {
    expense: Expense,
    edit_url: String,
    delete_url: String,
}

impl From<Expense> for ExpenseTableRow {
    fn from(expense: Expense) -> Self {
        let edit_url = format_endpoint(endpoints::EDIT_EXPENSE_VIEW, &expense.id);
        let delete_url = format_endpoint(endpoints::EXPENSE, &expense.id);

        Self {
            expense,
            edit_url,
            delete_url,
        }
    }
}

fn expenses_view(rows: &[ExpenseTableRow], grand_total: i64, search_term: &str) -> Markup {
    let create_expense_page_url = endpoints::NEW_EXPENSE_VIEW;
    let nav_bar = NavBar::new(endpoints::EXPENSES_VIEW).into_html();

    let table_row = |row: &ExpenseTableRow| {
        let expense = &row.expense;
        let date_str = expense
            .date
            .map(|date| date.to_string())
            .unwrap_or_else(|| "-".to_owned());
        let action_links = edit_delete_action_links(
            &row.edit_url,
            &row.delete_url,
            &format!(
                "Are you sure you want to delete the expense '{}'? This cannot be undone.",
                expense.id
            ),
            "closest tr",
            "delete",
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                th
                    scope="row"
                    class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                {
                    (expense.id)
                }

                td class=(TABLE_CELL_STYLE) { (date_str) }
                td class=(TABLE_CELL_STYLE) { (expense.job_description) }
                td class=(TABLE_CELL_STYLE) { (expense.expense_description) }
                td class="px-6 py-4 text-right" { (expense.quantity) }
                td class=(TABLE_CELL_STYLE) { (expense.unit) }
                td class="px-6 py-4 text-right" { (format_rupiah(expense.unit_price)) }
                td class="px-6 py-4 text-right" { (format_rupiah(expense.total_price)) }
                td class=(TABLE_CELL_STYLE) { (expense.note) }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (action_links)
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full max-w-7xl"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    h1 class="text-xl font-bold" { "Expenses" }

                    div class="flex gap-4 items-center flex-wrap"
                    {
                        form method="get" action=(endpoints::EXPENSES_VIEW) class="flex gap-2"
                        {
                            input
                                name="q"
                                type="search"
                                placeholder="Search expenses"
                                value=(search_term)
                                class="p-2 rounded text-sm text-gray-900 dark:text-white
                                bg-gray-50 dark:bg-gray-700 border border-gray-300
                                dark:border-gray-600";

                            button type="submit" class=(LINK_STYLE) { "Search" }
                        }

                        form method="get" action=(endpoints::EXPORT_CSV)
                        {
                            input name="q" type="hidden" value=(search_term);
                            button type="submit" class=(LINK_STYLE) { "Export CSV" }
                        }

                        form method="get" action=(endpoints::PRINT_VIEW)
                        {
                            input name="q" type="hidden" value=(search_term);
                            button type="submit" class=(LINK_STYLE) { "Print Voucher" }
                        }

                        a href=(create_expense_page_url) class=(LINK_STYLE)
                        {
                            "Add Expense"
                        }
                    }
                }

                section class="w-full overflow-x-auto dark:bg-gray-800"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "ID" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Job" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class="px-6 py-3 text-right" { "Qty" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Unit" }
                                th scope="col" class="px-6 py-3 text-right" { "Unit Price" }
                                th scope="col" class="px-6 py-3 text-right" { "Total" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Note" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for row in rows {
                                (table_row(row))
                            }

                            @if rows.is_empty() {
                                tr
                                {
                                    td
                                        colspan="10"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No expenses found. Create an expense "
                                        a href=(create_expense_page_url) class=(LINK_STYLE)
                                        {
                                            "here"
                                        }
                                        "."
                                    }
                                }
                            }
                        }
                    }
                }

                p class="text-right font-semibold"
                {
                    "Grand Total: "
                    span { (format_rupiah(grand_total)) }
                }
            }
        }
    );

    base("Expenses", &content)
}

/// Renders the expenses page, optionally filtered by the `q` search term.
pub async fn get_expenses_page(
    State(state): State<ExpensesPageState>,
    Query(query): Query<ExpensesQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let search_term = query.q.as_deref().unwrap_or_default();

    let expenses = list_expenses(&connection, query.q.as_deref())
        .inspect_err(|error| tracing::error!("could not list expenses: {error}"))?;

    let grand_total = expenses.iter().map(|expense| expense.total_price).sum();
    let rows: Vec<ExpenseTableRow> = expenses.into_iter().map(ExpenseTableRow::from).collect();

    Ok(expenses_view(&rows, grand_total, search_term).into_response())
}
