//! Renders the standalone, printable expense voucher document.
//!
//! The voucher is a self-contained HTML page with its own inline styles so it
//! can be downloaded, attached or printed without the application's
//! stylesheet. It reads table cells as raw text rather than through the
//! domain model, so inherited rows with malformed values still print.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use rusqlite::{Connection, types::ValueRef};
use serde::Deserialize;

use crate::{
    AppState, Error,
    expense::core::{SEARCH_FILTER, SELECT_EXPENSE_COLUMNS, like_pattern},
    html::{format_rupiah, format_rupiah_cell},
    internal_server_error::render_internal_server_error,
};

/// The state needed to render the voucher document.
#[derive(Debug, Clone)]
pub struct VoucherState {
    /// The database connection for reading expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for VoucherState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters accepted by the voucher route.
#[derive(Debug, Default, Deserialize)]
pub struct VoucherQuery {
    /// The voucher number printed in the document header.
    pub voucher_no: String,
    /// The expense name printed in the document header.
    pub expense_name: String,
    /// The search term of the listing being printed.
    pub q: Option<String>,
    /// When true, the response carries an attachment disposition.
    pub download: Option<bool>,
}

const COLUMN_LABELS: [&str; 9] = [
    "ID",
    "Date",
    "Job Description",
    "Expense Description",
    "Quantity",
    "Unit",
    "Unit Price",
    "Total Price",
    "Note",
];

/// The raw text of one expense row, one cell per column.
type RawExpenseRow = [String; 9];

const UNIT_PRICE_COLUMN: usize = 6;
const TOTAL_PRICE_COLUMN: usize = 7;

fn voucher_document(
    voucher_no: &str,
    expense_name: &str,
    grand_total: &str,
    rows: &[RawExpenseRow],
) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                title { "Expense Voucher" }
                style
                {
                    (PreEscaped(r#"
                    body { font-family: Arial, sans-serif; margin: 20px; }
                    h1, h2, h3 { text-align: center; }
                    table {
                        width: 100%;
                        border-collapse: collapse;
                        margin-top: 20px;
                    }
                    th, td {
                        border: 1px solid #ddd;
                        padding: 8px;
                        text-align: left;
                    }
                    th { background-color: #f2f2f2; }
                    "#))
                }
            }

            body
            {
                h1 { "Expense Voucher" }
                h3 { "Voucher No: " (voucher_no) }
                h3 { "Expense Name: " (expense_name) }
                h3 { "Total: " (grand_total) }

                table
                {
                    thead
                    {
                        tr
                        {
                            @for label in COLUMN_LABELS {
                                th { (label) }
                            }
                        }
                    }

                    tbody
                    {
                        @for row in rows {
                            tr
                            {
                                @for (column, cell) in row.iter().enumerate() {
                                    @if column == UNIT_PRICE_COLUMN
                                        || column == TOTAL_PRICE_COLUMN
                                    {
                                        td { (format_rupiah_cell(cell)) }
                                    } @else {
                                        td { (cell) }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// A route handler that renders the printable voucher document.
pub async fn get_voucher_document(
    State(state): State<VoucherState>,
    Query(query): Query<VoucherQuery>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return render_internal_server_error(Default::default());
        }
    };

    let rows = match list_raw_rows(&connection, query.q.as_deref()) {
        Ok(rows) => rows,
        Err(error) => {
            tracing::error!("could not read expenses for the voucher: {error}");
            return render_internal_server_error(Default::default());
        }
    };

    let grand_total = format_rupiah(sum_total_price_cells(&rows));
    let document = voucher_document(&query.voucher_no, &query.expense_name, &grand_total, &rows);

    if query.download.unwrap_or(false) {
        (
            [
                (header::CONTENT_TYPE, "text/html; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"expense_voucher.html\"",
                ),
            ],
            document.into_string(),
        )
            .into_response()
    } else {
        document.into_response()
    }
}

/// Read the filtered rows as raw text, tolerating any stored value.
fn list_raw_rows(
    connection: &Connection,
    search_term: Option<&str>,
) -> Result<Vec<RawExpenseRow>, Error> {
    match search_term {
        Some(term) if !term.trim().is_empty() => {
            let pattern = like_pattern(term);

            connection
                .prepare(&format!("{SELECT_EXPENSE_COLUMNS} {SEARCH_FILTER}"))?
                .query_map(&[(":pattern", &pattern)], map_raw_row)?
                .map(|row_result| row_result.map_err(Error::from))
                .collect()
        }
        _ => connection
            .prepare(SELECT_EXPENSE_COLUMNS)?
            .query_map([], map_raw_row)?
            .map(|row_result| row_result.map_err(Error::from))
            .collect(),
    }
}

fn map_raw_row(row: &rusqlite::Row) -> Result<RawExpenseRow, rusqlite::Error> {
    let mut cells = RawExpenseRow::default();

    for (column, cell) in cells.iter_mut().enumerate() {
        *cell = match row.get_ref(column)? {
            ValueRef::Null => String::new(),
            ValueRef::Integer(value) => value.to_string(),
            ValueRef::Real(value) => value.to_string(),
            ValueRef::Text(text) => String::from_utf8_lossy(text).into_owned(),
            ValueRef::Blob(_) => String::new(),
        };
    }

    Ok(cells)
}

/// Sum the total-price cells that hold numbers. Non-numeric cells contribute
/// nothing, mirroring the formatter's pass-through contract.
fn sum_total_price_cells(rows: &[RawExpenseRow]) -> i64 {
    rows.iter()
        .filter_map(|row| {
            let cell = row[TOTAL_PRICE_COLUMN].trim();

            cell.parse::<i64>()
                .ok()
                .or_else(|| cell.parse::<f64>().ok().map(|value| value.round() as i64))
        })
        .sum()
}
