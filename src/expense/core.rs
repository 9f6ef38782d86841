use rusqlite::Connection;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::Error;

/// The fixed set of unit labels an expense may use.
pub const UNITS: [&str; 8] = ["Pcs", "Unit", "Box", "Kg", "Liter", "Meter", "Roll", "Set"];

pub(crate) const DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month padding:zero]-[day padding:zero]");

/// A single cash-disbursement record in the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    /// The voucher-style transaction id, e.g. "TOKO0825001".
    pub id: String,
    /// The date of the expense. `None` when the stored text is not a date.
    pub date: Option<Date>,
    /// The job the expense belongs to.
    pub job_description: String,
    /// What was bought.
    pub expense_description: String,
    /// How many units were bought.
    pub quantity: i64,
    /// The unit label, one of [UNITS].
    pub unit: String,
    /// The price per unit in whole rupiah.
    pub unit_price: i64,
    /// quantity times unit price, computed by the caller at write time.
    pub total_price: i64,
    /// A free-form note.
    pub note: String,
}

// The table deliberately carries no primary key or unique constraint on id,
// matching the data files this application inherits. Update and delete
// address all rows sharing an id.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
            id TEXT,
            date TEXT,
            job_description TEXT,
            expense_description TEXT,
            quantity INTEGER,
            unit TEXT,
            unit_price INTEGER,
            total_price INTEGER,
            note TEXT
        )",
        (),
    )?;

    Ok(())
}

/// Map a row of the expense table to an [Expense].
///
/// Text columns may be NULL in inherited data and map to empty strings. The
/// date column is parsed leniently: anything that is not a `YYYY-MM-DD`
/// string maps to `None` instead of failing the query.
pub fn map_expense_row(row: &rusqlite::Row) -> Result<Expense, rusqlite::Error> {
    let id: Option<String> = row.get(0)?;
    let date_text: Option<String> = row.get(1)?;
    let job_description: Option<String> = row.get(2)?;
    let expense_description: Option<String> = row.get(3)?;
    let quantity = row.get(4)?;
    let unit: Option<String> = row.get(5)?;
    let unit_price = row.get(6)?;
    let total_price = row.get(7)?;
    let note: Option<String> = row.get(8)?;

    Ok(Expense {
        id: id.unwrap_or_default(),
        date: date_text.and_then(|text| Date::parse(&text, DATE_FORMAT).ok()),
        job_description: job_description.unwrap_or_default(),
        expense_description: expense_description.unwrap_or_default(),
        quantity,
        unit: unit.unwrap_or_default(),
        unit_price,
        total_price,
        note: note.unwrap_or_default(),
    })
}

/// Check submitted expense fields against the data model.
///
/// The HTML form constrains these through `min` attributes and the unit
/// select, but a request does not have to come from the form.
pub(crate) fn validate_expense_input(
    unit: &str,
    quantity: i64,
    unit_price: i64,
) -> Result<(), Error> {
    if !UNITS.contains(&unit) {
        return Err(Error::InvalidUnit(unit.to_owned()));
    }

    if quantity < 1 {
        return Err(Error::InvalidQuantity(quantity));
    }

    if unit_price < 0 {
        return Err(Error::InvalidUnitPrice(unit_price));
    }

    Ok(())
}

/// Compute quantity times unit price, refusing totals that do not fit an i64.
pub(crate) fn compute_total_price(quantity: i64, unit_price: i64) -> Result<i64, Error> {
    quantity
        .checked_mul(unit_price)
        .ok_or(Error::TotalPriceOverflow)
}

pub(crate) const SELECT_EXPENSE_COLUMNS: &str =
    "SELECT id, date, job_description, expense_description, \
    quantity, unit, unit_price, total_price, note FROM expense";

pub(crate) const SEARCH_FILTER: &str = "WHERE id LIKE :pattern ESCAPE '\\' \
    OR job_description LIKE :pattern ESCAPE '\\' \
    OR expense_description LIKE :pattern ESCAPE '\\' \
    OR note LIKE :pattern ESCAPE '\\'";

/// Turn a search term into a LIKE pattern matching it anywhere in a column.
///
/// `%`, `_` and `\` in the term are escaped so they match literally.
pub(crate) fn like_pattern(term: &str) -> String {
    let escaped = term
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");

    format!("%{escaped}%")
}

/// List expenses in storage order, optionally filtered by a search term.
///
/// The search term matches case-insensitively against the id, the job
/// description, the expense description and the note.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub(crate) fn list_expenses(
    connection: &Connection,
    search_term: Option<&str>,
) -> Result<Vec<Expense>, Error> {
    match search_term {
        Some(term) if !term.trim().is_empty() => {
            let pattern = like_pattern(term);

            connection
                .prepare(&format!("{SELECT_EXPENSE_COLUMNS} {SEARCH_FILTER}"))?
                .query_map(&[(":pattern", &pattern)], map_expense_row)?
                .map(|expense_result| expense_result.map_err(Error::from))
                .collect()
        }
        _ => connection
            .prepare(SELECT_EXPENSE_COLUMNS)?
            .query_map([], map_expense_row)?
            .map(|expense_result| expense_result.map_err(Error::from))
            .collect(),
    }
}

/// Retrieve the first expense matching `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to an expense,
/// - or [Error::SqlError] if there is some other SQL error.
pub(crate) fn get_expense(id: &str, connection: &Connection) -> Result<Expense, Error> {
    let expense = connection
        .prepare(&format!("{SELECT_EXPENSE_COLUMNS} WHERE id = :id"))?
        .query_one(&[(":id", &id)], map_expense_row)?;

    Ok(expense)
}

#[cfg(test)]
pub(crate) fn insert_test_expense(connection: &Connection, expense: &Expense) {
    connection
        .execute(
            "INSERT INTO expense (id, date, job_description, expense_description, \
            quantity, unit, unit_price, total_price, note) \
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            (
                &expense.id,
                expense.date.map(|date| date.to_string()),
                &expense.job_description,
                &expense.expense_description,
                expense.quantity,
                &expense.unit,
                expense.unit_price,
                expense.total_price,
                &expense.note,
            ),
        )
        .expect("Could not insert test expense into the database");
}

#[cfg(test)]
pub(crate) fn test_expense(id: &str) -> Expense {
    use time::macros::date;

    Expense {
        id: id.to_owned(),
        date: Some(date!(2025 - 08 - 14)),
        job_description: "Site renovation".to_owned(),
        expense_description: "Cement bags".to_owned(),
        quantity: 10,
        unit: "Pcs".to_owned(),
        unit_price: 65_000,
        total_price: 650_000,
        note: "paid cash".to_owned(),
    }
}

#[cfg(test)]
mod create_table_tests {
    use rusqlite::Connection;

    use super::create_expense_table;

    #[test]
    fn sql_is_valid() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");

        assert_eq!(Ok(()), create_expense_table(&connection));
    }
}

#[cfg(test)]
mod list_expenses_tests {
    use rusqlite::Connection;

    use super::{create_expense_table, insert_test_expense, list_expenses, test_expense};

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        create_expense_table(&connection).unwrap();
        connection
    }

    #[test]
    fn insert_then_list_returns_record_unchanged() {
        let connection = get_test_connection();
        let want_expense = test_expense("TOKO0825001");
        insert_test_expense(&connection, &want_expense);

        let expenses = list_expenses(&connection, None).unwrap();

        assert_eq!(expenses, vec![want_expense]);
    }

    #[test]
    fn returns_empty_list_for_empty_table() {
        let connection = get_test_connection();

        let expenses = list_expenses(&connection, None).unwrap();

        assert_eq!(expenses, vec![]);
    }

    #[test]
    fn unparseable_date_maps_to_none() {
        let connection = get_test_connection();
        connection
            .execute(
                "INSERT INTO expense (id, date, job_description, expense_description, \
                quantity, unit, unit_price, total_price, note) \
                VALUES ('X10825001', 'yesterday', '', '', 1, 'Pcs', 100, 100, '')",
                (),
            )
            .unwrap();

        let expenses = list_expenses(&connection, None).unwrap();

        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].date, None);
    }

    #[test]
    fn null_text_columns_map_to_empty_strings() {
        let connection = get_test_connection();
        connection
            .execute(
                "INSERT INTO expense (id, date, job_description, expense_description, \
                quantity, unit, unit_price, total_price, note) \
                VALUES ('X10825001', NULL, NULL, NULL, 1, NULL, 100, 100, NULL)",
                (),
            )
            .unwrap();

        let expenses = list_expenses(&connection, None).unwrap();

        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].job_description, "");
        assert_eq!(expenses[0].note, "");
    }

    #[test]
    fn search_term_filters_by_description() {
        let connection = get_test_connection();
        let mut cement = test_expense("TOKO0825001");
        cement.expense_description = "Cement bags".to_owned();
        let mut paint = test_expense("TOKO0825002");
        paint.expense_description = "Wall paint".to_owned();
        insert_test_expense(&connection, &cement);
        insert_test_expense(&connection, &paint);

        let expenses = list_expenses(&connection, Some("paint")).unwrap();

        assert_eq!(expenses, vec![paint]);
    }

    #[test]
    fn search_term_matches_id() {
        let connection = get_test_connection();
        let toko = test_expense("TOKO0825001");
        let other = test_expense("UD0825001");
        insert_test_expense(&connection, &toko);
        insert_test_expense(&connection, &other);

        let expenses = list_expenses(&connection, Some("TOKO")).unwrap();

        assert_eq!(expenses, vec![toko]);
    }

    #[test]
    fn like_metacharacters_match_literally() {
        let connection = get_test_connection();
        let mut discounted = test_expense("TOKO0825001");
        discounted.note = "10% discount".to_owned();
        let mut plain = test_expense("TOKO0825002");
        plain.note = "paid cash".to_owned();
        insert_test_expense(&connection, &discounted);
        insert_test_expense(&connection, &plain);

        let expenses = list_expenses(&connection, Some("%")).unwrap();

        assert_eq!(expenses, vec![discounted]);
    }

    #[test]
    fn underscore_does_not_match_any_character() {
        let connection = get_test_connection();
        let mut snake_case = test_expense("TOKO0825001");
        snake_case.note = "job_code 7".to_owned();
        let mut other = test_expense("TOKO0825002");
        other.note = "jobXcode 7".to_owned();
        insert_test_expense(&connection, &snake_case);
        insert_test_expense(&connection, &other);

        let expenses = list_expenses(&connection, Some("job_code")).unwrap();

        assert_eq!(expenses, vec![snake_case]);
    }

    #[test]
    fn blank_search_term_returns_everything() {
        let connection = get_test_connection();
        insert_test_expense(&connection, &test_expense("TOKO0825001"));
        insert_test_expense(&connection, &test_expense("UD0825001"));

        let expenses = list_expenses(&connection, Some("   ")).unwrap();

        assert_eq!(expenses.len(), 2);
    }
}

#[cfg(test)]
mod validation_tests {
    use crate::Error;

    use super::{compute_total_price, validate_expense_input};

    #[test]
    fn accepts_fields_within_range() {
        assert_eq!(validate_expense_input("Pcs", 1, 0), Ok(()));
    }

    #[test]
    fn rejects_quantity_below_one() {
        assert_eq!(
            validate_expense_input("Pcs", 0, 100),
            Err(Error::InvalidQuantity(0))
        );
        assert_eq!(
            validate_expense_input("Pcs", -5, 100),
            Err(Error::InvalidQuantity(-5))
        );
    }

    #[test]
    fn rejects_negative_unit_price() {
        assert_eq!(
            validate_expense_input("Pcs", 1, -100),
            Err(Error::InvalidUnitPrice(-100))
        );
    }

    #[test]
    fn total_price_overflow_is_an_error() {
        assert_eq!(compute_total_price(10, 65_000), Ok(650_000));
        assert_eq!(
            compute_total_price(i64::MAX, 2),
            Err(Error::TotalPriceOverflow)
        );
    }
}
