//! Generates the voucher-style transaction ids that identify expenses.

use time::Date;

/// The prefix used when no customer code is given.
const FALLBACK_PREFIX: &str = "X1";

/// Generate a transaction id of the form `<CODE><MMYY><NNN>`.
///
/// The prefix is the uppercased customer code, or [FALLBACK_PREFIX] when the
/// code is blank. The suffix is the expense month and two-digit year, both
/// zero-padded. The sequence number is one more than the number of existing
/// ids that share the prefix and month, zero-padded to three digits.
///
/// Sequence numbers count surviving rows rather than a persisted counter, so
/// deleting a record and adding a new one can reuse its number. More than 999
/// ids in one month overflow the padding; widths then become inconsistent.
pub fn generate_transaction_id(customer_code: &str, date: Date, existing_ids: &[String]) -> String {
    let code = customer_code.trim();
    let prefix = if code.is_empty() {
        FALLBACK_PREFIX.to_owned()
    } else {
        code.to_uppercase()
    };

    let month_year = format!(
        "{:02}{:02}",
        u8::from(date.month()),
        date.year().rem_euclid(100)
    );
    let key = format!("{prefix}{month_year}");

    let count = existing_ids.iter().filter(|id| id.starts_with(&key)).count();

    format!("{key}{:03}", count + 1)
}
