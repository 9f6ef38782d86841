//! The expense ledger: the domain model, the pages for listing, creating and
//! editing expenses, and the endpoints that mutate, export and print them.

mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod expenses_page;
mod export_endpoint;
mod print_page;
mod transaction_id;
mod voucher_page;

pub use self::core::{Expense, UNITS, create_expense_table};
pub use create_endpoint::create_expense_endpoint;
pub use create_page::get_create_expense_page;
pub use delete_endpoint::delete_expense_endpoint;
pub use edit_endpoint::edit_expense_endpoint;
pub use edit_page::get_edit_expense_page;
pub use expenses_page::get_expenses_page;
pub use export_endpoint::export_expenses_endpoint;
pub use print_page::get_print_voucher_page;
pub use transaction_id::generate_transaction_id;
pub use voucher_page::get_voucher_document;
