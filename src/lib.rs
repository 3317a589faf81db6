// count-beans - small-business bookkeeping core
// Invoices and incomes in SQLite, GST/QST report export to .xlsx

pub mod db;
pub mod entities;
pub mod report;
pub mod settings;
pub mod tax;

// Re-export commonly used types
pub use db::{
    add_category, add_client, add_vendor, delete_income, delete_invoice, fetch_incomes,
    fetch_invoices, insert_income, insert_invoice, list_categories, list_clients, list_vendors,
    load_invoices_csv, remove_category, remove_client, remove_vendor, setup_database,
    update_income, update_invoice,
};
pub use entities::{FinancialEntry, Income, Invoice};
pub use report::{build_report, export_report, ReportTotals};
pub use settings::ReportHeader;
pub use tax::{decompose, TaxBreakdown, GST_RATE, QST_RATE};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
