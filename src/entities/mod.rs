// Financial entry model - the common shape behind invoices and incomes
//
// The report builder and tax engine only ever see this capability surface.
// Variant-specific fields (vendor vs. client) are reachable only through
// the concrete structs.

pub mod income;
pub mod invoice;

pub use income::Income;
pub use invoice::Invoice;

use crate::tax::{decompose, TaxBreakdown};

/// Uniform accessor contract shared by `Invoice` and `Income`.
///
/// `counterparty` is the vendor for invoices and the client for incomes.
/// Dates are UNIX timestamps in milliseconds, as stored.
pub trait FinancialEntry {
    /// Storage-assigned row id (0 until inserted)
    fn id(&self) -> i64;

    /// Vendor (Invoice) or client (Income) name
    fn counterparty(&self) -> &str;

    fn category(&self) -> &str;

    /// Issue date, UNIX epoch milliseconds
    fn issued_date(&self) -> i64;

    fn description(&self) -> &str;

    /// Recorded amount; meaning depends on `tax_included`
    fn amount(&self) -> f64;

    /// Whether the recorded amount already embeds GST + QST
    fn tax_included(&self) -> bool;

    /// Fully tax-exempt; voids `tax_included` when set
    fn non_taxable(&self) -> bool;

    /// Base / GST / QST decomposition of this entry's amount
    fn breakdown(&self) -> TaxBreakdown {
        decompose(self.amount(), self.tax_included(), self.non_taxable())
    }
}
