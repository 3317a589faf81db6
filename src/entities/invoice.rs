// Invoice entity - a vendor-side expense entry

use serde::{Deserialize, Serialize};

use super::FinancialEntry;

/// Vendor invoice as persisted in the `invoices` table.
///
/// `issued_date` is a UNIX timestamp in milliseconds. `amount` is either
/// the pre-tax base or the tax-in total depending on `tax_included`;
/// `non_taxable` overrides `tax_included` entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Storage-assigned id; 0 until inserted
    pub id: i64,
    pub vendor: String,
    pub category: String,
    pub issued_date: i64,
    pub description: String,
    pub amount: f64,
    pub tax_included: bool,
    pub non_taxable: bool,
}

impl Invoice {
    /// Create an unsaved invoice (id = 0 placeholder until storage assigns one)
    pub fn new(
        vendor: String,
        category: String,
        issued_date: i64,
        description: String,
        amount: f64,
        tax_included: bool,
        non_taxable: bool,
    ) -> Self {
        Invoice {
            id: 0,
            vendor,
            category,
            issued_date,
            description,
            amount,
            tax_included,
            non_taxable,
        }
    }
}

impl FinancialEntry for Invoice {
    fn id(&self) -> i64 {
        self.id
    }

    fn counterparty(&self) -> &str {
        &self.vendor
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn issued_date(&self) -> i64 {
        self.issued_date
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn amount(&self) -> f64 {
        self.amount
    }

    fn tax_included(&self) -> bool {
        self.tax_included
    }

    fn non_taxable(&self) -> bool {
        self.non_taxable
    }
}
