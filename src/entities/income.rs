// Income entity - a client-side revenue entry

use serde::{Deserialize, Serialize};

use super::FinancialEntry;

/// Client income record as persisted in the `incomes` table.
///
/// Same shape as `Invoice` with the counterparty being a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Income {
    /// Storage-assigned id; 0 until inserted
    pub id: i64,
    pub client: String,
    pub category: String,
    pub issued_date: i64,
    pub description: String,
    pub amount: f64,
    pub tax_included: bool,
    pub non_taxable: bool,
}

impl Income {
    /// Create an unsaved income record (id = 0 placeholder)
    pub fn new(
        client: String,
        category: String,
        issued_date: i64,
        description: String,
        amount: f64,
        tax_included: bool,
        non_taxable: bool,
    ) -> Self {
        Income {
            id: 0,
            client,
            category,
            issued_date,
            description,
            amount,
            tax_included,
            non_taxable,
        }
    }
}

impl FinancialEntry for Income {
    fn id(&self) -> i64 {
        self.id
    }

    fn counterparty(&self) -> &str {
        &self.client
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
