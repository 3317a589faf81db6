// Tax Engine - Quebec two-tier sales tax decomposition
//
// Every report cell with money in it goes through decompose(). GST is a
// flat 5% on the base; QST is 9.975% charged on (base + GST), so the two
// components compound. When an entry stores a tax-included total we solve
// the closed form for the base instead of guessing.

// ============================================================================
// RATES
// ============================================================================

/// GST rate (federal, 5%)
pub const GST_RATE: f64 = 0.05;

/// QST rate (Quebec, 9.975%, applied to base + GST)
pub const QST_RATE: f64 = 0.09975;

// ============================================================================
// TAX BREAKDOWN
// ============================================================================

/// Three-way decomposition of a monetary amount.
///
/// Transient value, never persisted. `base + gst + qst` reconstructs the
/// taxable total (exactly for pre-tax amounts, to FP rounding for
/// tax-included ones).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaxBreakdown {
    /// Pre-tax amount
    pub base: f64,

    /// GST component (base * GST_RATE)
    pub gst: f64,

    /// QST component ((base + gst) * QST_RATE)
    pub qst: f64,
}

impl TaxBreakdown {
    /// Tax-in total, recomputed from the components
    pub fn total(&self) -> f64 {
        self.base + self.gst + self.qst
    }
}

// ============================================================================
// DECOMPOSITION
// ============================================================================

/// Decompose a recorded amount into base / GST / QST.
///
/// - `non_taxable` wins over everything: the full amount is base, both
///   taxes are zero, and `tax_included` is ignored.
/// - `tax_included` means the amount already embeds both taxes. Solve
///   `amount = B + B*R1 + (B + B*R1)*R2` for B:
///   `B = amount / (1 + R1 + (1 + R1)*R2)`.
/// - Otherwise the amount is the base and both taxes are charged forward.
///
/// No error cases. A negative amount flows straight through the arithmetic
/// and yields a negative decomposition with the same identity.
pub fn decompose(amount: f64, tax_included: bool, non_taxable: bool) -> TaxBreakdown {
    if non_taxable {
        return TaxBreakdown {
            base: amount,
            gst: 0.0,
            qst: 0.0,
        };
    }

    let base = if tax_included {
        let factor = 1.0 + GST_RATE + (1.0 + GST_RATE) * QST_RATE;
        amount / factor
    } else {
        amount
    };

    let gst = base * GST_RATE;
    let qst = (base + gst) * QST_RATE;

    TaxBreakdown { base, gst, qst }
}
