// Report builder - three-sheet GST/QST report over invoice and income
// collections
//
// Sheet order is part of the contract: Summary, then Invoices, then
// Incomes. Detail rows appear in the order the caller supplies them (the
// storage layer orders by issued date); every money cell is recomputed
// from decompose(), never re-read from storage.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook, Worksheet};
use std::path::Path;

use crate::entities::FinancialEntry;
use crate::tax::TaxBreakdown;

// ============================================================================
// SHEET LAYOUT
// ============================================================================

pub const SHEET_SUMMARY: &str = "Summary";
pub const SHEET_INVOICES: &str = "Invoices";
pub const SHEET_INCOMES: &str = "Incomes";

/// Fallback title when the header info carries no report title
pub const DEFAULT_REPORT_TITLE: &str = "Financial Report";

/// Detail sheet column headers, fixed order
pub const DETAIL_HEADERS: [&str; 10] = [
    "Vendor/Client",
    "Category",
    "Issued Date",
    "Description",
    "Base Amount",
    "GST (5%)",
    "QST (9.975%)",
    "Total Amount",
    "Tax Included",
    "Non-Taxable",
];

// ============================================================================
// AGGREGATOR
// ============================================================================

/// Running totals over a collection of decomposed entries.
///
/// `total_non_taxable` is a disclosure subtotal: the base of non-taxable
/// rows is counted there AND in `total_base`. The report discloses it as a
/// separate line, it is not a distinct grand total.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReportTotals {
    pub total_base: f64,
    pub total_gst: f64,
    pub total_qst: f64,
    pub total_amount: f64,
    pub total_non_taxable: f64,
}

impl ReportTotals {
    pub fn new() -> Self {
        ReportTotals::default()
    }

    /// Fold one decomposed entry into the running sums.
    pub fn add(&mut self, breakdown: &TaxBreakdown, non_taxable: bool) {
        self.total_base += breakdown.base;
        self.total_gst += breakdown.gst;
        self.total_qst += breakdown.qst;
        self.total_amount += breakdown.total();

        if non_taxable {
            self.total_non_taxable += breakdown.base;
        }
    }

    /// Accumulate a whole collection.
    pub fn from_entries<E: FinancialEntry>(entries: &[E]) -> Self {
        let mut totals = ReportTotals::new();
        for entry in entries {
            totals.add(&entry.breakdown(), entry.non_taxable());
        }
        totals
    }

    /// The five labeled lines of a summary block, in report order.
    pub fn summary_lines(&self) -> [(&'static str, f64); 5] {
        [
            ("TOTAL BASE AMOUNT", self.total_base),
            ("TOTAL GST (5%)", self.total_gst),
            ("TOTAL QST (9.975%)", self.total_qst),
            ("TOTAL AMOUNT", self.total_amount),
            ("TOTAL NON-TAXABLE", self.total_non_taxable),
        ]
    }
}

// ============================================================================
// STYLES
// ============================================================================

/// Immutable cell formats, built once per report and passed to the
/// sheet-writing calls.
struct ReportStyles {
    title: Format,
    section: Format,
    header: Format,
    money: Format,
}

impl ReportStyles {
    fn new() -> Self {
        ReportStyles {
            title: Format::new().set_bold().set_font_size(14),
            section: Format::new().set_bold(),
            header: Format::new()
                .set_bold()
                .set_align(FormatAlign::Center)
                .set_background_color(Color::RGB(0xD9D9D9)),
            money: Format::new().set_num_format("#,##0.00"),
        }
    }
}

// ============================================================================
// REPORT BUILDER
// ============================================================================

fn format_issued_date(millis: i64) -> Result<String> {
    // A date outside chrono's range means the row is garbage; fail the
    // whole report rather than emit a partial financial document.
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .ok_or_else(|| anyhow!("Entry has unrepresentable issued date: {}", millis))
}

fn write_summary_block(
    sheet: &mut Worksheet,
    start_row: u32,
    label: &str,
    totals: &ReportTotals,
    styles: &ReportStyles,
) -> Result<u32> {
    sheet.write_string_with_format(start_row, 0, label, &styles.section)?;

    let mut row = start_row + 1;
    for (line_label, value) in totals.summary_lines() {
        sheet.write_string(row, 0, line_label)?;
        sheet.write_number_with_format(row, 1, value, &styles.money)?;
        row += 1;
    }

    Ok(row)
}

/// Write the summary sheet and return the number of rows laid out:
/// title + header rows + blank + 6-row invoice block + blank + 6-row
/// income block.
fn write_summary_sheet(
    sheet: &mut Worksheet,
    header_info: &[(String, String)],
    invoice_totals: &ReportTotals,
    income_totals: &ReportTotals,
    styles: &ReportStyles,
) -> Result<u32> {
    sheet.set_name(SHEET_SUMMARY)?;
    sheet.set_column_width(0, 24)?;
    sheet.set_column_width(1, 30)?;

    let title = header_info
        .iter()
        .find(|(key, value)| key == "Report Title" && !value.trim().is_empty())
        .map(|(_, value)| value.as_str())
        .unwrap_or(DEFAULT_REPORT_TITLE);
    sheet.write_string_with_format(0, 0, title, &styles.title)?;

    // Header metadata, insertion order preserved
    let mut row: u32 = 1;
    for (key, value) in header_info {
        sheet.write_string(row, 0, key)?;
        sheet.write_string(row, 1, value)?;
        row += 1;
    }

    row += 1; // blank separator
    row = write_summary_block(sheet, row, "INVOICE TOTALS", invoice_totals, styles)?;

    row += 1; // blank separator
    row = write_summary_block(sheet, row, "INCOME TOTALS", income_totals, styles)?;

    Ok(row)
}

/// The stored tax-included flag is logically void on non-taxable rows;
/// the report shows it as false.
fn effective_tax_included<E: FinancialEntry>(entry: &E) -> bool {
    entry.tax_included() && !entry.non_taxable()
}

/// Write one detail sheet and return the number of rows laid out
/// (header row + one row per entry).
fn write_detail_sheet<E: FinancialEntry>(
    sheet: &mut Worksheet,
    name: &str,
    entries: &[E],
    styles: &ReportStyles,
) -> Result<u32> {
    sheet.set_name(name)?;

    for (col, header) in DETAIL_HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &styles.header)?;
    }

    sheet.set_column_width(0, 22)?; // Vendor/Client
    sheet.set_column_width(1, 16)?; // Category
    sheet.set_column_width(2, 12)?; // Issued Date
    sheet.set_column_width(3, 32)?; // Description
    for col in 4..8 {
        sheet.set_column_width(col, 13)?; // money columns
    }
    sheet.set_column_width(8, 12)?;
    sheet.set_column_width(9, 12)?;

    let mut row: u32 = 1;
    for entry in entries {
        let tb = entry.breakdown();

        sheet.write_string(row, 0, entry.counterparty())?;
        sheet.write_string(row, 1, entry.category())?;
        sheet.write_string(row, 2, format_issued_date(entry.issued_date())?)?;
        sheet.write_string(row, 3, entry.description())?;
        sheet.write_number_with_format(row, 4, tb.base, &styles.money)?;
        sheet.write_number_with_format(row, 5, tb.gst, &styles.money)?;
        sheet.write_number_with_format(row, 6, tb.qst, &styles.money)?;
        sheet.write_number_with_format(row, 7, tb.total(), &styles.money)?;
        sheet.write_string(row, 8, if effective_tax_included(entry) { "Yes" } else { "No" })?;
        sheet.write_string(row, 9, if entry.non_taxable() { "Yes" } else { "No" })?;
        row += 1;
    }

    Ok(row)
}

/// Build the three-sheet report in memory.
///
/// Empty collections are valid: the detail sheets keep their header row
/// and the summary blocks show zero totals.
pub fn build_report<I, N>(
    invoices: &[I],
    incomes: &[N],
    header_info: &[(String, String)],
) -> Result<Workbook>
where
    I: FinancialEntry,
    N: FinancialEntry,
{
    let styles = ReportStyles::new();
    let invoice_totals = ReportTotals::from_entries(invoices);
    let income_totals = ReportTotals::from_entries(incomes);

    let mut workbook = Workbook::new();

    write_summary_sheet(
        workbook.add_worksheet(),
        header_info,
        &invoice_totals,
        &income_totals,
        &styles,
    )?;
    write_detail_sheet(workbook.add_worksheet(), SHEET_INVOICES, invoices, &styles)?;
    write_detail_sheet(workbook.add_worksheet(), SHEET_INCOMES, incomes, &styles)?;

    Ok(workbook)
}

/// Build the report and write it to `path`.
///
/// I/O failures (unwritable path, full disk) surface as the error; the
/// caller should treat the output file as absent on failure.
pub fn export_report<I, N>(
    invoices: &[I],
    incomes: &[N],
    header_info: &[(String, String)],
    path: &Path,
) -> Result<()>
where
    I: FinancialEntry,
    N: FinancialEntry,
{
    let mut workbook = build_report(invoices, incomes, header_info)?;
    workbook
        .save(path)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    Ok(())
}
