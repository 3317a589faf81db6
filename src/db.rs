// SQLite storage for invoices, incomes and the user-managed vocabularies
//
// Schema is created on open if missing. Dates are stored as UNIX epoch
// milliseconds (INTEGER) so range queries are plain integer comparisons.
// Range bounds are inclusive on both ends.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use rusqlite::{params, params_from_iter, types::Value, Connection};
use serde::Deserialize;
use std::path::Path;

use crate::entities::{Income, Invoice};

// ============================================================================
// SCHEMA
// ============================================================================

pub fn setup_database(conn: &Connection) -> Result<()> {
    // WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS invoices (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            vendor TEXT NOT NULL,
            category TEXT NOT NULL,
            issued_date INTEGER NOT NULL,
            description TEXT,
            amount REAL NOT NULL,
            tax_included INTEGER NOT NULL,
            non_taxable INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS incomes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            client TEXT NOT NULL,
            category TEXT NOT NULL,
            issued_date INTEGER NOT NULL,
            description TEXT,
            amount REAL NOT NULL,
            tax_included INTEGER NOT NULL,
            non_taxable INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )?;

    // User-managed open vocabularies for the entry forms
    conn.execute(
        "CREATE TABLE IF NOT EXISTS vendors (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT UNIQUE NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS clients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT UNIQUE NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT UNIQUE NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_invoices_issued_date ON invoices(issued_date)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_incomes_issued_date ON incomes(issued_date)",
        [],
    )?;

    Ok(())
}

// ============================================================================
// INVOICE CRUD
// ============================================================================

/// Insert an invoice and return the storage-assigned id.
pub fn insert_invoice(conn: &Connection, invoice: &Invoice) -> Result<i64> {
    conn.execute(
        "INSERT INTO invoices (vendor, category, issued_date, description, amount, tax_included, non_taxable)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            invoice.vendor,
            invoice.category,
            invoice.issued_date,
            invoice.description,
            invoice.amount,
            invoice.tax_included as i64,
            invoice.non_taxable as i64,
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

pub fn update_invoice(conn: &Connection, invoice: &Invoice) -> Result<()> {
    conn.execute(
        "UPDATE invoices
         SET vendor = ?1, category = ?2, issued_date = ?3, description = ?4,
             amount = ?5, tax_included = ?6, non_taxable = ?7
         WHERE id = ?8",
        params![
            invoice.vendor,
            invoice.category,
            invoice.issued_date,
            invoice.description,
            invoice.amount,
            invoice.tax_included as i64,
            invoice.non_taxable as i64,
            invoice.id,
        ],
    )?;

    Ok(())
}

pub fn delete_invoice(conn: &Connection, id: i64) -> Result<()> {
    conn.execute("DELETE FROM invoices WHERE id = ?1", params![id])?;
    Ok(())
}

/// Fetch invoices with optional equality filters and an inclusive date range.
///
/// Rows come back ordered by issued date then id; the report builder
/// preserves whatever order storage supplies.
pub fn fetch_invoices(
    conn: &Connection,
    vendor: Option<&str>,
    category: Option<&str>,
    from: Option<i64>,
    to: Option<i64>,
) -> Result<Vec<Invoice>> {
    let mut sql = String::from(
        "SELECT id, vendor, category, issued_date, description, amount, tax_included, non_taxable
         FROM invoices WHERE 1=1",
    );
    let mut bindings: Vec<Value> = Vec::new();

    if let Some(vendor) = vendor {
        sql.push_str(" AND vendor = ?");
        bindings.push(Value::Text(vendor.to_string()));
    }
    if let Some(category) = category {
        sql.push_str(" AND category = ?");
        bindings.push(Value::Text(category.to_string()));
    }
    if let Some(from) = from {
        sql.push_str(" AND issued_date >= ?");
        bindings.push(Value::Integer(from));
    }
    if let Some(to) = to {
        sql.push_str(" AND issued_date <= ?");
        bindings.push(Value::Integer(to));
    }

    sql.push_str(" ORDER BY issued_date, id");

    let mut stmt = conn.prepare(&sql)?;
    let invoices = stmt
        .query_map(params_from_iter(bindings), |row| {
            Ok(Invoice {
                id: row.get(0)?,
                vendor: row.get(1)?,
                category: row.get(2)?,
                issued_date: row.get(3)?,
                description: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
                amount: row.get(5)?,
                tax_included: row.get::<_, i64>(6)? != 0,
                non_taxable: row.get::<_, i64>(7)? != 0,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(invoices)
}

// ============================================================================
// INCOME CRUD
// ============================================================================

/// Insert an income record and return the storage-assigned id.
pub fn insert_income(conn: &Connection, income: &Income) -> Result<i64> {
    conn.execute(
        "INSERT INTO incomes (client, category, issued_date, description, amount, tax_included, non_taxable)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            income.client,
            income.category,
            income.issued_date,
            income.description,
            income.amount,
            income.tax_included as i64,
            income.non_taxable as i64,
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

pub fn update_income(conn: &Connection, income: &Income) -> Result<()> {
    conn.execute(
        "UPDATE incomes
         SET client = ?1, category = ?2, issued_date = ?3, description = ?4,
             amount = ?5, tax_included = ?6, non_taxable = ?7
         WHERE id = ?8",
        params![
            income.client,
            income.category,
            income.issued_date,
            income.description,
            income.amount,
            income.tax_included as i64,
            income.non_taxable as i64,
            income.id,
        ],
    )?;

    Ok(())
}

pub fn delete_income(conn: &Connection, id: i64) -> Result<()> {
    conn.execute("DELETE FROM incomes WHERE id = ?1", params![id])?;
    Ok(())
}

/// Fetch incomes over an inclusive date range. The income path has no
/// client/category filter.
pub fn fetch_incomes(conn: &Connection, from: Option<i64>, to: Option<i64>) -> Result<Vec<Income>> {
    let mut sql = String::from(
        "SELECT id, client, category, issued_date, description, amount, tax_included, non_taxable
         FROM incomes WHERE 1=1",
    );
    let mut bindings: Vec<Value> = Vec::new();

    if let Some(from) = from {
        sql.push_str(" AND issued_date >= ?");
        bindings.push(Value::Integer(from));
    }
    if let Some(to) = to {
        sql.push_str(" AND issued_date <= ?");
        bindings.push(Value::Integer(to));
    }

    sql.push_str(" ORDER BY issued_date, id");

    let mut stmt = conn.prepare(&sql)?;
    let incomes = stmt
        .query_map(params_from_iter(bindings), |row| {
            Ok(Income {
                id: row.get(0)?,
                client: row.get(1)?,
                category: row.get(2)?,
                issued_date: row.get(3)?,
                description: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
                amount: row.get(5)?,
                tax_included: row.get::<_, i64>(6)? != 0,
                non_taxable: row.get::<_, i64>(7)? != 0,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(incomes)
}

// ============================================================================
// VOCABULARIES (vendors / clients / categories)
// ============================================================================

fn add_name(conn: &Connection, table: &str, name: &str) -> Result<()> {
    // Adds are idempotent; re-adding an existing name is a no-op
    conn.execute(
        &format!("INSERT OR IGNORE INTO {} (name) VALUES (?1)", table),
        params![name],
    )?;
    Ok(())
}

fn remove_name(conn: &Connection, table: &str, name: &str) -> Result<()> {
    conn.execute(
        &format!("DELETE FROM {} WHERE name = ?1", table),
        params![name],
    )?;
    Ok(())
}

fn list_names(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("SELECT name FROM {} ORDER BY name", table))?;
    let names = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}

pub fn add_vendor(conn: &Connection, name: &str) -> Result<()> {
    add_name(conn, "vendors", name)
}

pub fn remove_vendor(conn: &Connection, name: &str) -> Result<()> {
    remove_name(conn, "vendors", name)
}

pub fn list_vendors(conn: &Connection) -> Result<Vec<String>> {
    list_names(conn, "vendors")
}

pub fn add_client(conn: &Connection, name: &str) -> Result<()> {
    add_name(conn, "clients", name)
}

pub fn remove_client(conn: &Connection, name: &str) -> Result<()> {
    remove_name(conn, "clients", name)
}

pub fn list_clients(conn: &Connection) -> Result<Vec<String>> {
    list_names(conn, "clients")
}

pub fn add_category(conn: &Connection, name: &str) -> Result<()> {
    add_name(conn, "categories", name)
}

pub fn remove_category(conn: &Connection, name: &str) -> Result<()> {
    remove_name(conn, "categories", name)
}

pub fn list_categories(conn: &Connection) -> Result<Vec<String>> {
    list_names(conn, "categories")
}

// ============================================================================
// CSV IMPORT
// ============================================================================

/// One row of an invoice import file.
#[derive(Debug, Deserialize)]
struct InvoiceRecord {
    #[serde(rename = "Vendor")]
    vendor: String,

    #[serde(rename = "Category")]
    category: String,

    /// yyyy-MM-dd
    #[serde(rename = "Issued Date")]
    issued_date: String,

    #[serde(rename = "Description", default)]
    description: String,

    #[serde(rename = "Amount")]
    amount: f64,

    /// Yes/No (also accepts true/false and 1/0)
    #[serde(rename = "Tax Included", default)]
    tax_included: String,

    #[serde(rename = "Non-Taxable", default)]
    non_taxable: String,
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "yes" | "true" | "1"
    )
}

/// Load invoices from a CSV file for bulk insertion.
///
/// Returned invoices carry the id placeholder (0); call `insert_invoice`
/// to persist them.
pub fn load_invoices_csv(csv_path: &Path) -> Result<Vec<Invoice>> {
    let mut rdr = csv::Reader::from_path(csv_path).context("Failed to open CSV file")?;

    let mut invoices = Vec::new();

    for result in rdr.deserialize() {
        let record: InvoiceRecord = result.context("Failed to deserialize invoice row")?;

        let date = NaiveDate::parse_from_str(record.issued_date.trim(), "%Y-%m-%d")
            .with_context(|| format!("Invalid issued date '{}'", record.issued_date))?;
        let issued_date = date.and_time(NaiveTime::MIN).and_utc().timestamp_millis();

        invoices.push(Invoice::new(
            record.vendor,
            record.category,
            issued_date,
            record.description,
            record.amount,
            parse_flag(&record.tax_included),
            parse_flag(&record.non_taxable),
        ));
    }

    Ok(invoices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        conn
    }

    fn test_invoice(vendor: &str, issued_date: i64, amount: f64) -> Invoice {
        Invoice::new(
            vendor.to_string(),
            "Office".to_string(),
            issued_date,
            "test".to_string(),
            amount,
            true,
            false,
        )
    }

    #[test]
    fn test_insert_assigns_id() {
        let conn = test_conn();

        let id1 = insert_invoice(&conn, &test_invoice("Staples", 1_000, 10.0)).unwrap();
        let id2 = insert_invoice(&conn, &test_invoice("Bell", 2_000, 20.0)).unwrap();

        assert!(id1 > 0, "storage must assign a positive id");
        assert_eq!(id2, id1 + 1);

        let fetched = fetch_invoices(&conn, None, None, None, None).unwrap();
        assert_eq!(fetched.len(), 2);
        assert_eq!(fetched[0].id, id1);
    }

    #[test]
    fn test_date_range_inclusive_both_ends() {
        let conn = test_conn();

        for ts in [1_000, 2_000, 3_000, 4_000] {
            insert_invoice(&conn, &test_invoice("Staples", ts, 10.0)).unwrap();
        }

        let in_range = fetch_invoices(&conn, None, None, Some(2_000), Some(3_000)).unwrap();
        let dates: Vec<i64> = in_range.iter().map(|inv| inv.issued_date).collect();

        // bounds themselves must be included
        assert_eq!(dates, vec![2_000, 3_000]);
    }

    #[test]
    fn test_vendor_and_category_filters() {
        let conn = test_conn();

        insert_invoice(&conn, &test_invoice("Staples", 1_000, 10.0)).unwrap();
        insert_invoice(&conn, &test_invoice("Bell", 2_000, 20.0)).unwrap();

        let mut rent = test_invoice("Bell", 3_000, 30.0);
        rent.category = "Telecom".to_string();
        insert_invoice(&conn, &rent).unwrap();

        let bell = fetch_invoices(&conn, Some("Bell"), None, None, None).unwrap();
        assert_eq!(bell.len(), 2);

        let bell_telecom =
            fetch_invoices(&conn, Some("Bell"), Some("Telecom"), None, None).unwrap();
        assert_eq!(bell_telecom.len(), 1);
        assert_eq!(bell_telecom[0].amount, 30.0);
    }

    #[test]
    fn test_invoice_update_and_delete() {
        let conn = test_conn();

        let mut invoice = test_invoice("Staples", 1_000, 10.0);
        invoice.id = insert_invoice(&conn, &invoice).unwrap();

        invoice.amount = 99.99;
        invoice.non_taxable = true;
        update_invoice(&conn, &invoice).unwrap();

        let fetched = fetch_invoices(&conn, None, None, None, None).unwrap();
        assert_eq!(fetched[0].amount, 99.99);
        assert!(fetched[0].non_taxable);

        delete_invoice(&conn, invoice.id).unwrap();
        assert!(fetch_invoices(&conn, None, None, None, None)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_income_roundtrip_and_range() {
        let conn = test_conn();

        let mut income = Income::new(
            "Acme Corp".to_string(),
            "Consulting".to_string(),
            5_000,
            "Retainer".to_string(),
            200.0,
            false,
            false,
        );
        income.id = insert_income(&conn, &income).unwrap();

        let all = fetch_incomes(&conn, None, None).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], income);

        // outside the range
        assert!(fetch_incomes(&conn, Some(6_000), None).unwrap().is_empty());

        delete_income(&conn, income.id).unwrap();
        assert!(fetch_incomes(&conn, None, None).unwrap().is_empty());
    }

    #[test]
    fn test_vocabularies_sorted_and_idempotent() {
        let conn = test_conn();

        add_category(&conn, "Office").unwrap();
        add_category(&conn, "Consulting").unwrap();
        add_category(&conn, "Office").unwrap(); // duplicate, ignored

        assert_eq!(
            list_categories(&conn).unwrap(),
            vec!["Consulting".to_string(), "Office".to_string()]
        );

        remove_category(&conn, "Office").unwrap();
        assert_eq!(list_categories(&conn).unwrap(), vec!["Consulting".to_string()]);

        add_vendor(&conn, "Staples").unwrap();
        add_client(&conn, "Acme Corp").unwrap();
        assert_eq!(list_vendors(&conn).unwrap(), vec!["Staples".to_string()]);
        assert_eq!(list_clients(&conn).unwrap(), vec!["Acme Corp".to_string()]);
    }

    #[test]
    fn test_load_invoices_csv() {
        let path = std::env::temp_dir().join("count_beans_import_test.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "Vendor,Category,Issued Date,Description,Amount,Tax Included,Non-Taxable"
        )
        .unwrap();
        writeln!(file, "Staples,Office,2024-03-15,Paper,105.00,Yes,No").unwrap();
        writeln!(file, "City of Montreal,Taxes,2024-03-20,,50.00,No,Yes").unwrap();
        drop(file);

        let invoices = load_invoices_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(invoices.len(), 2);
        assert_eq!(invoices[0].vendor, "Staples");
        assert!(invoices[0].tax_included);
        assert!(!invoices[0].non_taxable);
        assert!(invoices[1].non_taxable);
        assert_eq!(invoices[1].description, "");

        // 2024-03-15T00:00:00Z in millis
        assert_eq!(invoices[0].issued_date, 1_710_460_800_000);
    }
}
