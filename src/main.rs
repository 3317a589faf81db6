use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveTime};
use rusqlite::Connection;
use std::env;
use std::path::{Path, PathBuf};

use count_beans::{
    export_report, fetch_incomes, fetch_invoices, insert_invoice, load_invoices_csv,
    setup_database, ReportHeader,
};

const DEFAULT_DB: &str = "beans.db";

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("import") => run_import(&args[2..]),
        Some("export") => run_export(&args[2..]),
        _ => {
            print_usage();
            Ok(())
        }
    }
}

fn print_usage() {
    println!("count-beans {}", count_beans::VERSION);
    println!();
    println!("Usage:");
    println!("  count-beans import <invoices.csv> [db]");
    println!("  count-beans export <from yyyy-mm-dd> <to yyyy-mm-dd> <out.xlsx> [db]");
    println!();
    println!("The database defaults to ./{}", DEFAULT_DB);
}

fn open_db(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open database {}", path.display()))?;
    setup_database(&conn)?;
    Ok(conn)
}

fn run_import(args: &[String]) -> Result<()> {
    let Some(csv_path) = args.first() else {
        bail!("import needs a CSV file path");
    };
    let db_path = args
        .get(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB));

    println!("📂 Loading invoices from {}...", csv_path);
    let invoices = load_invoices_csv(Path::new(csv_path))?;
    println!("✓ Parsed {} invoices", invoices.len());

    let conn = open_db(&db_path)?;
    let mut inserted = 0;
    for invoice in &invoices {
        insert_invoice(&conn, invoice)?;
        inserted += 1;
    }

    println!("✓ Inserted {} invoices into {}", inserted, db_path.display());
    Ok(())
}

/// Start of the given day, UTC, in epoch milliseconds.
fn day_start_millis(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

/// Last millisecond of the given day, so the range stays inclusive.
fn day_end_millis(date: NaiveDate) -> i64 {
    day_start_millis(date) + 86_400_000 - 1
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected yyyy-mm-dd", value))
}

fn run_export(args: &[String]) -> Result<()> {
    if args.len() < 3 {
        bail!("export needs <from> <to> <out.xlsx>");
    }
    let (from, to, out) = (&args[0], &args[1], &args[2]);
    let db_path = args
        .get(3)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB));

    let from_ts = day_start_millis(parse_date(from)?);
    let to_ts = day_end_millis(parse_date(to)?);

    let conn = open_db(&db_path)?;

    println!("📊 Fetching entries from {} to {}...", from, to);
    let invoices = fetch_invoices(&conn, None, None, Some(from_ts), Some(to_ts))?;
    let incomes = fetch_incomes(&conn, Some(from_ts), Some(to_ts))?;
    println!("✓ {} invoices, {} incomes", invoices.len(), incomes.len());

    let header = ReportHeader::load(Path::new(count_beans::settings::SETTINGS_FILE))?;
    let out_path = Path::new(out);

    export_report(&invoices, &incomes, &header.header_info(), out_path)?;
    println!("✓ Report written to {}", out_path.display());

    Ok(())
}
