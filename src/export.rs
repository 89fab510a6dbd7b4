use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::io::Write;
use std::path::Path;

use crate::models::Expense;

pub(crate) const HEADERS: [&str; 6] = [
    "Date",
    "Description",
    "Amount",
    "Category",
    "Payment Method",
    "Tags",
];

/// Write `expenses` as CSV with a header row. Returns the number of records.
pub(crate) fn write_expenses_csv<W: Write>(writer: W, expenses: &[Expense]) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADERS)
        .context("Failed to write CSV header")?;

    for e in expenses {
        let date = e.date.format("%Y-%m-%d").to_string();
        let amount = e.amount.to_string();
        let payment = e.payment_method.map(|m| m.as_str()).unwrap_or_default();
        let tags = e.tags.join("; ");
        wtr.write_record([
            date.as_str(),
            e.description.as_str(),
            amount.as_str(),
            e.category.as_str(),
            payment,
            tags.as_str(),
        ])
        .with_context(|| format!("Failed to write expense {}", e.id))?;
    }

    wtr.flush().context("Failed to flush CSV output")?;
    Ok(expenses.len())
}

pub(crate) fn export_expenses(path: &Path, expenses: &[Expense]) -> Result<usize> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_expenses_csv(file, expenses)
}

pub(crate) fn default_export_name(today: NaiveDate) -> String {
    format!("expenses-{}.csv", today.format("%Y-%m-%d"))
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;
