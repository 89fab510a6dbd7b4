mod cli;

pub(crate) use cli::as_cli;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::models::{canonical_month, Category, PaymentMethod};
use crate::storage::Storage;
use crate::store::{BudgetStore, ExpenseStore, StoreConfig};

/// Both stores over one storage handle.
pub(crate) struct Books<'a, S: Storage + ?Sized> {
    pub(crate) expenses: ExpenseStore<'a, S>,
    pub(crate) budgets: BudgetStore<'a, S>,
}

impl<'a, S: Storage + ?Sized> Books<'a, S> {
    pub(crate) fn new(storage: &'a S, config: StoreConfig) -> Self {
        Self {
            expenses: ExpenseStore::new(storage, config),
            budgets: BudgetStore::new(storage, config),
        }
    }
}

// ── Argument helpers ─────────────────────────────────────────

/// Value following `flag`, e.g. `--month 2024-01`.
pub(crate) fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

/// Arguments that are neither `--flags` nor their values.
pub(crate) fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg.starts_with("--") {
            iter.next();
        } else {
            out.push(arg.as_str());
        }
    }
    out
}

pub(crate) fn parse_amount(s: &str) -> Result<Decimal> {
    let cleaned = s.replace(['$', ','], "");
    Decimal::from_str(cleaned.trim()).with_context(|| format!("Invalid amount '{s}'"))
}

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate> {
    for fmt in &["%Y-%m-%d", "%m/%d/%Y", "%m-%d-%Y", "%m/%d/%y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s.trim(), fmt) {
            return Ok(d);
        }
    }
    anyhow::bail!("Could not parse date: {s}")
}

pub(crate) fn parse_category(s: &str) -> Result<Category> {
    Category::parse(s).with_context(|| {
        let keys: Vec<&str> = Category::all().iter().map(|c| c.as_str()).collect();
        format!("Unknown category '{s}'. Expected one of: {}", keys.join(", "))
    })
}

pub(crate) fn parse_payment_method(s: &str) -> Result<PaymentMethod> {
    PaymentMethod::parse(s).with_context(|| {
        let keys: Vec<&str> = PaymentMethod::all().iter().map(|m| m.as_str()).collect();
        format!("Unknown payment method '{s}'. Expected one of: {}", keys.join(", "))
    })
}

pub(crate) fn parse_month(s: &str) -> Result<String> {
    canonical_month(s).with_context(|| format!("Invalid month '{s}' (expected YYYY-MM)"))
}

pub(crate) fn parse_tags(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
