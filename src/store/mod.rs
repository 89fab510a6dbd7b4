//! Record stores over the injected [`Storage`](crate::storage::Storage).
//!
//! Stores hold no records in memory: every call reads the whole collection,
//! works on it and writes it back. Reads that cannot decode the collection
//! degrade to an empty result; writes never overwrite a collection they could
//! not read. Single records that do not decode are left out of results and
//! written back unchanged.

mod budget;
mod expense;

pub use budget::BudgetStore;
pub use expense::ExpenseStore;

use chrono::Utc;
use std::collections::HashSet;

pub const EXPENSES_KEY: &str = "expenses";
pub const BUDGETS_KEY: &str = "budgets";

/// How much checking `create`/`update` perform beyond required fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationMode {
    /// Required-field presence (and budget uniqueness) only.
    #[default]
    Lenient,
    /// Also reject records that fail the full `validate()` check.
    Strict,
}

impl ValidationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lenient => "lenient",
            Self::Strict => "strict",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "lenient" => Some(Self::Lenient),
            "strict" => Some(Self::Strict),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreConfig {
    pub validation: ValidationMode,
}

/// Ids are compared after trimming so `" 17 "` finds `"17"`.
pub(crate) fn normalize_id(id: &str) -> &str {
    id.trim()
}

/// Time-derived id: the current Unix time in milliseconds, bumped past any
/// id already taken in the collection.
pub(crate) fn next_id<'a>(existing: impl IntoIterator<Item = &'a str>) -> String {
    let taken: HashSet<&str> = existing.into_iter().collect();
    let mut candidate = Utc::now().timestamp_millis();
    loop {
        let id = candidate.to_string();
        if !taken.contains(id.as_str()) {
            return id;
        }
        candidate += 1;
    }
}
