use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{is_canonical_month, Category};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: String,
    pub category: Category,
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_limit: Decimal,
    /// Format: "YYYY-MM-01"
    pub month: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewBudget {
    pub id: Option<String>,
    pub category: Option<Category>,
    pub monthly_limit: Option<Decimal>,
    pub month: Option<String>,
}

impl NewBudget {
    pub fn new(category: Category, monthly_limit: Decimal, month: impl Into<String>) -> Self {
        Self {
            id: None,
            category: Some(category),
            monthly_limit: Some(monthly_limit),
            month: Some(month.into()),
        }
    }

    pub(crate) fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.category.is_none() {
            missing.push("category");
        }
        // A zero limit counts as not set.
        if self.monthly_limit.map_or(true, |l| l.is_zero()) {
            missing.push("monthly_limit");
        }
        if self.month.as_deref().map_or(true, str::is_empty) {
            missing.push("month");
        }
        missing
    }

    /// Human-readable problems with this budget. Pure; never persists.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.category.is_none() {
            errors.push("Category is required".to_string());
        }

        match self.monthly_limit {
            Some(limit) if limit > Decimal::ZERO => {}
            _ => errors.push("Monthly limit must be a positive number".to_string()),
        }

        match self.month.as_deref() {
            None | Some("") => errors.push("Month is required".to_string()),
            Some(m) if !is_canonical_month(m) => {
                errors.push("Month must be in YYYY-MM-01 format".to_string())
            }
            Some(_) => {}
        }

        errors
    }
}

impl From<&Budget> for NewBudget {
    fn from(b: &Budget) -> Self {
        Self {
            id: Some(b.id.clone()),
            category: Some(b.category),
            monthly_limit: Some(b.monthly_limit),
            month: Some(b.month.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BudgetUpdate {
    pub category: Option<Category>,
    pub monthly_limit: Option<Decimal>,
    pub month: Option<String>,
}

impl BudgetUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether this update touches the (category, month) uniqueness key.
    pub(crate) fn changes_key(&self) -> bool {
        self.category.is_some() || self.month.is_some()
    }

    pub(crate) fn apply(&self, budget: &mut Budget) {
        if let Some(category) = self.category {
            budget.category = category;
        }
        if let Some(limit) = self.monthly_limit {
            budget.monthly_limit = limit;
        }
        if let Some(month) = &self.month {
            budget.month = month.clone();
        }
    }
}
