use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize};

use super::{Category, PaymentMethod};

/// A persisted expense record.
///
/// Unknown fields found in storage are kept in `extra` so a read-modify-write
/// cycle never drops data written by a newer client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub description: String,
    pub category: Category,
    pub date: NaiveDate,
    #[serde(
        default,
        deserialize_with = "blank_payment_method",
        skip_serializing_if = "Option::is_none"
    )]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// An unselected payment method is stored as `""` by the web form; read it,
/// like `null`, as no payment method. Any other value must be a known key.
fn blank_payment_method<'de, D>(deserializer: D) -> Result<Option<PaymentMethod>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(key) if key.trim().is_empty() => Ok(None),
        Some(key) => PaymentMethod::from_key(&key)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("unknown payment method '{key}'"))),
    }
}

/// Input for `ExpenseStore::create`. Required fields are optional here so
/// that presence can be checked and reported.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewExpense {
    pub id: Option<String>,
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub date: Option<NaiveDate>,
    pub payment_method: Option<PaymentMethod>,
    pub tags: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl NewExpense {
    pub fn new(
        amount: Decimal,
        description: impl Into<String>,
        category: Category,
        date: NaiveDate,
    ) -> Self {
        Self {
            amount: Some(amount),
            description: Some(description.into()),
            category: Some(category),
            date: Some(date),
            ..Self::default()
        }
    }

    pub fn with_payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub(crate) fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.amount.is_none() {
            missing.push("amount");
        }
        if self.description.is_none() {
            missing.push("description");
        }
        if self.category.is_none() {
            missing.push("category");
        }
        if self.date.is_none() {
            missing.push("date");
        }
        missing
    }

    /// Full field validation. Returns one message per problem found.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        match self.amount {
            Some(a) if a > Decimal::ZERO => {}
            _ => errors.push("Amount must be a positive number".to_string()),
        }
        if self.description.as_deref().map_or(true, |d| d.trim().is_empty()) {
            errors.push("Description is required".to_string());
        }
        if self.category.is_none() {
            errors.push("Category is required".to_string());
        }
        if self.date.is_none() {
            errors.push("Date is required".to_string());
        }
        errors
    }
}

impl From<&Expense> for NewExpense {
    fn from(e: &Expense) -> Self {
        Self {
            id: Some(e.id.clone()),
            amount: Some(e.amount),
            description: Some(e.description.clone()),
            category: Some(e.category),
            date: Some(e.date),
            payment_method: e.payment_method,
            tags: e.tags.clone(),
            created_at: Some(e.created_at),
        }
    }
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseUpdate {
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub date: Option<NaiveDate>,
    pub payment_method: Option<PaymentMethod>,
    pub tags: Option<Vec<String>>,
}

impl ExpenseUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn apply(&self, expense: &mut Expense) {
        if let Some(amount) = self.amount {
            expense.amount = amount;
        }
        if let Some(description) = &self.description {
            expense.description = description.clone();
        }
        if let Some(category) = self.category {
            expense.category = category;
        }
        if let Some(date) = self.date {
            expense.date = date;
        }
        if let Some(method) = self.payment_method {
            expense.payment_method = Some(method);
        }
        if let Some(tags) = &self.tags {
            expense.tags = tags.clone();
        }
    }
}
