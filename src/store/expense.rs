use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::{next_id, normalize_id, StoreConfig, ValidationMode, EXPENSES_KEY};
use crate::error::{Result, StoreError};
use crate::models::{month_bounds, Category, Expense, ExpenseUpdate, NewExpense};
use crate::storage::{load_collection, save_collection, Collection, Storage};

pub struct ExpenseStore<'a, S: Storage + ?Sized> {
    storage: &'a S,
    config: StoreConfig,
}

impl<'a, S: Storage + ?Sized> ExpenseStore<'a, S> {
    pub fn new(storage: &'a S, config: StoreConfig) -> Self {
        Self { storage, config }
    }

    /// Full field validation, independent of the configured mode.
    pub fn validate(data: &NewExpense) -> Vec<String> {
        data.validate()
    }

    pub fn create(&self, data: NewExpense) -> Result<Expense> {
        let missing = data.missing_fields();
        if !missing.is_empty() {
            warn!(?missing, "Rejected expense with missing fields");
            return Err(StoreError::missing_fields(&missing));
        }

        if self.config.validation == ValidationMode::Strict {
            let problems = data.validate();
            if !problems.is_empty() {
                warn!(?problems, "Rejected invalid expense");
                return Err(StoreError::Validation(problems));
            }
        }

        let NewExpense {
            id,
            amount: Some(amount),
            description: Some(description),
            category: Some(category),
            date: Some(date),
            payment_method,
            tags,
            created_at,
        } = data
        else {
            return Err(StoreError::missing_fields(&missing));
        };

        let mut expenses = self.load()?;
        let id = match id {
            Some(id) => {
                let id = normalize_id(&id).to_string();
                if expenses.ids(|e| e.id.as_str()).any(|taken| taken == id) {
                    return Err(StoreError::Conflict(format!(
                        "Expense with ID {id} already exists"
                    )));
                }
                id
            }
            None => next_id(expenses.ids(|e| e.id.as_str())),
        };

        let expense = Expense {
            id,
            amount,
            description,
            category,
            date,
            payment_method,
            tags,
            created_at: created_at.unwrap_or_else(Utc::now),
            extra: serde_json::Map::new(),
        };
        expenses.push(expense.clone());
        save_collection(self.storage, EXPENSES_KEY, &expenses)?;
        debug!(id = %expense.id, "Created expense");
        Ok(expense)
    }

    /// Every expense in insertion order. Unreadable storage yields an empty
    /// list; use [`try_get_all`](Self::try_get_all) to tell the two apart.
    pub fn get_all(&self) -> Vec<Expense> {
        self.try_get_all().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to read expenses, treating as empty");
            Vec::new()
        })
    }

    pub fn try_get_all(&self) -> Result<Vec<Expense>> {
        Ok(self.load()?.into_records())
    }

    fn load(&self) -> Result<Collection<Expense>> {
        Ok(load_collection(self.storage, EXPENSES_KEY)?)
    }

    pub fn get(&self, id: &str) -> Result<Expense> {
        let id = normalize_id(id);
        self.get_all()
            .into_iter()
            .find(|e| e.id == id)
            .ok_or_else(|| StoreError::NotFound {
                kind: "Expense",
                id: id.to_string(),
            })
    }

    /// Expenses dated within `[start, end]`, inclusive on both ends.
    pub fn get_by_date_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<Expense> {
        self.get_all()
            .into_iter()
            .filter(|e| e.date >= start && e.date <= end)
            .collect()
    }

    pub fn get_by_category(&self, category: Category) -> Vec<Expense> {
        self.get_all()
            .into_iter()
            .filter(|e| e.category == category)
            .collect()
    }

    /// Expenses dated within a canonical month (`YYYY-MM-01`).
    pub fn get_by_month(&self, month: &str) -> Vec<Expense> {
        match month_bounds(month) {
            Some((start, end)) => self.get_by_date_range(start, end),
            None => Vec::new(),
        }
    }

    pub fn update(&self, id: &str, changes: ExpenseUpdate) -> Result<Expense> {
        let id = normalize_id(id);
        let mut expenses = self.load()?;
        let Some(mut updated) = expenses.records().find(|e| e.id == id).cloned() else {
            return Err(StoreError::NotFound {
                kind: "Expense",
                id: id.to_string(),
            });
        };
        changes.apply(&mut updated);

        if self.config.validation == ValidationMode::Strict {
            let problems = NewExpense::from(&updated).validate();
            if !problems.is_empty() {
                warn!(id, ?problems, "Rejected invalid expense update");
                return Err(StoreError::Validation(problems));
            }
        }

        expenses.replace(|e| e.id == id, updated.clone());
        save_collection(self.storage, EXPENSES_KEY, &expenses)?;
        debug!(id, "Updated expense");
        Ok(updated)
    }

    /// Remove the expense with `id`. Returns whether anything was removed;
    /// an unknown id is not an error.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let id = normalize_id(id);
        let mut expenses = self.load()?;
        if expenses.remove(|e| e.id == id) == 0 {
            debug!(id, "Delete of unknown expense ignored");
            return Ok(false);
        }
        save_collection(self.storage, EXPENSES_KEY, &expenses)?;
        debug!(id, "Deleted expense");
        Ok(true)
    }

    /// Sum of every stored amount.
    pub fn total(&self) -> Decimal {
        self.get_all().iter().map(|e| e.amount).sum()
    }

    pub fn count(&self) -> usize {
        self.get_all().len()
    }
}
