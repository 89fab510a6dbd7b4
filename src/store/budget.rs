use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::{next_id, normalize_id, StoreConfig, ValidationMode, BUDGETS_KEY};
use crate::error::{Result, StoreError};
use crate::models::{Budget, BudgetUpdate, Category, NewBudget};
use crate::storage::{load_collection, save_collection, Collection, Storage};

/// Monthly per-category limits. At most one budget exists for any
/// (category, month) pair.
pub struct BudgetStore<'a, S: Storage + ?Sized> {
    storage: &'a S,
    config: StoreConfig,
}

fn conflict(category: Category, month: &str) -> StoreError {
    StoreError::Conflict(format!(
        "Budget already exists for {} in {month}",
        category.as_str()
    ))
}

impl<'a, S: Storage + ?Sized> BudgetStore<'a, S> {
    pub fn new(storage: &'a S, config: StoreConfig) -> Self {
        Self { storage, config }
    }

    /// Problems with `data`. Pure: never applied automatically unless the
    /// store runs in strict mode.
    pub fn validate(data: &NewBudget) -> Vec<String> {
        data.validate()
    }

    pub fn create(&self, data: NewBudget) -> Result<Budget> {
        let missing = data.missing_fields();
        if !missing.is_empty() {
            warn!(?missing, "Rejected budget with missing fields");
            return Err(StoreError::missing_fields(&missing));
        }

        if self.config.validation == ValidationMode::Strict {
            let problems = data.validate();
            if !problems.is_empty() {
                warn!(?problems, "Rejected invalid budget");
                return Err(StoreError::Validation(problems));
            }
        }

        let NewBudget {
            id,
            category: Some(category),
            monthly_limit: Some(monthly_limit),
            month: Some(month),
        } = data
        else {
            return Err(StoreError::missing_fields(&missing));
        };

        let mut budgets = self.load()?;
        if budgets
            .records()
            .any(|b| b.category == category && b.month == month)
        {
            warn!(category = category.as_str(), month = %month, "Duplicate budget rejected");
            return Err(conflict(category, &month));
        }

        let id = match id {
            Some(id) => {
                let id = normalize_id(&id).to_string();
                if budgets.ids(|b| b.id.as_str()).any(|taken| taken == id) {
                    return Err(StoreError::Conflict(format!(
                        "Budget with ID {id} already exists"
                    )));
                }
                id
            }
            None => next_id(budgets.ids(|b| b.id.as_str())),
        };

        let now = Utc::now();
        let budget = Budget {
            id,
            category,
            monthly_limit,
            month,
            created_at: now,
            updated_at: now,
            extra: serde_json::Map::new(),
        };
        budgets.push(budget.clone());
        save_collection(self.storage, BUDGETS_KEY, &budgets)?;
        debug!(id = %budget.id, "Created budget");
        Ok(budget)
    }

    pub fn get_all(&self) -> Vec<Budget> {
        self.try_get_all().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to read budgets, treating as empty");
            Vec::new()
        })
    }

    pub fn try_get_all(&self) -> Result<Vec<Budget>> {
        Ok(self.load()?.into_records())
    }

    fn load(&self) -> Result<Collection<Budget>> {
        Ok(load_collection(self.storage, BUDGETS_KEY)?)
    }

    pub fn get(&self, id: &str) -> Result<Budget> {
        let id = normalize_id(id);
        self.get_all()
            .into_iter()
            .find(|b| b.id == id)
            .ok_or_else(|| StoreError::NotFound {
                kind: "Budget",
                id: id.to_string(),
            })
    }

    pub fn get_by_category_and_month(&self, category: Category, month: &str) -> Option<Budget> {
        self.get_all()
            .into_iter()
            .find(|b| b.category == category && b.month == month)
    }

    pub fn get_by_month(&self, month: &str) -> Vec<Budget> {
        self.get_all()
            .into_iter()
            .filter(|b| b.month == month)
            .collect()
    }

    pub fn get_by_category(&self, category: Category) -> Vec<Budget> {
        self.get_all()
            .into_iter()
            .filter(|b| b.category == category)
            .collect()
    }

    /// Merge `changes` into the budget with `id`. When the category or month
    /// changes, the resulting pair must not belong to another budget.
    pub fn update(&self, id: &str, changes: BudgetUpdate) -> Result<Budget> {
        let id = normalize_id(id);
        let mut budgets = self.load()?;
        let Some(mut updated) = budgets.records().find(|b| b.id == id).cloned() else {
            return Err(StoreError::NotFound {
                kind: "Budget",
                id: id.to_string(),
            });
        };
        changes.apply(&mut updated);

        if changes.changes_key()
            && budgets.records().any(|b| {
                b.id != id && b.category == updated.category && b.month == updated.month
            })
        {
            warn!(id, "Budget update would duplicate an existing budget");
            return Err(conflict(updated.category, &updated.month));
        }

        if self.config.validation == ValidationMode::Strict {
            let problems = NewBudget::from(&updated).validate();
            if !problems.is_empty() {
                warn!(id, ?problems, "Rejected invalid budget update");
                return Err(StoreError::Validation(problems));
            }
        }

        updated.updated_at = Utc::now();
        budgets.replace(|b| b.id == id, updated.clone());
        save_collection(self.storage, BUDGETS_KEY, &budgets)?;
        debug!(id, "Updated budget");
        Ok(updated)
    }

    pub fn delete(&self, id: &str) -> Result<bool> {
        let id = normalize_id(id);
        let mut budgets = self.load()?;
        if budgets.remove(|b| b.id == id) == 0 {
            debug!(id, "Delete of unknown budget ignored");
            return Ok(false);
        }
        save_collection(self.storage, BUDGETS_KEY, &budgets)?;
        debug!(id, "Deleted budget");
        Ok(true)
    }

    /// Sum of the limits of every budget whose month is exactly `month`.
    pub fn get_total_monthly_budget(&self, month: &str) -> Decimal {
        self.get_by_month(month).iter().map(|b| b.monthly_limit).sum()
    }
}
