//! Aggregate views over expense and budget collections.
//!
//! Everything here works on records already read from the stores; nothing
//! touches storage. Cross-referencing budgets and expenses happens only here.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::models::{month_bounds, month_of, shift_month, Budget, Category, Expense};

/// Reporting window relative to a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    ThisMonth,
    LastMonth,
    LastThreeMonths,
    #[default]
    All,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ThisMonth => "this_month",
            Self::LastMonth => "last_month",
            Self::LastThreeMonths => "last_3_months",
            Self::All => "all",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "this_month" | "this-month" => Some(Self::ThisMonth),
            "last_month" | "last-month" => Some(Self::LastMonth),
            "last_3_months" | "last-3-months" | "quarter" => Some(Self::LastThreeMonths),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            Self::All => true,
            Self::ThisMonth => month_of(date) == month_of(today),
            Self::LastMonth => {
                shift_month(&month_of(today), -1).is_some_and(|m| month_of(date) == m)
            }
            // Rolling window: anything on or after the same day three months back.
            Self::LastThreeMonths => today
                .checked_sub_months(Months::new(3))
                .is_some_and(|start| date >= start),
        }
    }
}

/// Optional narrowing applied on top of a store query.
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    pub category: Option<Category>,
    pub period: Period,
    /// Case-insensitive substring of the description or any tag.
    pub search: Option<String>,
}

impl ExpenseFilter {
    pub fn apply(&self, expenses: &[Expense], today: NaiveDate) -> Vec<Expense> {
        let needle = self.search.as_ref().map(|s| s.trim().to_lowercase());
        expenses
            .iter()
            .filter(|e| self.category.map_or(true, |c| e.category == c))
            .filter(|e| self.period.contains(e.date, today))
            .filter(|e| match needle.as_deref() {
                None | Some("") => true,
                Some(n) => {
                    e.description.to_lowercase().contains(n)
                        || e.tags.iter().any(|t| t.to_lowercase().contains(n))
                }
            })
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub total: Decimal,
    pub count: usize,
    pub average: Decimal,
}

pub fn summarize(expenses: &[Expense]) -> Summary {
    let total: Decimal = expenses.iter().map(|e| e.amount).sum();
    let count = expenses.len();
    let average = if count == 0 {
        Decimal::ZERO
    } else {
        (total / Decimal::from(count)).round_dp(2)
    };
    Summary {
        total,
        count,
        average,
    }
}

/// Spending per category, largest first.
pub fn spending_by_category(expenses: &[Expense]) -> Vec<(Category, Decimal)> {
    let mut totals: HashMap<Category, Decimal> = HashMap::new();
    for e in expenses {
        *totals.entry(e.category).or_default() += e.amount;
    }
    let mut result: Vec<_> = totals.into_iter().collect();
    result.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    result
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthTotal {
    /// Canonical month key.
    pub month: String,
    pub total: Decimal,
    pub count: usize,
}

/// Totals for the `months` months ending with `last_month`, oldest first.
/// Months without expenses are included with a zero total.
pub fn monthly_trend(expenses: &[Expense], last_month: &str, months: usize) -> Vec<MonthTotal> {
    let mut result = Vec::with_capacity(months);
    for back in (0..months).rev() {
        let Ok(delta) = i32::try_from(back) else {
            continue;
        };
        let Some(month) = shift_month(last_month, -delta) else {
            continue;
        };
        let in_month: Vec<&Expense> = expenses
            .iter()
            .filter(|e| month_of(e.date) == month)
            .collect();
        result.push(MonthTotal {
            total: in_month.iter().map(|e| e.amount).sum(),
            count: in_month.len(),
            month,
        });
    }
    result
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetProgress {
    pub budget_id: String,
    pub category: Category,
    pub limit: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    /// Share of the limit used, in percent with one decimal.
    pub percent_used: Decimal,
}

impl BudgetProgress {
    pub fn is_over_budget(&self) -> bool {
        self.spent > self.limit
    }
}

/// Spending against each budget set for `month`.
pub fn budget_progress(budgets: &[Budget], expenses: &[Expense], month: &str) -> Vec<BudgetProgress> {
    let Some((start, end)) = month_bounds(month) else {
        return Vec::new();
    };
    budgets
        .iter()
        .filter(|b| b.month == month)
        .map(|b| {
            let spent: Decimal = expenses
                .iter()
                .filter(|e| e.category == b.category && e.date >= start && e.date <= end)
                .map(|e| e.amount)
                .sum();
            let percent_used = spent
                .checked_div(b.monthly_limit)
                .map(|ratio| (ratio * Decimal::ONE_HUNDRED).round_dp(1))
                .unwrap_or(Decimal::ZERO);
            BudgetProgress {
                budget_id: b.id.clone(),
                category: b.category,
                limit: b.monthly_limit,
                spent,
                remaining: b.monthly_limit - spent,
                percent_used,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthOverMonth {
    pub current: Decimal,
    pub previous: Decimal,
    /// `None` when the previous month had no spending.
    pub change_percent: Option<Decimal>,
}

pub fn month_over_month(expenses: &[Expense], month: &str) -> MonthOverMonth {
    let total_for = |m: &str| -> Decimal {
        expenses
            .iter()
            .filter(|e| month_of(e.date) == m)
            .map(|e| e.amount)
            .sum()
    };
    let current = total_for(month);
    let previous = shift_month(month, -1)
        .map(|m| total_for(&m))
        .unwrap_or(Decimal::ZERO);
    let change_percent = if previous.is_zero() {
        None
    } else {
        Some(((current - previous) / previous * Decimal::ONE_HUNDRED).round_dp(1))
    };
    MonthOverMonth {
        current,
        previous,
        change_percent,
    }
}

#[cfg(test)]
mod tests;
