#![allow(clippy::unwrap_used)]

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn expense(amount: Decimal, category: Category, day: &str) -> Expense {
    Expense {
        id: day.to_string(),
        amount,
        description: format!("{} on {day}", category.as_str()),
        category,
        date: date(day),
        payment_method: None,
        tags: Vec::new(),
        created_at: Utc::now(),
        extra: serde_json::Map::new(),
    }
}

fn budget(category: Category, limit: Decimal, month: &str) -> Budget {
    Budget {
        id: format!("{}-{month}", category.as_str()),
        category,
        monthly_limit: limit,
        month: month.to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
        extra: serde_json::Map::new(),
    }
}

fn sample() -> Vec<Expense> {
    vec![
        expense(dec!(12.50), Category::FoodDining, "2024-01-05"),
        expense(dec!(60), Category::Groceries, "2024-01-12"),
        expense(dec!(20), Category::FoodDining, "2024-01-28"),
        expense(dec!(80), Category::Utilities, "2024-02-10"),
        expense(dec!(7.25), Category::Entertainment, "2024-03-01"),
    ]
}

// ── Period ────────────────────────────────────────────────────

#[test]
fn test_period_parse() {
    assert_eq!(Period::parse("this_month"), Some(Period::ThisMonth));
    assert_eq!(Period::parse("last-month"), Some(Period::LastMonth));
    assert_eq!(Period::parse("last_3_months"), Some(Period::LastThreeMonths));
    assert_eq!(Period::parse("ALL"), Some(Period::All));
    assert_eq!(Period::parse("fortnight"), None);
    for p in [Period::ThisMonth, Period::LastMonth, Period::LastThreeMonths, Period::All] {
        assert_eq!(Period::parse(p.as_str()), Some(p));
    }
}

#[test]
fn test_period_contains() {
    let today = date("2024-03-15");
    assert!(Period::ThisMonth.contains(date("2024-03-01"), today));
    assert!(!Period::ThisMonth.contains(date("2024-02-29"), today));

    assert!(Period::LastMonth.contains(date("2024-02-01"), today));
    assert!(Period::LastMonth.contains(date("2024-02-29"), today));
    assert!(!Period::LastMonth.contains(date("2024-03-01"), today));

    assert!(Period::LastThreeMonths.contains(date("2023-12-15"), today));
    assert!(!Period::LastThreeMonths.contains(date("2023-12-14"), today));

    assert!(Period::All.contains(date("1990-01-01"), today));
}

#[test]
fn test_last_month_across_year_boundary() {
    let today = date("2024-01-10");
    assert!(Period::LastMonth.contains(date("2023-12-31"), today));
    assert!(!Period::LastMonth.contains(date("2024-01-01"), today));
}

// ── ExpenseFilter ─────────────────────────────────────────────

#[test]
fn test_filter_default_keeps_everything() {
    let all = sample();
    let filtered = ExpenseFilter::default().apply(&all, date("2024-03-15"));
    assert_eq!(filtered, all);
}

#[test]
fn test_filter_by_category_and_period() {
    let filter = ExpenseFilter {
        category: Some(Category::FoodDining),
        period: Period::LastMonth,
        search: None,
    };
    let filtered = filter.apply(&sample(), date("2024-02-20"));
    assert_eq!(filtered.len(), 2);
    assert!(filtered.iter().all(|e| e.category == Category::FoodDining));
}

#[test]
fn test_filter_search_description_and_tags() {
    let mut all = sample();
    all[3].tags = vec!["Monthly-Bills".into()];

    let by_tag = ExpenseFilter {
        search: Some("bills".into()),
        ..ExpenseFilter::default()
    };
    let found = by_tag.apply(&all, date("2024-03-15"));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].category, Category::Utilities);

    let by_description = ExpenseFilter {
        search: Some("FOOD".into()),
        ..ExpenseFilter::default()
    };
    assert_eq!(by_description.apply(&all, date("2024-03-15")).len(), 2);

    let blank = ExpenseFilter {
        search: Some("  ".into()),
        ..ExpenseFilter::default()
    };
    assert_eq!(blank.apply(&all, date("2024-03-15")).len(), 5);
}

// ── Aggregates ────────────────────────────────────────────────

#[test]
fn test_summarize() {
    let summary = summarize(&sample());
    assert_eq!(summary.total, dec!(179.75));
    assert_eq!(summary.count, 5);
    assert_eq!(summary.average, dec!(35.95));
}

#[test]
fn test_summarize_empty() {
    let summary = summarize(&[]);
    assert_eq!(summary.total, Decimal::ZERO);
    assert_eq!(summary.count, 0);
    assert_eq!(summary.average, Decimal::ZERO);
}

#[test]
fn test_spending_by_category_sorted() {
    let spending = spending_by_category(&sample());
    assert_eq!(
        spending,
        vec![
            (Category::Utilities, dec!(80)),
            (Category::Groceries, dec!(60)),
            (Category::FoodDining, dec!(32.50)),
            (Category::Entertainment, dec!(7.25)),
        ]
    );
}

#[test]
fn test_monthly_trend_includes_empty_months() {
    let trend = monthly_trend(&sample(), "2024-04-01", 5);
    let months: Vec<&str> = trend.iter().map(|m| m.month.as_str()).collect();
    assert_eq!(
        months,
        vec!["2023-12-01", "2024-01-01", "2024-02-01", "2024-03-01", "2024-04-01"]
    );
    assert_eq!(trend[0].total, Decimal::ZERO);
    assert_eq!(trend[1].total, dec!(92.50));
    assert_eq!(trend[1].count, 3);
    assert_eq!(trend[2].total, dec!(80));
    assert_eq!(trend[4].count, 0);
}

#[test]
fn test_monthly_trend_zero_months() {
    assert!(monthly_trend(&sample(), "2024-04-01", 0).is_empty());
}

#[test]
fn test_budget_progress() {
    let budgets = vec![
        budget(Category::FoodDining, dec!(25), "2024-01-01"),
        budget(Category::Groceries, dec!(200), "2024-01-01"),
        budget(Category::Utilities, dec!(100), "2024-02-01"),
    ];
    let progress = budget_progress(&budgets, &sample(), "2024-01-01");
    assert_eq!(progress.len(), 2);

    let food = &progress[0];
    assert_eq!(food.category, Category::FoodDining);
    assert_eq!(food.spent, dec!(32.50));
    assert_eq!(food.remaining, dec!(-7.50));
    assert_eq!(food.percent_used, dec!(130.0));
    assert!(food.is_over_budget());

    let groceries = &progress[1];
    assert_eq!(groceries.spent, dec!(60));
    assert_eq!(groceries.remaining, dec!(140));
    assert_eq!(groceries.percent_used, dec!(30.0));
    assert!(!groceries.is_over_budget());
}

#[test]
fn test_budget_progress_zero_limit_and_bad_month() {
    let budgets = vec![budget(Category::FoodDining, Decimal::ZERO, "2024-01-01")];
    let progress = budget_progress(&budgets, &sample(), "2024-01-01");
    assert_eq!(progress[0].percent_used, Decimal::ZERO);
    assert!(progress[0].is_over_budget());

    assert!(budget_progress(&budgets, &sample(), "January").is_empty());
}

#[test]
fn test_month_over_month() {
    let mom = month_over_month(&sample(), "2024-02-01");
    assert_eq!(mom.current, dec!(80));
    assert_eq!(mom.previous, dec!(92.50));
    assert_eq!(mom.change_percent, Some(dec!(-13.5)));

    let first = month_over_month(&sample(), "2024-01-01");
    assert_eq!(first.previous, Decimal::ZERO);
    assert!(first.change_percent.is_none());
}
