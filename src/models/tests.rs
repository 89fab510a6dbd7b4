#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

// ── Category ──────────────────────────────────────────────────

#[test]
fn test_category_parse() {
    assert_eq!(Category::parse("food_dining"), Some(Category::FoodDining));
    assert_eq!(Category::parse("Food & Dining"), Some(Category::FoodDining));
    assert_eq!(Category::parse("GROCERIES"), Some(Category::Groceries));
    assert_eq!(Category::parse("  travel "), Some(Category::Travel));
    assert_eq!(Category::parse("gambling"), None);
    assert_eq!(Category::parse(""), None);
}

#[test]
fn test_category_all() {
    let all = Category::all();
    assert_eq!(all.len(), 13);
    assert!(all.contains(&Category::FoodDining));
    assert!(all.contains(&Category::Other));
}

#[test]
fn test_category_roundtrip() {
    for c in Category::all() {
        assert_eq!(Category::parse(c.as_str()), Some(*c), "key {}", c.as_str());
        assert_eq!(Category::parse(c.display_name()), Some(*c));
    }
}

#[test]
fn test_category_serializes_as_key() {
    let json = serde_json::to_string(&Category::FoodDining).unwrap();
    assert_eq!(json, "\"food_dining\"");
    let back: Category = serde_json::from_str("\"subscriptions\"").unwrap();
    assert_eq!(back, Category::Subscriptions);
}

#[test]
fn test_category_display() {
    assert_eq!(format!("{}", Category::FoodDining), "Food & Dining");
    assert_eq!(format!("{}", Category::Healthcare), "Healthcare");
}

// ── PaymentMethod ─────────────────────────────────────────────

#[test]
fn test_payment_method_parse() {
    assert_eq!(PaymentMethod::parse("credit_card"), Some(PaymentMethod::CreditCard));
    assert_eq!(PaymentMethod::parse("Debit Card"), Some(PaymentMethod::DebitCard));
    assert_eq!(PaymentMethod::parse("cash"), Some(PaymentMethod::Cash));
    assert_eq!(PaymentMethod::parse("wallet"), Some(PaymentMethod::DigitalWallet));
    assert_eq!(PaymentMethod::parse("cheque"), None);
}

#[test]
fn test_payment_method_roundtrip() {
    for m in PaymentMethod::all() {
        assert_eq!(PaymentMethod::parse(m.as_str()), Some(*m));
        let json = serde_json::to_string(m).unwrap();
        assert_eq!(json, format!("\"{}\"", m.as_str()));
    }
}

// ── Months ────────────────────────────────────────────────────

#[test]
fn test_is_canonical_month() {
    assert!(is_canonical_month("2024-01-01"));
    assert!(is_canonical_month("1999-12-01"));
    assert!(!is_canonical_month("2024-13-01"));
    assert!(!is_canonical_month("2024-01-15"));
    assert!(!is_canonical_month("2024-01"));
    assert!(!is_canonical_month("24-01-01"));
    assert!(!is_canonical_month("2024-1-01"));
    assert!(!is_canonical_month(" 2024-01-01"));
    assert!(!is_canonical_month("2024-02-30"));
    assert!(!is_canonical_month(""));
}

#[test]
fn test_canonical_month() {
    assert_eq!(canonical_month("2024-03"), Some("2024-03-01".to_string()));
    assert_eq!(canonical_month("2024-03-17"), Some("2024-03-01".to_string()));
    assert_eq!(canonical_month("2024-03-01"), Some("2024-03-01".to_string()));
    assert_eq!(canonical_month("2024-13"), None);
    assert_eq!(canonical_month("march"), None);
}

#[test]
fn test_month_bounds() {
    let (start, end) = month_bounds("2024-02-01").unwrap();
    assert_eq!(start, date("2024-02-01"));
    assert_eq!(end, date("2024-02-29"));

    let (_, end) = month_bounds("2023-12-01").unwrap();
    assert_eq!(end, date("2023-12-31"));

    assert!(month_bounds("garbage").is_none());
}

#[test]
fn test_shift_month() {
    assert_eq!(shift_month("2024-01-01", -1).unwrap(), "2023-12-01");
    assert_eq!(shift_month("2024-01-01", 1).unwrap(), "2024-02-01");
    assert_eq!(shift_month("2024-01-01", 0).unwrap(), "2024-01-01");
    assert_eq!(shift_month("2024-03-01", -14).unwrap(), "2023-01-01");
}

#[test]
fn test_month_of_and_label() {
    assert_eq!(month_of(date("2024-07-19")), "2024-07-01");
    assert_eq!(month_label("2024-01-01"), "Jan 2024");
    assert_eq!(month_label("oops"), "oops");
}

#[test]
fn test_current_month_is_canonical() {
    assert!(is_canonical_month(&current_month()));
}

// ── NewBudget validation ──────────────────────────────────────

#[test]
fn test_budget_validate_ok() {
    let budget = NewBudget::new(Category::FoodDining, dec!(500), "2024-01-01");
    assert!(budget.validate().is_empty());
}

#[test]
fn test_budget_validate_reports_every_problem() {
    let budget = NewBudget {
        id: None,
        category: None,
        monthly_limit: Some(dec!(-5)),
        month: Some("2024-13-01".into()),
    };
    let errors = budget.validate();
    assert_eq!(errors.len(), 3);
    assert!(errors.contains(&"Category is required".to_string()));
    assert!(errors.contains(&"Monthly limit must be a positive number".to_string()));
    assert!(errors.contains(&"Month must be in YYYY-MM-01 format".to_string()));
}

#[test]
fn test_budget_validate_missing_month_and_zero_limit() {
    let budget = NewBudget {
        category: Some(Category::Travel),
        monthly_limit: Some(Decimal::ZERO),
        ..NewBudget::default()
    };
    let errors = budget.validate();
    assert_eq!(
        errors,
        vec![
            "Monthly limit must be a positive number".to_string(),
            "Month is required".to_string(),
        ]
    );
}

#[test]
fn test_budget_missing_fields() {
    assert_eq!(
        NewBudget::default().missing_fields(),
        vec!["category", "monthly_limit", "month"]
    );
    let empty_month = NewBudget::new(Category::Other, dec!(10), "");
    assert_eq!(empty_month.missing_fields(), vec!["month"]);
}

#[test]
fn test_budget_zero_limit_counts_as_missing() {
    let zero = NewBudget::new(Category::Other, dec!(0), "2024-01-01");
    assert_eq!(zero.missing_fields(), vec!["monthly_limit"]);
    let negative = NewBudget::new(Category::Other, dec!(-5), "2024-01-01");
    assert!(negative.missing_fields().is_empty());
}

#[test]
fn test_budget_update_changes_key() {
    assert!(!BudgetUpdate::default().changes_key());
    let limit_only = BudgetUpdate {
        monthly_limit: Some(dec!(600)),
        ..BudgetUpdate::default()
    };
    assert!(!limit_only.changes_key());
    let month = BudgetUpdate {
        month: Some("2024-02-01".into()),
        ..BudgetUpdate::default()
    };
    assert!(month.changes_key());
}

// ── NewExpense validation ─────────────────────────────────────

#[test]
fn test_expense_validate_ok() {
    let expense = NewExpense::new(dec!(12.50), "Lunch", Category::FoodDining, date("2024-01-05"));
    assert!(expense.validate().is_empty());
    assert!(expense.missing_fields().is_empty());
}

#[test]
fn test_expense_validate_problems() {
    let expense = NewExpense {
        amount: Some(dec!(0)),
        description: Some("   ".into()),
        ..NewExpense::default()
    };
    let errors = expense.validate();
    assert_eq!(errors.len(), 4);
    assert_eq!(expense.missing_fields(), vec!["category", "date"]);
}

#[test]
fn test_expense_builders() {
    let expense = NewExpense::new(dec!(3), "Bus", Category::Transportation, date("2024-01-02"))
        .with_payment_method(PaymentMethod::Cash)
        .with_tags(["commute", "daily"]);
    assert_eq!(expense.payment_method, Some(PaymentMethod::Cash));
    assert_eq!(expense.tags, vec!["commute", "daily"]);
}

// ── Serialized shape ──────────────────────────────────────────

#[test]
fn test_expense_json_shape() {
    let raw = r#"{
        "id": "1704412800000",
        "amount": 42.5,
        "description": "Groceries run",
        "category": "groceries",
        "date": "2024-01-05",
        "tags": ["weekly"],
        "createdAt": "2024-01-05T10:00:00.000Z",
        "receipt_url": "https://example.invalid/r.png"
    }"#;
    let expense: Expense = serde_json::from_str(raw).unwrap();
    assert_eq!(expense.amount, dec!(42.5));
    assert_eq!(expense.category, Category::Groceries);
    assert_eq!(expense.date, date("2024-01-05"));
    assert!(expense.payment_method.is_none());
    assert!(expense.extra.contains_key("receipt_url"));

    let value = serde_json::to_value(&expense).unwrap();
    assert_eq!(value["createdAt"], "2024-01-05T10:00:00Z");
    assert_eq!(value["receipt_url"], "https://example.invalid/r.png");
    assert!(value.get("payment_method").is_none());
    assert!(value["amount"].is_number());
}

#[test]
fn test_expense_blank_payment_method_reads_as_none() {
    for stored in [r#""""#, r#""  ""#, "null"] {
        let raw = format!(
            r#"{{"id":"1","amount":5,"description":"x","category":"other",
                "date":"2024-01-01","payment_method":{stored},
                "createdAt":"2024-01-01T00:00:00Z"}}"#
        );
        let expense: Expense = serde_json::from_str(&raw).unwrap();
        assert!(expense.payment_method.is_none(), "stored {stored}");
        assert!(!expense.extra.contains_key("payment_method"));
    }
}

#[test]
fn test_expense_payment_method_must_be_a_key() {
    let known = r#"{"id":"1","amount":5,"description":"x","category":"other",
        "date":"2024-01-01","payment_method":"cash","createdAt":"2024-01-01T00:00:00Z"}"#;
    let expense: Expense = serde_json::from_str(known).unwrap();
    assert_eq!(expense.payment_method, Some(PaymentMethod::Cash));

    let unknown = known.replace(r#""cash""#, r#""cheque""#);
    let err = serde_json::from_str::<Expense>(&unknown).unwrap_err();
    assert!(err.to_string().contains("cheque"));
}

#[test]
fn test_payment_method_from_key_is_exact() {
    assert_eq!(PaymentMethod::from_key("bank_transfer"), Some(PaymentMethod::BankTransfer));
    assert_eq!(PaymentMethod::from_key("Bank Transfer"), None);
    assert_eq!(PaymentMethod::from_key(""), None);
}

#[test]
fn test_expense_tags_default_to_empty() {
    let raw = r#"{"id":"1","amount":5,"description":"x","category":"other",
        "date":"2024-01-01","createdAt":"2024-01-01T00:00:00Z"}"#;
    let expense: Expense = serde_json::from_str(raw).unwrap();
    assert!(expense.tags.is_empty());
    assert_eq!(expense.amount, dec!(5));
}

#[test]
fn test_budget_json_shape() {
    let raw = r#"{"id":"7","category":"food_dining","monthly_limit":500,
        "month":"2024-01-01","createdAt":"2024-01-01T00:00:00Z",
        "updatedAt":"2024-01-02T00:00:00Z"}"#;
    let budget: Budget = serde_json::from_str(raw).unwrap();
    assert_eq!(budget.monthly_limit, dec!(500));
    assert_eq!(budget.month, "2024-01-01");

    let value = serde_json::to_value(&budget).unwrap();
    assert!(value.get("updatedAt").is_some());
    assert!(value.get("monthly_limit").unwrap().is_number());
}
