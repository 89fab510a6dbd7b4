use chrono::{Datelike, Months, NaiveDate};

/// True when `s` is a real calendar date written exactly as `YYYY-MM-01`.
pub fn is_canonical_month(s: &str) -> bool {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok_and(|d| d.day() == 1 && month_of(d) == s)
}

/// Normalize `YYYY-MM`, `YYYY-MM-DD` or `YYYY-MM-01` into `YYYY-MM-01`.
pub fn canonical_month(input: &str) -> Option<String> {
    let trimmed = input.trim();
    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d"))
        .ok()?;
    Some(month_of(date))
}

/// Canonical month key containing `date`.
pub fn month_of(date: NaiveDate) -> String {
    format!("{:04}-{:02}-01", date.year(), date.month())
}

pub fn current_month() -> String {
    month_of(chrono::Local::now().date_naive())
}

/// First and last day of a canonical month.
pub fn month_bounds(month: &str) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::parse_from_str(month, "%Y-%m-%d").ok()?.with_day(1)?;
    let end = start.checked_add_months(Months::new(1))?.pred_opt()?;
    Some((start, end))
}

/// Move a canonical month forwards (positive) or backwards (negative).
pub fn shift_month(month: &str, delta: i32) -> Option<String> {
    let (start, _) = month_bounds(month)?;
    let shifted = if delta >= 0 {
        start.checked_add_months(Months::new(delta.unsigned_abs()))?
    } else {
        start.checked_sub_months(Months::new(delta.unsigned_abs()))?
    };
    Some(month_of(shifted))
}

/// Short label for a canonical month, e.g. "Jan 2024".
pub fn month_label(month: &str) -> String {
    match month_bounds(month) {
        Some((start, _)) => start.format("%b %Y").to_string(),
        None => month.to_string(),
    }
}
