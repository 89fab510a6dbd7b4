use anyhow::Result;
use chrono::NaiveDate;
use std::path::Path;

use super::{
    flag_value, parse_amount, parse_category, parse_date, parse_month, parse_payment_method,
    parse_tags, positionals, shellexpand, Books,
};
use crate::models::{
    current_month, month_label, BudgetUpdate, Expense, ExpenseUpdate, NewBudget, NewExpense,
};
use crate::report::{self, ExpenseFilter, Period};
use crate::storage::Storage;
use crate::store::{BudgetStore, ExpenseStore};

pub(crate) fn as_cli<S: Storage + ?Sized>(args: &[String], books: &Books<'_, S>) -> Result<()> {
    let rest = args.get(2..).unwrap_or_default();
    match args.get(1).map(String::as_str).unwrap_or("summary") {
        "add" | "a" => cli_add(rest, books),
        "list" | "ls" => cli_list(rest, books),
        "show" => cli_show(rest, books),
        "edit" => cli_edit(rest, books),
        "rm" | "delete" => cli_rm(rest, books),
        "budget" | "b" => cli_budget(rest, books),
        "summary" | "s" => cli_summary(rest, books),
        "trend" => cli_trend(rest, books),
        "export" => cli_export(rest, books),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("spendbook {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("Spendbook - local expense and budget tracker");
    println!();
    println!("Usage: spendbook [command]");
    println!();
    println!("Commands:");
    println!("  (none)                              Summary for the current month");
    println!("  add <amount> <description> <category>");
    println!("    --date <YYYY-MM-DD>               Expense date (default: today)");
    println!("    --payment <method>                credit_card, debit_card, cash, ...");
    println!("    --tags <a,b,c>                    Comma-separated tags");
    println!("  list                                List expenses, newest first");
    println!("    --month <YYYY-MM> | --from <D> --to <D>");
    println!("    --category <c> --period <p> --search <text>");
    println!("  show <id>                           Show one expense");
    println!("  edit <id> [--amount --description --category --date --payment --tags]");
    println!("  rm <id>                             Delete an expense");
    println!("  budget add <category> <limit> [--month <YYYY-MM>]");
    println!("  budget edit <id> [--limit <n>] [--category <c>] [--month <YYYY-MM>]");
    println!("  budget list [--month <YYYY-MM>]");
    println!("  budget show <category> [--month <YYYY-MM>]");
    println!("  budget rm <id>");
    println!("  summary [YYYY-MM]                   Monthly summary with budget progress");
    println!("  trend [months]                      Spending per month (default: 6)");
    println!("  export [path]                       Export expenses to CSV");
    println!("    --month <YYYY-MM> --category <c> --period <p>");
    println!("  --help, -h                          Show this help");
    println!("  --version, -V                       Show version");
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn print_expenses(expenses: &[Expense]) {
    println!(
        "{:<15} {:<10} {:>10}  {:<16} Description",
        "ID", "Date", "Amount", "Category"
    );
    println!("{}", "─".repeat(72));
    for e in expenses {
        println!(
            "{:<15} {:<10} {:>10.2}  {:<16} {}",
            e.id,
            e.date.format("%Y-%m-%d"),
            e.amount,
            e.category.display_name(),
            e.description,
        );
    }
}

// ── Expenses ─────────────────────────────────────────────────

fn cli_add<S: Storage + ?Sized>(args: &[String], books: &Books<'_, S>) -> Result<()> {
    let pos = positionals(args);
    let [amount, description, category, ..] = pos.as_slice() else {
        anyhow::bail!("Usage: spendbook add <amount> <description> <category> [--date D]");
    };

    let date = match flag_value(args, "--date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let mut data = NewExpense::new(
        parse_amount(amount)?,
        *description,
        parse_category(category)?,
        date,
    );
    if let Some(m) = flag_value(args, "--payment") {
        data = data.with_payment_method(parse_payment_method(m)?);
    }
    if let Some(t) = flag_value(args, "--tags") {
        data = data.with_tags(parse_tags(t));
    }

    let problems = ExpenseStore::<S>::validate(&data);
    if !problems.is_empty() {
        anyhow::bail!("{}", problems.join("; "));
    }

    let expense = books.expenses.create(data)?;
    println!(
        "Added expense {}: {} ${:.2} ({})",
        expense.id,
        expense.description,
        expense.amount,
        expense.category.display_name()
    );
    Ok(())
}

fn cli_list<S: Storage + ?Sized>(args: &[String], books: &Books<'_, S>) -> Result<()> {
    let category = flag_value(args, "--category").map(parse_category).transpose()?;
    let period = match flag_value(args, "--period") {
        Some(p) => Period::parse(p)
            .ok_or_else(|| anyhow::anyhow!("Unknown period '{p}'"))?,
        None => Period::All,
    };

    let from = flag_value(args, "--from").map(parse_date).transpose()?;
    let to = flag_value(args, "--to").map(parse_date).transpose()?;

    let base = if let Some(m) = flag_value(args, "--month") {
        books.expenses.get_by_month(&parse_month(m)?)
    } else if from.is_some() || to.is_some() {
        books.expenses.get_by_date_range(
            from.unwrap_or(NaiveDate::MIN),
            to.unwrap_or(NaiveDate::MAX),
        )
    } else if let Some(c) = category {
        books.expenses.get_by_category(c)
    } else {
        books.expenses.get_all()
    };

    let filter = ExpenseFilter {
        category,
        period,
        search: flag_value(args, "--search").map(String::from),
    };
    let mut expenses = filter.apply(&base, today());
    if expenses.is_empty() {
        println!("No expenses");
        return Ok(());
    }
    expenses.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));

    print_expenses(&expenses);
    let summary = report::summarize(&expenses);
    println!();
    if period != Period::All {
        println!("  Period:  {}", period.as_str());
    }
    println!("  Count:   {}", summary.count);
    println!("  Total:   ${:.2}", summary.total);
    println!("  Average: ${:.2}", summary.average);
    Ok(())
}

fn cli_show<S: Storage + ?Sized>(args: &[String], books: &Books<'_, S>) -> Result<()> {
    let Some(id) = positionals(args).first().copied() else {
        anyhow::bail!("Usage: spendbook show <id>");
    };
    let e = books.expenses.get(id)?;
    println!("ID:          {}", e.id);
    println!("Date:        {}", e.date.format("%Y-%m-%d"));
    println!("Amount:      ${:.2}", e.amount);
    println!("Description: {}", e.description);
    println!("Category:    {}", e.category.display_name());
    if let Some(m) = e.payment_method {
        println!("Payment:     {}", m.display_name());
    }
    if !e.tags.is_empty() {
        println!("Tags:        {}", e.tags.join(", "));
    }
    println!("Created:     {}", e.created_at.to_rfc3339());
    Ok(())
}

fn cli_edit<S: Storage + ?Sized>(args: &[String], books: &Books<'_, S>) -> Result<()> {
    let Some(id) = positionals(args).first().copied() else {
        anyhow::bail!("Usage: spendbook edit <id> [--amount A] [--description S] ...");
    };
    let changes = ExpenseUpdate {
        amount: flag_value(args, "--amount").map(parse_amount).transpose()?,
        description: flag_value(args, "--description").map(String::from),
        category: flag_value(args, "--category").map(parse_category).transpose()?,
        date: flag_value(args, "--date").map(parse_date).transpose()?,
        payment_method: flag_value(args, "--payment")
            .map(parse_payment_method)
            .transpose()?,
        tags: flag_value(args, "--tags").map(parse_tags),
    };
    if changes.is_empty() {
        anyhow::bail!("Nothing to change for expense {id}");
    }
    let e = books.expenses.update(id, changes)?;
    println!(
        "Updated expense {}: {} ${:.2} on {}",
        e.id,
        e.description,
        e.amount,
        e.date.format("%Y-%m-%d")
    );
    Ok(())
}

fn cli_rm<S: Storage + ?Sized>(args: &[String], books: &Books<'_, S>) -> Result<()> {
    let Some(id) = positionals(args).first().copied() else {
        anyhow::bail!("Usage: spendbook rm <id>");
    };
    if books.expenses.delete(id)? {
        println!("Deleted expense {id}");
    } else {
        println!("No expense with ID {id}");
    }
    Ok(())
}

// ── Budgets ──────────────────────────────────────────────────

fn cli_budget<S: Storage + ?Sized>(args: &[String], books: &Books<'_, S>) -> Result<()> {
    let rest = args.get(1..).unwrap_or_default();
    match args.first().map(String::as_str).unwrap_or("list") {
        "add" => cli_budget_add(rest, books),
        "edit" => cli_budget_edit(rest, books),
        "list" | "ls" => cli_budget_list(rest, books),
        "show" => cli_budget_show(rest, books),
        "rm" | "delete" => {
            let Some(id) = positionals(rest).first().copied() else {
                anyhow::bail!("Usage: spendbook budget rm <id>");
            };
            if books.budgets.delete(id)? {
                println!("Deleted budget {id}");
            } else {
                println!("No budget with ID {id}");
            }
            Ok(())
        }
        other => anyhow::bail!("Unknown budget command: {other}"),
    }
}

fn month_flag(args: &[String]) -> Result<String> {
    match flag_value(args, "--month") {
        Some(m) => parse_month(m),
        None => Ok(current_month()),
    }
}

fn cli_budget_add<S: Storage + ?Sized>(args: &[String], books: &Books<'_, S>) -> Result<()> {
    let pos = positionals(args);
    let [category, limit, ..] = pos.as_slice() else {
        anyhow::bail!("Usage: spendbook budget add <category> <limit> [--month YYYY-MM]");
    };
    let data = NewBudget::new(parse_category(category)?, parse_amount(limit)?, month_flag(args)?);

    let problems = BudgetStore::<S>::validate(&data);
    if !problems.is_empty() {
        anyhow::bail!("{}", problems.join("; "));
    }

    let budget = books.budgets.create(data)?;
    println!(
        "Added budget {}: {} ${:.2} for {}",
        budget.id,
        budget.category.display_name(),
        budget.monthly_limit,
        month_label(&budget.month)
    );
    Ok(())
}

fn cli_budget_edit<S: Storage + ?Sized>(args: &[String], books: &Books<'_, S>) -> Result<()> {
    let Some(id) = positionals(args).first().copied() else {
        anyhow::bail!("Usage: spendbook budget edit <id> [--limit L] [--category C] [--month M]");
    };
    let changes = BudgetUpdate {
        category: flag_value(args, "--category").map(parse_category).transpose()?,
        monthly_limit: flag_value(args, "--limit").map(parse_amount).transpose()?,
        month: flag_value(args, "--month").map(parse_month).transpose()?,
    };
    if changes.is_empty() {
        anyhow::bail!("Nothing to change for budget {id}");
    }

    let current = books.budgets.get(id)?;
    let mut merged = NewBudget::from(&current);
    if let Some(limit) = changes.monthly_limit {
        merged.monthly_limit = Some(limit);
    }
    let problems = BudgetStore::<S>::validate(&merged);
    if !problems.is_empty() {
        anyhow::bail!("{}", problems.join("; "));
    }

    let budget = books.budgets.update(id, changes)?;
    println!(
        "Updated budget {}: {} ${:.2} for {}",
        budget.id,
        budget.category.display_name(),
        budget.monthly_limit,
        month_label(&budget.month)
    );
    Ok(())
}

fn cli_budget_list<S: Storage + ?Sized>(args: &[String], books: &Books<'_, S>) -> Result<()> {
    let month = flag_value(args, "--month").map(parse_month).transpose()?;
    let budgets = match &month {
        Some(m) => books.budgets.get_by_month(m),
        None => books.budgets.get_all(),
    };
    if budgets.is_empty() {
        println!("No budgets");
        return Ok(());
    }

    println!("{:<15} {:<10} {:<16} {:>10}", "ID", "Month", "Category", "Limit");
    println!("{}", "─".repeat(55));
    for b in &budgets {
        println!(
            "{:<15} {:<10} {:<16} {:>10.2}",
            b.id,
            month_label(&b.month),
            b.category.display_name(),
            b.monthly_limit
        );
    }
    if let Some(m) = &month {
        println!();
        println!("  Total: ${:.2}", books.budgets.get_total_monthly_budget(m));
    }
    Ok(())
}

fn cli_budget_show<S: Storage + ?Sized>(args: &[String], books: &Books<'_, S>) -> Result<()> {
    let Some(category) = positionals(args).first().copied() else {
        anyhow::bail!("Usage: spendbook budget show <category> [--month YYYY-MM]");
    };
    let category = parse_category(category)?;

    let budgets = match flag_value(args, "--month") {
        Some(m) => books
            .budgets
            .get_by_category_and_month(category, &parse_month(m)?)
            .into_iter()
            .collect(),
        None => books.budgets.get_by_category(category),
    };
    if budgets.is_empty() {
        println!("No budgets for {}", category.display_name());
        return Ok(());
    }
    for b in &budgets {
        println!("{:<15} {:<10} ${:.2}", b.id, month_label(&b.month), b.monthly_limit);
    }
    Ok(())
}

// ── Reports ──────────────────────────────────────────────────

fn cli_summary<S: Storage + ?Sized>(args: &[String], books: &Books<'_, S>) -> Result<()> {
    let month = match positionals(args).first() {
        Some(m) => parse_month(m)?,
        None => current_month(),
    };

    let all = books.expenses.get_all();
    let in_month = books.expenses.get_by_month(&month);
    let summary = report::summarize(&in_month);
    let mom = report::month_over_month(&all, &month);
    let budgeted = books.budgets.get_total_monthly_budget(&month);

    println!("Spendbook - {}", month_label(&month));
    println!("{}", "─".repeat(40));
    println!("  Spent:        ${:.2}", summary.total);
    match mom.change_percent {
        Some(pct) => println!("  Last month:   ${:.2} ({pct:+}%)", mom.previous),
        None => println!("  Last month:   ${:.2}", mom.previous),
    }
    println!("  Budgeted:     ${:.2}", budgeted);
    println!("  Remaining:    ${:.2}", budgeted - summary.total);
    println!("  Expenses:     {}", summary.count);
    println!(
        "  All time:     ${:.2} over {} expenses",
        books.expenses.total(),
        books.expenses.count()
    );

    let progress = report::budget_progress(&books.budgets.get_all(), &in_month, &month);
    if !progress.is_empty() {
        println!();
        println!("Budgets:");
        for p in &progress {
            let flag = if p.is_over_budget() { "  OVER" } else { "" };
            println!(
                "  {:<16} ${:>9.2} / ${:>9.2}  {:>6}%{flag}",
                p.category.display_name(),
                p.spent,
                p.limit,
                p.percent_used
            );
        }
    }

    let spending = report::spending_by_category(&in_month);
    if !spending.is_empty() {
        println!();
        println!("Spending by Category:");
        for (category, amount) in &spending {
            println!("  {:<16} ${:.2}", category.display_name(), amount);
        }
    }

    Ok(())
}

fn cli_trend<S: Storage + ?Sized>(args: &[String], books: &Books<'_, S>) -> Result<()> {
    let months = match positionals(args).first() {
        Some(n) => n
            .parse::<usize>()
            .map_err(|_| anyhow::anyhow!("Invalid month count '{n}'"))?,
        None => 6,
    };
    let trend = report::monthly_trend(&books.expenses.get_all(), &current_month(), months);

    println!("{:<10} {:>10} {:>6}", "Month", "Spent", "Count");
    println!("{}", "─".repeat(28));
    for m in &trend {
        println!("{:<10} {:>10.2} {:>6}", month_label(&m.month), m.total, m.count);
    }
    Ok(())
}

fn cli_export<S: Storage + ?Sized>(args: &[String], books: &Books<'_, S>) -> Result<()> {
    let base = match flag_value(args, "--month") {
        Some(m) => books.expenses.get_by_month(&parse_month(m)?),
        None => books.expenses.get_all(),
    };
    let filter = ExpenseFilter {
        category: flag_value(args, "--category").map(parse_category).transpose()?,
        period: match flag_value(args, "--period") {
            Some(p) => Period::parse(p).ok_or_else(|| anyhow::anyhow!("Unknown period '{p}'"))?,
            None => Period::All,
        },
        search: None,
    };
    let expenses = filter.apply(&base, today());

    let output_path = positionals(args)
        .first()
        .map(|a| shellexpand(a))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            format!("{home}/{}", crate::export::default_export_name(today()))
        });

    if expenses.is_empty() {
        println!("No expenses to export");
        return Ok(());
    }
    let count = crate::export::export_expenses(Path::new(&output_path), &expenses)?;
    println!("Exported {count} expenses to {output_path}");
    Ok(())
}
