mod budget;
mod category;
mod expense;
mod month;

pub use budget::{Budget, BudgetUpdate, NewBudget};
pub use category::{Category, PaymentMethod};
pub use expense::{Expense, ExpenseUpdate, NewExpense};
pub use month::{
    canonical_month, current_month, is_canonical_month, month_bounds, month_label, month_of,
    shift_month,
};

#[cfg(test)]
mod tests;
