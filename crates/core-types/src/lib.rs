pub mod error;
pub mod goal;
pub mod selector;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use error::CoreError;
pub use goal::{Goal, NewGoal};
pub use selector::MonthSelector;
pub use structs::{BudgetRecord, CategoryRecord, ExpenseRecord, IncomeRecord, Ledger, UserId};
