use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The identity of an authenticated user. Every record read by the system is
/// scoped to exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A spending label attached to expenses and budgets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: i64,
    pub name: String,
}

impl CategoryRecord {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// The reference categories every installation starts with.
    pub fn seed() -> Vec<CategoryRecord> {
        vec![
            CategoryRecord::new(1, "Food"),
            CategoryRecord::new(2, "Transport"),
            CategoryRecord::new(3, "Shopping"),
            CategoryRecord::new(4, "Others"),
        ]
    }
}

/// A user-defined spending cap. Expenses are always filed against a budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetRecord {
    pub id: i64,
    pub owner: UserId,
    pub name: String,
    /// The cap. A budget is exceeded when its linked expenses sum past this.
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub category: Option<CategoryRecord>,
}

/// A single spend, owned indirectly through its budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: i64,
    pub budget_id: i64,
    pub name: String,
    // Sign is not enforced; whatever was stored is aggregated as-is.
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub category: Option<CategoryRecord>,
}

impl ExpenseRecord {
    /// The name of the linked category, if any.
    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeRecord {
    pub id: i64,
    pub owner: UserId,
    /// Where the money came from (salary, refund, ...).
    pub name: String,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// A read-only snapshot of one user's records, as handed to the analytics engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub expenses: Vec<ExpenseRecord>,
    pub incomes: Vec<IncomeRecord>,
    pub budgets: Vec<BudgetRecord>,
}

impl Ledger {
    pub fn new(
        expenses: Vec<ExpenseRecord>,
        incomes: Vec<IncomeRecord>,
        budgets: Vec<BudgetRecord>,
    ) -> Self {
        Self {
            expenses,
            incomes,
            budgets,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty() && self.incomes.is_empty() && self.budgets.is_empty()
    }
}
