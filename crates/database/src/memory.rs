use crate::repository::FinanceRepository;
use crate::DbError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core_types::{
    BudgetRecord, CategoryRecord, ExpenseRecord, Goal, IncomeRecord, Ledger, NewGoal, UserId,
};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct Store {
    categories: Vec<CategoryRecord>,
    budgets: Vec<BudgetRecord>,
    expenses: Vec<ExpenseRecord>,
    incomes: Vec<IncomeRecord>,
    goals: Vec<Goal>,
}

/// A `FinanceRepository` held entirely in memory.
///
/// Used by the test suites and for running the server without PostgreSQL.
/// Clones share the same underlying store.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    store: Arc<RwLock<Store>>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    /// An empty store holding only the seed categories.
    pub fn new() -> Self {
        let store = Store {
            categories: CategoryRecord::seed(),
            ..Store::default()
        };
        Self::from_store(store)
    }

    /// A store pre-filled with `ledger`, on top of the seed categories.
    pub fn from_ledger(ledger: Ledger) -> Self {
        let store = Store {
            categories: CategoryRecord::seed(),
            budgets: ledger.budgets,
            expenses: ledger.expenses,
            incomes: ledger.incomes,
            goals: Vec::new(),
        };
        Self::from_store(store)
    }

    fn from_store(store: Store) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Store>, DbError> {
        self.store.read().map_err(|e| DbError::Poisoned(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Store>, DbError> {
        self.store.write().map_err(|e| DbError::Poisoned(e.to_string()))
    }

    pub fn insert_budget(&self, budget: BudgetRecord) -> Result<(), DbError> {
        self.write()?.budgets.push(budget);
        Ok(())
    }

    pub fn insert_expense(&self, expense: ExpenseRecord) -> Result<(), DbError> {
        self.write()?.expenses.push(expense);
        Ok(())
    }

    pub fn insert_income(&self, income: IncomeRecord) -> Result<(), DbError> {
        self.write()?.incomes.push(income);
        Ok(())
    }

    pub fn insert_goal(&self, goal: Goal) -> Result<(), DbError> {
        self.write()?.goals.push(goal);
        Ok(())
    }
}

#[async_trait]
impl FinanceRepository for InMemoryRepository {
    async fn list_expenses(&self, user: UserId) -> Result<Vec<ExpenseRecord>, DbError> {
        let store = self.read()?;
        let owned: Vec<i64> = store
            .budgets
            .iter()
            .filter(|b| b.owner == user)
            .map(|b| b.id)
            .collect();

        Ok(store
            .expenses
            .iter()
            .filter(|e| owned.contains(&e.budget_id))
            .cloned()
            .collect())
    }

    async fn list_incomes(&self, user: UserId) -> Result<Vec<IncomeRecord>, DbError> {
        Ok(self.read()?.incomes.iter().filter(|i| i.owner == user).cloned().collect())
    }

    async fn list_budgets(&self, user: UserId) -> Result<Vec<BudgetRecord>, DbError> {
        Ok(self.read()?.budgets.iter().filter(|b| b.owner == user).cloned().collect())
    }

    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, DbError> {
        Ok(self.read()?.categories.clone())
    }

    async fn get_budget(&self, user: UserId, budget_id: i64) -> Result<BudgetRecord, DbError> {
        self.read()?
            .budgets
            .iter()
            .find(|b| b.owner == user && b.id == budget_id)
            .cloned()
            .ok_or(DbError::NotFound)
    }

    async fn list_goals(&self, user: UserId) -> Result<Vec<Goal>, DbError> {
        Ok(self.read()?.goals.iter().filter(|g| g.owner == user).cloned().collect())
    }

    async fn get_goal(&self, user: UserId, goal_id: i64) -> Result<Goal, DbError> {
        self.read()?
            .goals
            .iter()
            .find(|g| g.owner == user && g.id == goal_id)
            .cloned()
            .ok_or(DbError::NotFound)
    }

    async fn create_goal(
        &self,
        user: UserId,
        goal: NewGoal,
        at: DateTime<Utc>,
    ) -> Result<Goal, DbError> {
        let mut store = self.write()?;
        let id = store.goals.iter().map(|g| g.id).max().unwrap_or(0) + 1;
        let goal = goal.into_goal(id, user, at);
        store.goals.push(goal.clone());
        Ok(goal)
    }

    async fn save_goal(&self, goal: &Goal) -> Result<(), DbError> {
        let mut store = self.write()?;
        let stored = store
            .goals
            .iter_mut()
            .find(|g| g.owner == goal.owner && g.id == goal.id)
            .ok_or(DbError::NotFound)?;
        stored.current_amount = goal.current_amount;
        stored.updated_at = goal.updated_at;
        Ok(())
    }

    async fn delete_goal(&self, user: UserId, goal_id: i64) -> Result<(), DbError> {
        let mut store = self.write()?;
        let before = store.goals.len();
        store.goals.retain(|g| !(g.owner == user && g.id == goal_id));
        if store.goals.len() == before {
            return Err(DbError::NotFound);
        }
        Ok(())
    }
}
