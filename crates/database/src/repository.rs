use crate::DbError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core_types::{
    BudgetRecord, CategoryRecord, ExpenseRecord, Goal, IncomeRecord, Ledger, NewGoal, UserId,
};
use rust_decimal::Decimal;
use sqlx::postgres::PgPool;
use sqlx::FromRow;

/// Read access to one user's financial records, plus the small amount of goal
/// bookkeeping the savings endpoints need.
///
/// This trait allows the web server and the CLI to be agnostic about whether
/// they are talking to PostgreSQL or to an in-memory store.
#[async_trait]
pub trait FinanceRepository: Send + Sync {
    /// Expenses filed against budgets owned by `user`.
    async fn list_expenses(&self, user: UserId) -> Result<Vec<ExpenseRecord>, DbError>;

    async fn list_incomes(&self, user: UserId) -> Result<Vec<IncomeRecord>, DbError>;

    async fn list_budgets(&self, user: UserId) -> Result<Vec<BudgetRecord>, DbError>;

    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, DbError>;

    /// A single budget. Budgets of other users are reported as `NotFound`.
    async fn get_budget(&self, user: UserId, budget_id: i64) -> Result<BudgetRecord, DbError>;

    async fn list_goals(&self, user: UserId) -> Result<Vec<Goal>, DbError>;

    async fn get_goal(&self, user: UserId, goal_id: i64) -> Result<Goal, DbError>;

    /// Stores a new goal for `user` and returns it with its assigned id.
    async fn create_goal(
        &self,
        user: UserId,
        goal: NewGoal,
        at: DateTime<Utc>,
    ) -> Result<Goal, DbError>;

    /// Persists the saved amount and timestamp of an existing goal.
    async fn save_goal(&self, goal: &Goal) -> Result<(), DbError>;

    async fn delete_goal(&self, user: UserId, goal_id: i64) -> Result<(), DbError>;

    /// Fetches everything the analytics engine reduces, in one snapshot.
    async fn load_ledger(&self, user: UserId) -> Result<Ledger, DbError> {
        let (expenses, incomes, budgets) = tokio::try_join!(
            self.list_expenses(user),
            self.list_incomes(user),
            self.list_budgets(user)
        )?;
        Ok(Ledger::new(expenses, incomes, budgets))
    }
}

/// The `DbRepository` provides the PostgreSQL-backed `FinanceRepository`.
/// It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

// Row shapes as returned by the joins below. Category columns come from a
// LEFT JOIN, so both are nullable.
#[derive(FromRow, Debug)]
struct ExpenseRow {
    id: i64,
    budget_id: i64,
    name: String,
    amount: Decimal,
    created_at: DateTime<Utc>,
    category_id: Option<i64>,
    category_name: Option<String>,
}

#[derive(FromRow, Debug)]
struct BudgetRow {
    id: i64,
    user_id: i64,
    name: String,
    amount: Decimal,
    created_at: DateTime<Utc>,
    category_id: Option<i64>,
    category_name: Option<String>,
}

#[derive(FromRow, Debug)]
struct IncomeRow {
    id: i64,
    user_id: i64,
    name: String,
    amount: Decimal,
    created_at: DateTime<Utc>,
}

#[derive(FromRow, Debug)]
struct GoalRow {
    id: i64,
    user_id: i64,
    name: String,
    target_amount: Decimal,
    current_amount: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn joined_category(id: Option<i64>, name: Option<String>) -> Option<CategoryRecord> {
    match (id, name) {
        (Some(id), Some(name)) => Some(CategoryRecord { id, name }),
        _ => None,
    }
}

impl From<ExpenseRow> for ExpenseRecord {
    fn from(row: ExpenseRow) -> Self {
        Self {
            id: row.id,
            budget_id: row.budget_id,
            name: row.name,
            amount: row.amount,
            created_at: row.created_at,
            category: joined_category(row.category_id, row.category_name),
        }
    }
}

impl From<BudgetRow> for BudgetRecord {
    fn from(row: BudgetRow) -> Self {
        Self {
            id: row.id,
            owner: UserId(row.user_id),
            name: row.name,
            amount: row.amount,
            created_at: row.created_at,
            category: joined_category(row.category_id, row.category_name),
        }
    }
}

impl From<IncomeRow> for IncomeRecord {
    fn from(row: IncomeRow) -> Self {
        Self {
            id: row.id,
            owner: UserId(row.user_id),
            name: row.name,
            amount: row.amount,
            created_at: row.created_at,
        }
    }
}

impl From<GoalRow> for Goal {
    fn from(row: GoalRow) -> Self {
        Self {
            id: row.id,
            owner: UserId(row.user_id),
            name: row.name,
            target_amount: row.target_amount,
            current_amount: row.current_amount,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const BUDGET_COLUMNS: &str = r#"
    SELECT b.id, b.user_id, b.name, b.amount, b.created_at,
           c.id AS category_id, c.name AS category_name
    FROM budgets AS b
    LEFT JOIN categories AS c ON c.id = b.category_id
"#;

const GOAL_COLUMNS: &str = r#"
    SELECT id, user_id, name, target_amount, current_amount, created_at, updated_at
    FROM goals
"#;

fn not_found(e: sqlx::Error) -> DbError {
    if let sqlx::Error::RowNotFound = e { DbError::NotFound } else { e.into() }
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FinanceRepository for DbRepository {
    async fn list_expenses(&self, user: UserId) -> Result<Vec<ExpenseRecord>, DbError> {
        let rows = sqlx::query_as::<_, ExpenseRow>(
            r#"
            SELECT e.id, e.budget_id, e.name, e.amount, e.created_at,
                   c.id AS category_id, c.name AS category_name
            FROM expenses AS e
            JOIN budgets AS b ON b.id = e.budget_id
            LEFT JOIN categories AS c ON c.id = e.category_id
            WHERE b.user_id = $1
            ORDER BY e.created_at ASC, e.id ASC
            "#,
        )
        .bind(user.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ExpenseRecord::from).collect())
    }

    async fn list_incomes(&self, user: UserId) -> Result<Vec<IncomeRecord>, DbError> {
        let rows = sqlx::query_as::<_, IncomeRow>(
            r#"
            SELECT id, user_id, name, amount, created_at
            FROM incomes
            WHERE user_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(IncomeRecord::from).collect())
    }

    async fn list_budgets(&self, user: UserId) -> Result<Vec<BudgetRecord>, DbError> {
        let query =
            format!("{BUDGET_COLUMNS} WHERE b.user_id = $1 ORDER BY b.created_at ASC, b.id ASC");
        let rows = sqlx::query_as::<_, BudgetRow>(&query)
            .bind(user.0)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(BudgetRecord::from).collect())
    }

    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, DbError> {
        let rows: Vec<(i64, String)> =
            sqlx::query_as("SELECT id, name FROM categories ORDER BY id ASC")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(|(id, name)| CategoryRecord { id, name }).collect())
    }

    async fn get_budget(&self, user: UserId, budget_id: i64) -> Result<BudgetRecord, DbError> {
        let query = format!("{BUDGET_COLUMNS} WHERE b.user_id = $1 AND b.id = $2");
        let row = sqlx::query_as::<_, BudgetRow>(&query)
            .bind(user.0)
            .bind(budget_id)
            .fetch_one(&self.pool)
            .await
            .map_err(not_found)?;

        Ok(row.into())
    }

    async fn list_goals(&self, user: UserId) -> Result<Vec<Goal>, DbError> {
        let query = format!("{GOAL_COLUMNS} WHERE user_id = $1 ORDER BY created_at ASC, id ASC");
        let rows = sqlx::query_as::<_, GoalRow>(&query)
            .bind(user.0)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Goal::from).collect())
    }

    async fn get_goal(&self, user: UserId, goal_id: i64) -> Result<Goal, DbError> {
        let query = format!("{GOAL_COLUMNS} WHERE user_id = $1 AND id = $2");
        let row = sqlx::query_as::<_, GoalRow>(&query)
            .bind(user.0)
            .bind(goal_id)
            .fetch_one(&self.pool)
            .await
            .map_err(not_found)?;

        Ok(row.into())
    }

    async fn create_goal(
        &self,
        user: UserId,
        goal: NewGoal,
        at: DateTime<Utc>,
    ) -> Result<Goal, DbError> {
        let row = sqlx::query_as::<_, GoalRow>(
            r#"
            INSERT INTO goals (user_id, name, target_amount, current_amount, created_at, updated_at)
            VALUES ($1, $2, $3, 0, $4, $4)
            RETURNING id, user_id, name, target_amount, current_amount, created_at, updated_at
            "#,
        )
        .bind(user.0)
        .bind(&goal.name)
        .bind(goal.target_amount)
        .bind(at)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(user = %user, goal_id = row.id, "Goal created.");
        Ok(row.into())
    }

    async fn save_goal(&self, goal: &Goal) -> Result<(), DbError> {
        let result = sqlx::query(
            "UPDATE goals SET current_amount = $1, updated_at = $2 WHERE id = $3 AND user_id = $4",
        )
        .bind(goal.current_amount)
        .bind(goal.updated_at)
        .bind(goal.id)
        .bind(goal.owner.0)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    async fn delete_goal(&self, user: UserId, goal_id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM goals WHERE id = $1 AND user_id = $2")
            .bind(goal_id)
            .bind(user.0)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }
}
