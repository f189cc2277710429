use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Total spent in one category. `category` is `None` for uncategorized expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    #[serde(rename = "category__name")]
    pub category: Option<String>,
    pub total_spent: Decimal,
}

/// Total spent in one month-of-year (1..=12), all years collapsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthTotal {
    pub month: u32,
    pub total_spent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthNetIncome {
    pub month: u32,
    pub net_income: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMonthTotal {
    #[serde(rename = "category__name")]
    pub category: Option<String>,
    pub month: u32,
    pub total_spent: Decimal,
}

/// Total spent in one ISO week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekTotal {
    pub week: u32,
    pub total_spent: Decimal,
}

/// The analytics dashboard for one user and one selected month.
///
/// This struct is the final output of the `AnalyticsEngine`. It is recomputed on
/// every request and never stored. Field names are the JSON keys clients read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    // I. Selected month, by category
    pub most_spent_category: Option<CategoryTotal>, // None when the month has no expenses
    pub least_spent_category: Option<CategoryTotal>, // None when no categorized expense exists
    pub spending_by_category: Vec<CategoryTotal>,

    // II. Selected month, scalars
    pub net_income_current_month: Decimal,
    pub total_spent_current_month: Decimal,
    pub budgets_exceeded: usize,
    pub weekly_expenses: Vec<WeekTotal>,

    // III. Trailing window
    pub average_monthly_spent: Decimal,

    // IV. All-time series keyed by month-of-year
    pub net_income_per_month: Vec<MonthNetIncome>,
    pub spending_per_month: Vec<MonthTotal>,
    pub spending_by_category_per_month: Vec<CategoryMonthTotal>,
}

impl AnalyticsReport {
    /// Creates an empty report: zero scalars, no categories, empty series.
    /// This is also exactly what a user with no records gets back.
    pub fn new() -> Self {
        Self {
            most_spent_category: None,
            least_spent_category: None,
            spending_by_category: Vec::new(),
            net_income_current_month: Decimal::ZERO,
            total_spent_current_month: Decimal::ZERO,
            budgets_exceeded: 0,
            weekly_expenses: Vec::new(),
            average_monthly_spent: Decimal::ZERO,
            net_income_per_month: Vec::new(),
            spending_per_month: Vec::new(),
            spending_by_category_per_month: Vec::new(),
        }
    }
}

impl Default for AnalyticsReport {
    fn default() -> Self {
        Self::new()
    }
}
