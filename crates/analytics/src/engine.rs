use crate::report::{
    AnalyticsReport, CategoryMonthTotal, CategoryTotal, MonthNetIncome, MonthTotal, WeekTotal,
};
use chrono::{DateTime, Datelike, Duration, Utc};
use core_types::{ExpenseRecord, Ledger, MonthSelector};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Length of the trailing window behind `average_monthly_spent`.
pub const DEFAULT_TRAILING_WINDOW_DAYS: i64 = 30;

/// A stateless calculator for deriving the analytics report from a user's records.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    trailing_window: Duration,
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self {
            trailing_window: Duration::days(DEFAULT_TRAILING_WINDOW_DAYS),
        }
    }
}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine whose average-spend window covers the last `days` days.
    pub fn with_trailing_window_days(days: u32) -> Self {
        Self {
            trailing_window: Duration::days(i64::from(days)),
        }
    }

    pub fn trailing_window(&self) -> Duration {
        self.trailing_window
    }

    /// The main entry point for calculating the report.
    ///
    /// # Arguments
    ///
    /// * `ledger` - All expenses, incomes and budgets of a single user.
    /// * `selector` - The (year, month) that scopes the month-bound statistics.
    /// * `now` - The instant the trailing window is measured back from.
    pub fn compute_report(
        &self,
        ledger: &Ledger,
        selector: MonthSelector,
        now: DateTime<Utc>,
    ) -> AnalyticsReport {
        let mut report = AnalyticsReport::new();

        tracing::debug!(
            year = selector.year(),
            month = selector.month(),
            expenses = ledger.expenses.len(),
            incomes = ledger.incomes.len(),
            budgets = ledger.budgets.len(),
            "Computing analytics report."
        );

        if ledger.is_empty() {
            return report;
        }

        let in_month: Vec<&ExpenseRecord> = ledger
            .expenses
            .iter()
            .filter(|e| selector.contains(e.created_at))
            .collect();

        self.calculate_category_breakdown(&in_month, &mut report);
        self.calculate_month_scalars(ledger, &in_month, selector, &mut report);
        self.calculate_weekly(&in_month, &mut report);
        self.calculate_trailing_average(ledger, now, &mut report);
        self.calculate_monthly_series(ledger, &mut report);

        report
    }

    /// Most/least spent category and the per-category totals of the selected month.
    fn calculate_category_breakdown(
        &self,
        in_month: &[&ExpenseRecord],
        report: &mut AnalyticsReport,
    ) {
        let mut totals: HashMap<Option<&str>, Decimal> = HashMap::new();
        for expense in in_month {
            *totals.entry(expense.category_name()).or_insert(Decimal::ZERO) += expense.amount;
        }

        let mut by_category: Vec<CategoryTotal> = totals
            .into_iter()
            .map(|(category, total_spent)| CategoryTotal {
                category: category.map(str::to_string),
                total_spent,
            })
            .collect();
        by_category.sort_by(|a, b| {
            b.total_spent
                .cmp(&a.total_spent)
                .then_with(|| category_order(&a.category, &b.category))
        });

        report.most_spent_category = by_category.first().cloned();
        report.least_spent_category = by_category
            .iter()
            .filter(|c| c.category.is_some())
            .min_by(|a, b| {
                a.total_spent
                    .cmp(&b.total_spent)
                    .then_with(|| category_order(&a.category, &b.category))
            })
            .cloned();
        report.spending_by_category = by_category;
    }

    /// Total spend, net income and budget overage of the selected month.
    fn calculate_month_scalars(
        &self,
        ledger: &Ledger,
        in_month: &[&ExpenseRecord],
        selector: MonthSelector,
        report: &mut AnalyticsReport,
    ) {
        let total_spent: Decimal = in_month.iter().map(|e| e.amount).sum();
        let total_income: Decimal = ledger
            .incomes
            .iter()
            .filter(|i| selector.contains(i.created_at))
            .map(|i| i.amount)
            .sum();

        report.total_spent_current_month = total_spent;
        report.net_income_current_month = total_income - total_spent;

        // Linked totals span every expense of the budget, not only the selected month.
        let mut spent_per_budget: HashMap<i64, Decimal> = HashMap::new();
        for expense in &ledger.expenses {
            *spent_per_budget.entry(expense.budget_id).or_insert(Decimal::ZERO) += expense.amount;
        }

        report.budgets_exceeded = ledger
            .budgets
            .iter()
            .filter(|b| selector.contains(b.created_at))
            .filter(|b| {
                spent_per_budget
                    .get(&b.id)
                    .is_some_and(|spent| *spent > b.amount)
            })
            .count();
    }

    /// Selected-month totals per ISO week number.
    fn calculate_weekly(&self, in_month: &[&ExpenseRecord], report: &mut AnalyticsReport) {
        let mut weeks: BTreeMap<u32, Decimal> = BTreeMap::new();
        for expense in in_month {
            *weeks
                .entry(expense.created_at.iso_week().week())
                .or_insert(Decimal::ZERO) += expense.amount;
        }

        report.weekly_expenses = weeks
            .into_iter()
            .map(|(week, total_spent)| WeekTotal { week, total_spent })
            .collect();
    }

    /// Mean expense amount over the trailing window ending at `now`.
    fn calculate_trailing_average(
        &self,
        ledger: &Ledger,
        now: DateTime<Utc>,
        report: &mut AnalyticsReport,
    ) {
        let start = now - self.trailing_window;
        let recent: Vec<Decimal> = ledger
            .expenses
            .iter()
            .filter(|e| e.created_at >= start)
            .map(|e| e.amount)
            .collect();

        if recent.is_empty() {
            return;
        }

        let sum: Decimal = recent.iter().sum();
        report.average_monthly_spent = sum / Decimal::from(recent.len());
    }

    /// All-time series keyed by month-of-year. Years are deliberately collapsed:
    /// March 2023 and March 2024 land in the same bucket.
    fn calculate_monthly_series(&self, ledger: &Ledger, report: &mut AnalyticsReport) {
        let mut spent: BTreeMap<u32, Decimal> = BTreeMap::new();
        let mut per_category: HashMap<(Option<&str>, u32), Decimal> = HashMap::new();
        for expense in &ledger.expenses {
            let month = expense.created_at.month();
            *spent.entry(month).or_insert(Decimal::ZERO) += expense.amount;
            *per_category
                .entry((expense.category_name(), month))
                .or_insert(Decimal::ZERO) += expense.amount;
        }

        let mut earned: BTreeMap<u32, Decimal> = BTreeMap::new();
        for income in &ledger.incomes {
            *earned.entry(income.created_at.month()).or_insert(Decimal::ZERO) += income.amount;
        }

        // Only months with income appear; missing expenses count as zero.
        report.net_income_per_month = earned
            .iter()
            .map(|(month, income)| MonthNetIncome {
                month: *month,
                net_income: *income - spent.get(month).copied().unwrap_or(Decimal::ZERO),
            })
            .collect();

        report.spending_per_month = spent
            .into_iter()
            .map(|(month, total_spent)| MonthTotal { month, total_spent })
            .collect();

        let mut by_category_month: Vec<CategoryMonthTotal> = per_category
            .into_iter()
            .map(|((category, month), total_spent)| CategoryMonthTotal {
                category: category.map(str::to_string),
                month,
                total_spent,
            })
            .collect();
        by_category_month.sort_by(|a, b| {
            category_order(&a.category, &b.category).then_with(|| a.month.cmp(&b.month))
        });
        report.spending_by_category_per_month = by_category_month;
    }
}

/// Named categories sort by name; the uncategorized group sorts after all of them.
fn category_order(a: &Option<String>, b: &Option<String>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
