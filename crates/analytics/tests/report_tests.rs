use analytics::{
    resolve_selector, AnalyticsEngine, AnalyticsError, AnalyticsReport, CategoryTotal, MonthTotal,
};
use chrono::{DateTime, TimeZone, Utc};
use core_types::{
    BudgetRecord, CategoryRecord, ExpenseRecord, IncomeRecord, Ledger, MonthSelector, UserId,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const USER: UserId = UserId(1);

fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

fn category(name: &str) -> Option<CategoryRecord> {
    CategoryRecord::seed().into_iter().find(|c| c.name == name)
}

fn for_request(
    ledger: &Ledger,
    month: &str,
    now: DateTime<Utc>,
) -> Result<AnalyticsReport, AnalyticsError> {
    let selector = resolve_selector(Some(month), now)?;
    Ok(AnalyticsEngine::new().compute_report(ledger, selector, now))
}

fn spent(category: Option<&str>, total_spent: Decimal) -> CategoryTotal {
    CategoryTotal {
        category: category.map(str::to_string),
        total_spent,
    }
}

fn month_total(month: u32, total_spent: Decimal) -> MonthTotal {
    MonthTotal { month, total_spent }
}

fn expense(
    id: i64,
    budget_id: i64,
    cat: Option<&str>,
    amount: Decimal,
    created_at: DateTime<Utc>,
) -> ExpenseRecord {
    ExpenseRecord {
        id,
        budget_id,
        name: format!("expense-{id}"),
        amount,
        created_at,
        category: cat.and_then(category),
    }
}

fn income(id: i64, amount: Decimal, created_at: DateTime<Utc>) -> IncomeRecord {
    IncomeRecord {
        id,
        owner: USER,
        name: "Salary".to_string(),
        amount,
        created_at,
    }
}

fn budget(id: i64, amount: Decimal, created_at: DateTime<Utc>) -> BudgetRecord {
    BudgetRecord {
        id,
        owner: USER,
        name: format!("budget-{id}"),
        amount,
        created_at,
        category: None,
    }
}

fn march() -> MonthSelector {
    MonthSelector::new(2024, 3).unwrap()
}

/// Food 50 + Food 30 + Transport 20 in March, 200 of income in March.
fn march_ledger() -> Ledger {
    Ledger::new(
        vec![
            expense(1, 1, Some("Food"), dec!(50), at(2024, 3, 4)),
            expense(2, 1, Some("Food"), dec!(30), at(2024, 3, 12)),
            expense(3, 1, Some("Transport"), dec!(20), at(2024, 3, 20)),
        ],
        vec![income(1, dec!(200), at(2024, 3, 1))],
        vec![budget(1, dec!(500), at(2024, 3, 1))],
    )
}

#[test]
fn empty_ledger_produces_zeroed_report() {
    let engine = AnalyticsEngine::new();
    let report = engine.compute_report(&Ledger::default(), march(), at(2024, 3, 31));

    assert_eq!(report, AnalyticsReport::new());
    assert_eq!(report.total_spent_current_month, Decimal::ZERO);
    assert_eq!(report.net_income_current_month, Decimal::ZERO);
    assert_eq!(report.average_monthly_spent, Decimal::ZERO);
    assert_eq!(report.budgets_exceeded, 0);
    assert!(report.most_spent_category.is_none());
    assert!(report.least_spent_category.is_none());
}

#[test]
fn march_scenario() {
    let engine = AnalyticsEngine::new();
    let report = engine.compute_report(&march_ledger(), march(), at(2024, 3, 31));

    assert_eq!(
        report.most_spent_category,
        Some(spent(Some("Food"), dec!(80)))
    );
    assert_eq!(
        report.least_spent_category,
        Some(spent(Some("Transport"), dec!(20)))
    );
    assert_eq!(report.total_spent_current_month, dec!(100));
    assert_eq!(report.net_income_current_month, dec!(100));
    assert_eq!(
        report.spending_by_category,
        vec![
            spent(Some("Food"), dec!(80)),
            spent(Some("Transport"), dec!(20)),
        ]
    );
}

#[test]
fn category_breakdown_reconciles_with_total() {
    let mut ledger = march_ledger();
    ledger.expenses.push(expense(4, 1, None, dec!(12.50), at(2024, 3, 9)));
    ledger.expenses.push(expense(5, 1, Some("Shopping"), dec!(7.25), at(2024, 3, 9)));
    ledger.expenses.push(expense(6, 1, Some("Food"), dec!(999), at(2024, 4, 1)));

    let report = AnalyticsEngine::new().compute_report(&ledger, march(), at(2024, 3, 31));
    let by_category: Decimal = report.spending_by_category.iter().map(|c| c.total_spent).sum();

    assert_eq!(report.total_spent_current_month, dec!(119.75));
    assert_eq!(by_category, report.total_spent_current_month);
}

#[test]
fn least_spent_ignores_uncategorized_but_most_spent_does_not() {
    let ledger = Ledger::new(
        vec![
            expense(1, 1, None, dec!(500), at(2024, 3, 2)),
            expense(2, 1, Some("Food"), dec!(10), at(2024, 3, 2)),
        ],
        vec![],
        vec![],
    );
    let report = AnalyticsEngine::new().compute_report(&ledger, march(), at(2024, 3, 31));

    assert_eq!(
        report.most_spent_category,
        Some(spent(None, dec!(500)))
    );
    assert_eq!(
        report.least_spent_category.and_then(|c| c.category),
        Some("Food".to_string())
    );
}

#[test]
fn ties_break_by_category_name() {
    let ledger = Ledger::new(
        vec![
            expense(1, 1, Some("Transport"), dec!(40), at(2024, 3, 2)),
            expense(2, 1, Some("Food"), dec!(40), at(2024, 3, 3)),
            expense(3, 1, Some("Shopping"), dec!(40), at(2024, 3, 4)),
        ],
        vec![],
        vec![],
    );
    let report = AnalyticsEngine::new().compute_report(&ledger, march(), at(2024, 3, 31));

    let most = report.most_spent_category.unwrap();
    let least = report.least_spent_category.unwrap();
    assert_eq!(most.category.as_deref(), Some("Food"));
    assert_eq!(least.category.as_deref(), Some("Food"));
    let order: Vec<_> = report
        .spending_by_category
        .iter()
        .map(|c| c.category.clone().unwrap())
        .collect();
    assert_eq!(order, vec!["Food", "Shopping", "Transport"]);
}

#[test]
fn net_income_handles_one_sided_months() {
    let engine = AnalyticsEngine::new();

    let only_income = Ledger::new(vec![], vec![income(1, dec!(250), at(2024, 3, 1))], vec![]);
    let report = engine.compute_report(&only_income, march(), at(2024, 3, 31));
    assert_eq!(report.net_income_current_month, dec!(250));

    let only_expense = Ledger::new(
        vec![expense(1, 1, Some("Food"), dec!(70), at(2024, 3, 5))],
        vec![],
        vec![],
    );
    let report = engine.compute_report(&only_expense, march(), at(2024, 3, 31));
    assert_eq!(report.net_income_current_month, dec!(-70));
}

#[test]
fn month_name_and_number_select_the_same_month() {
    let ledger = march_ledger();
    let now = at(2024, 6, 1);

    let by_name = for_request(&ledger, "March", now).unwrap();
    let by_number = for_request(&ledger, "3", now).unwrap();
    assert_eq!(by_name, by_number);
    assert_eq!(by_name.total_spent_current_month, dec!(100));
}

#[test]
fn malformed_months_are_validation_errors() {
    let ledger = march_ledger();
    let now = at(2024, 6, 1);

    assert_eq!(
        for_request(&ledger, "13", now),
        Err(AnalyticsError::InvalidMonth("13".to_string()))
    );
    assert_eq!(
        for_request(&ledger, "Foo", now),
        Err(AnalyticsError::InvalidMonth("Foo".to_string()))
    );
}

#[test]
fn year_of_now_scopes_the_request() {
    let next_year = for_request(&march_ledger(), "March", at(2025, 3, 15)).unwrap();
    assert_eq!(next_year.total_spent_current_month, Decimal::ZERO);
    assert!(next_year.most_spent_category.is_none());
}

#[test]
fn computing_twice_is_idempotent() {
    let engine = AnalyticsEngine::new();
    let ledger = march_ledger();
    let first = engine.compute_report(&ledger, march(), at(2024, 3, 31));
    let second = engine.compute_report(&ledger, march(), at(2024, 3, 31));

    assert_eq!(first, second);
    assert_eq!(ledger, march_ledger());
}

#[test]
fn budget_exceeded_only_above_cap() {
    let engine = AnalyticsEngine::new();

    let over = Ledger::new(
        vec![
            expense(1, 9, Some("Food"), dec!(70), at(2024, 3, 2)),
            expense(2, 9, Some("Food"), dec!(50), at(2024, 3, 3)),
        ],
        vec![],
        vec![budget(9, dec!(100), at(2024, 3, 1))],
    );
    assert_eq!(engine.compute_report(&over, march(), at(2024, 3, 31)).budgets_exceeded, 1);

    let at_cap = Ledger::new(
        vec![
            expense(1, 9, Some("Food"), dec!(70), at(2024, 3, 2)),
            expense(2, 9, Some("Food"), dec!(30), at(2024, 3, 3)),
        ],
        vec![],
        vec![budget(9, dec!(100), at(2024, 3, 1))],
    );
    assert_eq!(engine.compute_report(&at_cap, march(), at(2024, 3, 31)).budgets_exceeded, 0);
}

#[test]
fn budgets_from_other_months_are_not_counted() {
    let ledger = Ledger::new(
        vec![expense(1, 9, Some("Food"), dec!(500), at(2024, 3, 2))],
        vec![],
        vec![budget(9, dec!(100), at(2024, 2, 1))],
    );
    let report = AnalyticsEngine::new().compute_report(&ledger, march(), at(2024, 3, 31));
    assert_eq!(report.budgets_exceeded, 0);
}

#[test]
fn budget_without_expenses_is_never_exceeded() {
    let ledger = Ledger::new(vec![], vec![], vec![budget(9, dec!(-10), at(2024, 3, 1))]);
    let report = AnalyticsEngine::new().compute_report(&ledger, march(), at(2024, 3, 31));
    assert_eq!(report.budgets_exceeded, 0);
}

#[test]
fn spending_per_month_collapses_years() {
    let ledger = Ledger::new(
        vec![
            expense(1, 1, Some("Food"), dec!(10), at(2023, 3, 5)),
            expense(2, 1, Some("Food"), dec!(15), at(2024, 3, 5)),
            expense(3, 1, Some("Transport"), dec!(8), at(2024, 1, 5)),
        ],
        vec![],
        vec![],
    );
    let report = AnalyticsEngine::new().compute_report(&ledger, march(), at(2024, 3, 31));

    assert_eq!(
        report.spending_per_month,
        vec![
            month_total(1, dec!(8)),
            month_total(3, dec!(25)),
        ]
    );
}

#[test]
fn net_income_per_month_only_lists_months_with_income() {
    let ledger = Ledger::new(
        vec![
            expense(1, 1, Some("Food"), dec!(40), at(2024, 1, 5)),
            expense(2, 1, Some("Food"), dec!(60), at(2024, 2, 5)),
        ],
        vec![income(1, dec!(100), at(2024, 1, 1)), income(2, dec!(30), at(2024, 4, 1))],
        vec![],
    );
    let report = AnalyticsEngine::new().compute_report(&ledger, march(), at(2024, 4, 30));

    let series: Vec<(u32, Decimal)> = report
        .net_income_per_month
        .iter()
        .map(|m| (m.month, m.net_income))
        .collect();
    assert_eq!(series, vec![(1, dec!(60)), (4, dec!(30))]);
}

#[test]
fn category_per_month_is_ordered_by_category_then_month() {
    let ledger = Ledger::new(
        vec![
            expense(1, 1, Some("Transport"), dec!(5), at(2024, 2, 5)),
            expense(2, 1, None, dec!(1), at(2024, 1, 5)),
            expense(3, 1, Some("Food"), dec!(9), at(2024, 5, 5)),
            expense(4, 1, Some("Food"), dec!(3), at(2024, 2, 5)),
            expense(5, 1, Some("Food"), dec!(4), at(2023, 2, 5)),
        ],
        vec![],
        vec![],
    );
    let report = AnalyticsEngine::new().compute_report(&ledger, march(), at(2024, 5, 31));

    let rows: Vec<(Option<String>, u32, Decimal)> = report
        .spending_by_category_per_month
        .into_iter()
        .map(|r| (r.category, r.month, r.total_spent))
        .collect();
    assert_eq!(
        rows,
        vec![
            (Some("Food".to_string()), 2, dec!(7)),
            (Some("Food".to_string()), 5, dec!(9)),
            (Some("Transport".to_string()), 2, dec!(5)),
            (None, 1, dec!(1)),
        ]
    );
}

#[test]
fn weekly_expenses_group_by_iso_week() {
    // 2024-03-04 and 2024-03-06 are ISO week 10, 2024-03-11 is week 11.
    let ledger = Ledger::new(
        vec![
            expense(1, 1, Some("Food"), dec!(10), at(2024, 3, 4)),
            expense(2, 1, Some("Food"), dec!(5), at(2024, 3, 6)),
            expense(3, 1, Some("Food"), dec!(2), at(2024, 3, 11)),
            expense(4, 1, Some("Food"), dec!(100), at(2024, 2, 27)),
        ],
        vec![],
        vec![],
    );
    let report = AnalyticsEngine::new().compute_report(&ledger, march(), at(2024, 3, 31));

    let weeks: Vec<(u32, Decimal)> = report
        .weekly_expenses
        .iter()
        .map(|w| (w.week, w.total_spent))
        .collect();
    assert_eq!(weeks, vec![(10, dec!(15)), (11, dec!(2))]);
}

#[test]
fn average_uses_trailing_window_not_selected_month() {
    let now = at(2024, 5, 31);
    let ledger = Ledger::new(
        vec![
            expense(1, 1, Some("Food"), dec!(10), at(2024, 5, 20)),
            expense(2, 1, Some("Food"), dec!(30), at(2024, 5, 2)),
            expense(3, 1, Some("Food"), dec!(1000), at(2024, 3, 10)),
        ],
        vec![],
        vec![],
    );

    let report = AnalyticsEngine::new().compute_report(&ledger, march(), now);
    assert_eq!(report.average_monthly_spent, dec!(20));

    let narrow =
        AnalyticsEngine::with_trailing_window_days(15).compute_report(&ledger, march(), now);
    assert_eq!(narrow.average_monthly_spent, dec!(10));
}

#[test]
fn report_serializes_with_dashboard_field_names() {
    let report = AnalyticsEngine::new().compute_report(&march_ledger(), march(), at(2024, 3, 31));
    let json = serde_json::to_value(&report).unwrap();

    for key in [
        "most_spent_category",
        "least_spent_category",
        "average_monthly_spent",
        "net_income_current_month",
        "net_income_per_month",
        "spending_per_month",
        "spending_by_category",
        "total_spent_current_month",
        "spending_by_category_per_month",
        "budgets_exceeded",
        "weekly_expenses",
    ] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
    assert_eq!(json["most_spent_category"]["category__name"], "Food");
    assert_eq!(json["budgets_exceeded"], 0);
}
