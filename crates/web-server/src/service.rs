use crate::error::AppError;
use analytics::{resolve_selector, AnalyticsEngine, AnalyticsReport};
use chrono::{DateTime, Utc};
use core_types::UserId;
use database::FinanceRepository;
use exporter::Workbook;
use std::sync::Arc;

/// Source of "now" for the trailing window and the default month.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant, for reproducible reports.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Glues the repository, the engine and the clock together.
#[derive(Clone)]
pub struct ReportService {
    repo: Arc<dyn FinanceRepository>,
    engine: AnalyticsEngine,
    clock: Arc<dyn Clock>,
}

impl ReportService {
    pub fn new(
        repo: Arc<dyn FinanceRepository>,
        engine: AnalyticsEngine,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repo,
            engine,
            clock,
        }
    }

    pub fn repository(&self) -> &Arc<dyn FinanceRepository> {
        &self.repo
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Computes the report for the requested month. The month is validated
    /// before any record is read.
    pub async fn analytics(
        &self,
        user: UserId,
        month_param: Option<&str>,
    ) -> Result<AnalyticsReport, AppError> {
        let now = self.clock.now();
        let selector = resolve_selector(month_param, now)?;
        let ledger = self.repo.load_ledger(user).await?;
        Ok(self.engine.compute_report(&ledger, selector, now))
    }

    /// Builds the two-sheet export of the user's expenses and income.
    pub async fn export(&self, user: UserId) -> Result<Workbook, AppError> {
        let (expenses, incomes) = tokio::try_join!(
            self.repo.list_expenses(user),
            self.repo.list_incomes(user)
        )?;
        Ok(Workbook::from_records(&expenses, &incomes))
    }
}
