use analytics::{parse_month, resolve_selector, AnalyticsEngine, AnalyticsReport};
use anyhow::Context;
use chrono::{Datelike, Utc};
use clap::{Parser, Subcommand};
use comfy_table::Table;
use configuration::Settings;
use core_types::{Ledger, MonthSelector, UserId};
use database::{DbRepository, FinanceRepository, InMemoryRepository};
use exporter::Workbook;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The main entry point for the Ledgerlens finance backend.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if there is one.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let settings = configuration::load_settings_from(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    let _log_guard = configuration::init_tracing(&settings.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Serve(args) => handle_serve(args, &settings).await,
        Commands::Report(args) => handle_report(args, &settings).await,
        Commands::Export(args) => handle_export(args, &settings).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Personal finance tracking backend: budgets, expenses, income and analytics.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = configuration::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API.
    Serve(ServeArgs),
    /// Compute the analytics report for one user and print it.
    Report(ReportArgs),
    /// Write a user's expenses and income as CSV sheets.
    Export(ExportArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Serve from an in-memory store instead of PostgreSQL.
    #[arg(long)]
    in_memory: bool,

    /// JSON ledger (`budgets`, `expenses`, `incomes`) preloaded into the in-memory store.
    #[arg(long, requires = "in_memory")]
    seed: Option<PathBuf>,
}

#[derive(Parser)]
struct ReportArgs {
    /// The user to report on.
    #[arg(long)]
    user: i64,

    /// Month name ("March") or number ("3"). Defaults to the current month.
    #[arg(long)]
    month: Option<String>,

    /// Year of the selected month. Defaults to the current year.
    #[arg(long)]
    year: Option<i32>,

    /// Print a summary table instead of JSON.
    #[arg(long)]
    table: bool,
}

#[derive(Parser)]
struct ExportArgs {
    /// The user whose records are exported.
    #[arg(long)]
    user: i64,

    /// Directory the CSV sheets are written to.
    #[arg(long, default_value = ".")]
    out: PathBuf,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_serve(args: ServeArgs, settings: &Settings) -> anyhow::Result<()> {
    if args.in_memory {
        tracing::warn!("Serving from an in-memory store; data is lost on exit.");
        let store = match &args.seed {
            Some(path) => InMemoryRepository::from_ledger(read_ledger_file(path)?),
            None => InMemoryRepository::new(),
        };
        let repo: Arc<dyn FinanceRepository> = Arc::new(store);
        return web_server::serve(settings, repo).await;
    }
    web_server::run_server(settings).await
}

fn read_ledger_file(path: &Path) -> anyhow::Result<Ledger> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading seed ledger {}", path.display()))?;
    let ledger: Ledger = serde_json::from_str(&raw)
        .with_context(|| format!("parsing seed ledger {}", path.display()))?;
    tracing::info!(
        budgets = ledger.budgets.len(),
        expenses = ledger.expenses.len(),
        incomes = ledger.incomes.len(),
        "Seed ledger loaded."
    );
    Ok(ledger)
}

async fn connect_repository(settings: &Settings) -> anyhow::Result<DbRepository> {
    let db_pool = database::connect(settings.database.max_connections).await?;
    database::run_migrations(&db_pool).await?;
    Ok(DbRepository::new(db_pool))
}

async fn handle_report(args: ReportArgs, settings: &Settings) -> anyhow::Result<()> {
    let now = Utc::now();
    let selector = match args.year {
        Some(year) => {
            let month = match args.month.as_deref() {
                Some(raw) => parse_month(raw)?,
                None => now.month(),
            };
            MonthSelector::new(year, month)?
        }
        None => resolve_selector(args.month.as_deref(), now)?,
    };

    let repo = connect_repository(settings).await?;
    let ledger = repo.load_ledger(UserId(args.user)).await?;
    let engine =
        AnalyticsEngine::with_trailing_window_days(settings.analytics.trailing_window_days);
    let report = engine.compute_report(&ledger, selector, now);

    if args.table {
        println!("{}", summary_table(&report, selector));
    } else {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

fn summary_table(report: &AnalyticsReport, selector: MonthSelector) -> Table {
    let label = |c: &Option<String>| c.clone().unwrap_or_else(|| "(uncategorized)".to_string());

    let mut table = Table::new();
    table.set_header(vec![
        format!("{}-{:02}", selector.year(), selector.month()),
        "Amount".to_string(),
    ]);
    table.add_row(vec!["Total spent".to_string(), report.total_spent_current_month.to_string()]);
    table.add_row(vec!["Net income".to_string(), report.net_income_current_month.to_string()]);
    table.add_row(vec![
        "Average spend (trailing)".to_string(),
        report.average_monthly_spent.round_dp(2).to_string(),
    ]);
    table.add_row(vec!["Budgets exceeded".to_string(), report.budgets_exceeded.to_string()]);
    for entry in &report.spending_by_category {
        table.add_row(vec![format!("  {}", label(&entry.category)), entry.total_spent.to_string()]);
    }
    table
}

async fn handle_export(args: ExportArgs, settings: &Settings) -> anyhow::Result<()> {
    let repo = connect_repository(settings).await?;
    let user = UserId(args.user);
    let (expenses, incomes) = tokio::try_join!(repo.list_expenses(user), repo.list_incomes(user))?;

    let written = Workbook::from_records(&expenses, &incomes).write_to_dir(&args.out)?;
    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}
