use analytics::AnalyticsEngine;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use configuration::settings::Settings;
use database::{DbRepository, FinanceRepository};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};

pub mod auth;
pub mod error;
pub mod handlers;
pub mod service;

pub use service::{Clock, FixedClock, ReportService, SystemClock};

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub service: ReportService,
}

impl AppState {
    pub fn new(service: ReportService) -> Self {
        Self { service }
    }
}

/// Builds the application router over the given state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/analytics", get(handlers::get_analytics))
        .route("/api/budgets/:budget_id", get(handlers::get_budget))
        .route("/api/categories", get(handlers::list_categories))
        .route("/api/export/:sheet", get(handlers::export_sheet))
        .route("/api/goals", get(handlers::list_goals).post(handlers::create_goal))
        .route("/api/goals/:goal_id", get(handlers::get_goal).delete(handlers::delete_goal))
        .route("/api/goals/:goal_id/savings", post(handlers::add_savings))
        .route("/api/goals/:goal_id/redeem", post(handlers::redeem_goal))
        .with_state(state)
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024))
}

/// Serves the API over `repo` until the process is stopped.
pub async fn serve(
    settings: &Settings,
    repo: Arc<dyn FinanceRepository>,
) -> anyhow::Result<()> {
    let engine =
        AnalyticsEngine::with_trailing_window_days(settings.analytics.trailing_window_days);
    let service = ReportService::new(repo, engine, Arc::new(SystemClock));
    let app = router(Arc::new(AppState::new(service)));

    let addr = settings.server.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Web server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

/// The main function to configure and run the web server against PostgreSQL.
pub async fn run_server(settings: &Settings) -> anyhow::Result<()> {
    // Note: Tracing is already initialized by the binary.
    let db_pool = database::connect(settings.database.max_connections).await?;
    database::run_migrations(&db_pool).await?;
    let repo: Arc<dyn FinanceRepository> = Arc::new(DbRepository::new(db_pool));

    serve(settings, repo).await
}
