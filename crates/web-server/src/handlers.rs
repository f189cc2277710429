use crate::{auth::CurrentUser, error::AppError, AppState};
use analytics::AnalyticsReport;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use core_types::{BudgetRecord, CategoryRecord, Goal, NewGoal};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsQuery {
    /// A month name ("March") or number ("3"). Defaults to the current month.
    pub month: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SavingsRequest {
    pub amount: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateGoalRequest {
    pub name: Option<String>,
    pub target_amount: Option<String>,
}

/// Parses a required decimal field sent as a string.
fn required_decimal(
    raw: Option<String>,
    missing: &str,
    invalid: &str,
) -> Result<Decimal, AppError> {
    let raw = raw
        .filter(|a| !a.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest(missing.to_string()))?;
    Decimal::from_str(raw.trim()).map_err(|_| AppError::BadRequest(invalid.to_string()))
}

/// # GET /api/analytics?month=March
pub async fn get_analytics(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsReport>, AppError> {
    let report = state.service.analytics(user, query.month.as_deref()).await?;
    Ok(Json(report))
}

/// # GET /api/budgets/:budget_id
pub async fn get_budget(
    Path(budget_id): Path<i64>,
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<BudgetRecord>, AppError> {
    let budget = state
        .service
        .repository()
        .get_budget(user, budget_id)
        .await
        .map_err(AppError::not_found_as("Budget not found"))?;
    Ok(Json(budget))
}

/// # GET /api/categories
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    CurrentUser(_): CurrentUser,
) -> Result<Json<Vec<CategoryRecord>>, AppError> {
    let categories = state.service.repository().list_categories().await?;
    Ok(Json(categories))
}

/// # GET /api/export/:sheet
/// Downloads one sheet ("expenses" or "income") of the user's export as CSV.
pub async fn export_sheet(
    Path(sheet): Path<String>,
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Response, AppError> {
    let workbook = state.service.export(user).await?;
    let sheet = workbook
        .sheet(&sheet)
        .ok_or_else(|| AppError::NotFound(format!("Unknown export sheet '{sheet}'")))?;

    let body = sheet.to_csv()?;
    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename={}", sheet.file_name()),
        ),
    ];
    Ok((headers, body).into_response())
}

/// # GET /api/goals
pub async fn list_goals(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Goal>>, AppError> {
    let goals = state.service.repository().list_goals(user).await?;
    Ok(Json(goals))
}

/// # POST /api/goals
pub async fn create_goal(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateGoalRequest>,
) -> Result<(StatusCode, Json<Goal>), AppError> {
    let name = request
        .name
        .ok_or_else(|| AppError::BadRequest("Name is required".to_string()))?;
    let target = required_decimal(
        request.target_amount,
        "Target amount is required",
        "Invalid target amount",
    )?;
    let draft = NewGoal::new(name, target)?;

    let goal = state
        .service
        .repository()
        .create_goal(user, draft, state.service.now())
        .await?;

    tracing::info!(user = %user, goal_id = goal.id, "Goal created.");
    Ok((StatusCode::CREATED, Json(goal)))
}

/// # GET /api/goals/:goal_id
pub async fn get_goal(
    Path(goal_id): Path<i64>,
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Goal>, AppError> {
    let goal = state
        .service
        .repository()
        .get_goal(user, goal_id)
        .await
        .map_err(AppError::not_found_as("Goal not found"))?;
    Ok(Json(goal))
}

/// # DELETE /api/goals/:goal_id
/// Removes a goal whether or not it was achieved.
pub async fn delete_goal(
    Path(goal_id): Path<i64>,
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Value>, AppError> {
    state
        .service
        .repository()
        .delete_goal(user, goal_id)
        .await
        .map_err(AppError::not_found_as("Goal not found"))?;

    tracing::info!(user = %user, goal_id, "Goal deleted.");
    Ok(Json(json!({
        "success": "Goal deleted",
        "message": "Goal deleted successfully"
    })))
}

/// # POST /api/goals/:goal_id/savings
pub async fn add_savings(
    Path(goal_id): Path<i64>,
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<SavingsRequest>,
) -> Result<Json<Goal>, AppError> {
    let repo = state.service.repository();
    let mut goal = repo
        .get_goal(user, goal_id)
        .await
        .map_err(AppError::not_found_as("Goal not found"))?;

    let amount = required_decimal(request.amount, "Amount is required", "Invalid amount")?;

    goal.add_savings(amount, state.service.now())?;
    repo.save_goal(&goal)
        .await
        .map_err(AppError::not_found_as("Goal not found"))?;

    tracing::info!(user = %user, goal_id, %amount, "Savings added to goal.");
    Ok(Json(goal))
}

/// # POST /api/goals/:goal_id/redeem
/// Redeeming an achieved goal removes it.
pub async fn redeem_goal(
    Path(goal_id): Path<i64>,
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Value>, AppError> {
    let repo = state.service.repository();
    let goal = repo
        .get_goal(user, goal_id)
        .await
        .map_err(AppError::not_found_as("Goal not found"))?;

    goal.redeem()?;
    repo.delete_goal(user, goal_id)
        .await
        .map_err(AppError::not_found_as("Goal not found"))?;

    tracing::info!(user = %user, goal_id, "Goal redeemed.");
    Ok(Json(json!({
        "success": "Goal redeemed",
        "message": "Goal redeemed successfully"
    })))
}
