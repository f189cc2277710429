use analytics::AnalyticsError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use core_types::CoreError;
use database::DbError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),
    #[error("Analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
    #[error("Export error: {0}")]
    Export(#[from] exporter::ExportError),
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl AppError {
    /// Maps a repository `NotFound` to a 404 carrying `message`; other
    /// repository errors pass through unchanged.
    pub fn not_found_as(message: &str) -> impl FnOnce(DbError) -> AppError + '_ {
        move |e| match e {
            DbError::NotFound => AppError::NotFound(message.to_string()),
            other => AppError::Database(other),
        }
    }
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Database(db_err) => {
                tracing::error!(error = ?db_err, "Database error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal database error occurred".to_string(),
                )
            }
            AppError::Analytics(analytics_err) => {
                (StatusCode::BAD_REQUEST, analytics_err.to_string())
            }
            AppError::Export(export_err) => {
                tracing::error!(error = ?export_err, "Export error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred while exporting data".to_string(),
                )
            }
            AppError::Core(CoreError::GoalNotAchieved(_)) => {
                (StatusCode::BAD_REQUEST, "Goal not achieved yet".to_string())
            }
            AppError::Core(core_err) => (StatusCode::BAD_REQUEST, core_err.to_string()),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
