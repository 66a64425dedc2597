use axum::response::IntoResponse;
use marketplace_core::error::AppError;
use marketplace_core::observability::render_metrics;

pub async fn metrics() -> Result<impl IntoResponse, AppError> {
    render_metrics().ok_or(AppError::ServiceUnavailable)
}
