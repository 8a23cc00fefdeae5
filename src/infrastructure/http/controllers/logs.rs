use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use crate::{
    application::dto::{CreateLogInput, LogOutput},
    infrastructure::http::middleware::{ApiError, ApiResult, AppState},
};

/// Ingest a log entry
pub async fn create_log(
    State(state): State<AppState>,
    payload: Result<Json<CreateLogInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<LogOutput>)> {
    let Json(input) = payload.map_err(|e| {
        tracing::debug!("Rejected log request body: {}", e);
        ApiError::BadRequest("Invalid request body format.".to_string())
    })?;

    let output = state.log_service.create_log(input).await?;

    Ok((StatusCode::CREATED, Json(output)))
}
