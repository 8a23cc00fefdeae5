use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::Stream;
use std::convert::Infallible;
use tokio_stream::StreamExt as _;
use uuid::Uuid;

use crate::infrastructure::http::middleware::{ApiError, ApiResult, AppState};

/// SSE endpoint streaming every log ingested for one application
pub async fn log_stream(
    State(state): State<AppState>,
    Path(application_id): Path<String>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let hub = state
        .event_hub
        .as_ref()
        .ok_or_else(|| ApiError::NotFound("Real-time streaming is disabled".to_string()))?;

    // Canonical form so the key matches the one used on ingestion
    let channel = Uuid::parse_str(application_id.trim())
        .map_err(|_| ApiError::BadRequest("Application ID must be a valid UUID".to_string()))?
        .to_string();

    let subscription = hub.subscribe(&channel);
    tracing::info!("New client connected to SSE channel: {}", channel);

    // The subscription deregisters itself when the client goes away and
    // the response stream is dropped
    let stream = subscription.map(|payload| {
        Ok::<_, Infallible>(Event::default().data(String::from_utf8_lossy(&payload)))
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::new().interval(state.sse_keep_alive)))
}
