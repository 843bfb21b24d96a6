//! HTTP request handlers.

use super::AppState;
use crate::stats::StatsError;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

// ============================================================================
// API: Stats
// ============================================================================

pub async fn handle_energy_yield(State(state): State<AppState>) -> impl IntoResponse {
    match state.service.current_mean_yield().await {
        Ok(mean) => Json(mean).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn handle_yesterday_performance(State(state): State<AppState>) -> impl IntoResponse {
    match state.service.yesterday_performance().await {
        Ok(reading) => Json(reading).into_response(),
        Err(e) => error_response(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
}

pub async fn handle_performance(
    State(state): State<AppState>,
    Query(window): Query<WindowQuery>,
) -> impl IntoResponse {
    match state.service.performance(window.from, window.to).await {
        Ok(reading) => Json(reading).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn handle_log_performance(
    State(state): State<AppState>,
    Path((from, to)): Path<(NaiveDate, NaiveDate)>,
) -> impl IntoResponse {
    match state.service.log_performance(from, to).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

fn error_response(e: StatsError) -> Response {
    tracing::error!("Request failed: {}", e);
    let status = match e {
        StatsError::Source(_) => StatusCode::BAD_GATEWAY,
        StatsError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string()).into_response()
}
