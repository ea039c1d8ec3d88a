//! Reports Routes
//!
//! - GET /reports - Rendered HTML page
//! - GET /api/v1/reports - JSON snapshot of the view
//! - POST /api/v1/reports/refresh - Fetch from the source now
//! - GET /api/v1/charts/:id - One chart as SVG

use axum::{
    extract::{Path, State},
    http::header,
    response::{Html, IntoResponse},
    Json,
};
use std::sync::Arc;

use crate::api::dto::RefreshResponse;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::view::ViewSnapshot;

const SVG_CONTENT_TYPE: &str = "image/svg+xml";

/// GET /reports
pub async fn reports_page(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.view.page().await)
}

/// GET /api/v1/reports
pub async fn reports_snapshot(State(state): State<Arc<AppState>>) -> Json<ViewSnapshot> {
    Json(state.view.snapshot().await)
}

/// POST /api/v1/reports/refresh
///
/// A failed fetch is reported as 504 on timeout and 502 otherwise; the
/// view itself shows the fixed error message.
pub async fn refresh_reports(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<RefreshResponse>> {
    let outcome = state.view.refresh().await?;

    Ok(Json(RefreshResponse {
        outcome,
        loading: state.view.is_loading().await,
        error: state.view.error().await,
    }))
}

/// GET /api/v1/charts/:id
pub async fn chart_svg(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let svg = state
        .view
        .chart_svg(&id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Chart '{}' not found", id)))?;

    Ok(([(header::CONTENT_TYPE, SVG_CONTENT_TYPE)], svg))
}
