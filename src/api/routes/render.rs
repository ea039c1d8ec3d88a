//! Render Routes
//!
//! Stateless endpoints: nothing here touches the view.
//!
//! - POST /api/v1/render - Render a list of report items
//! - POST /api/v1/sanitize - Sanitize a block of markup

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::{RenderRequest, RenderResponse, SanitizeRequest, SanitizeResponse};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::report::{ReportItem, ReportsResponse};
use crate::sanitize::Sanitize;
use crate::view::render_items;

/// POST /api/v1/render
///
/// Items are drawn into a fresh set of surfaces; invalid items are
/// reported under `skipped` rather than failing the request.
pub async fn render(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RenderRequest>,
) -> ApiResult<Json<RenderResponse>> {
    let items: Vec<ReportItem> = ReportsResponse { items: req.items }.into_items();
    let rendered = render_items(items, state.view.dispatcher());
    let snapshot = rendered.snapshot(0);

    Ok(Json(RenderResponse {
        items: snapshot.items,
        charts: snapshot.charts,
        html: snapshot.html,
        skipped: snapshot.skipped,
    }))
}

/// POST /api/v1/sanitize
pub async fn sanitize(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SanitizeRequest>,
) -> Json<SanitizeResponse> {
    Json(SanitizeResponse {
        html: state.view.dispatcher().sanitizer().sanitize(&req.html),
    })
}
