//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::dispatch::{SanitizedBlock, SkippedItem};
use crate::report::ItemSummary;
use crate::view::RefreshOutcome;

// ============================================
// REPORT DTOs
// ============================================

/// Result of `POST /api/v1/reports/refresh`
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    #[serde(flatten)]
    pub outcome: RefreshOutcome,
    pub loading: bool,
    pub error: Option<String>,
}

// ============================================
// RENDER DTOs
// ============================================

/// Ad-hoc render request, same item shape as the upstream API
#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub items: Vec<Value>,
}

/// Ad-hoc render result
#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub items: Vec<ItemSummary>,
    /// SVG per chart id
    pub charts: BTreeMap<String, String>,
    pub html: Vec<SanitizedBlock>,
    pub skipped: Vec<SkippedItem>,
}

/// Markup to sanitize
#[derive(Debug, Deserialize)]
pub struct SanitizeRequest {
    pub html: String,
}

#[derive(Debug, Serialize)]
pub struct SanitizeResponse {
    pub html: String,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: "healthy", "starting", or "degraded"
    pub status: String,
    /// Source status: "ok", "pending", or "error"
    pub source: String,
    /// Number of items currently held by the view
    pub items: usize,
    /// Most recently started refresh
    pub generation: u64,
    pub uptime_seconds: u64,
    pub version: String,
}
