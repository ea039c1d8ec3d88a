//! # Reportview
//!
//! Report rendering pipeline for dashboards: fetches a list of heterogeneous
//! report items, draws chart items to SVG and sanitizes HTML items.
//!
//! ## Features
//!
//! - **Lenient decoding**: one malformed item never fails the whole list
//! - **Charts**: bar, line and pie charts rendered to standalone SVG
//! - **Sanitization**: untrusted markup cleaned with an allow-list
//! - **Fault isolation**: per-item errors are logged and skipped
//! - **HTTP API**: rendered page, JSON snapshot and per-chart SVG with Axum
//!
//! ## Modules
//!
//! - [`report`]: Wire items and chart specs
//! - [`render`]: Scales, shapes, surfaces and the chart renderer
//! - [`sanitize`]: HTML sanitizer
//! - [`dispatch`]: Routes items to the renderer or the sanitizer
//! - [`source`]: HTTP and file report sources
//! - [`view`]: Fetch lifecycle, surfaces and page rendering
//! - [`api`]: REST API server with Axum
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use reportview::dispatch::Dispatcher;
//! use reportview::logging::TracingLog;
//! use reportview::render::ChartRenderer;
//! use reportview::report::ReportItem;
//! use reportview::sanitize::HtmlSanitizer;
//! use reportview::view::render_items;
//!
//! let dispatcher = Dispatcher::new(
//!     ChartRenderer::new(),
//!     Arc::new(HtmlSanitizer::new()),
//!     TracingLog::shared(),
//! );
//!
//! let items = vec![
//!     ReportItem::html("<p onclick=\"x()\">Quarterly summary</p>"),
//!     ReportItem::chart(
//!         "sales",
//!         r#"{"title":"Sales","type":"bar","series":[{"name":"Q1","labels":["A","B"],"data":[5,10]}]}"#,
//!     ),
//! ];
//!
//! let state = render_items(items, &dispatcher);
//! assert!(state.chart_svg("sales").is_some());
//! assert_eq!(state.last_report.html[0].html, "<p>Quarterly summary</p>");
//! ```

pub mod api;
pub mod config;
pub mod dispatch;
pub mod logging;
pub mod render;
pub mod report;
pub mod sanitize;
pub mod source;
pub mod view;

// Re-export top-level types for convenience
pub use report::{ChartKind, ChartSpec, ChartSpecError, ItemError, ReportItem, ReportsResponse};

pub use render::{ChartRenderer, RenderError, RenderSurface, SurfaceRegistry};

pub use sanitize::{HtmlSanitizer, Sanitize};

pub use dispatch::{DispatchReport, Dispatcher, SanitizedBlock, SkipReason, SkippedItem};

pub use logging::{LogLevel, MemoryLog, RenderLog, SharedLog, TracingLog};

pub use source::{FileReportSource, HttpReportSource, ReportSource, SourceError};

pub use view::{RefreshOutcome, ReportsView, ViewSnapshot, ViewState, FETCH_ERROR_MESSAGE};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{
    ApiConfig, Config, ConfigError, LoggingConfig, RenderConfig, SanitizerConfig, SourceConfig,
};
