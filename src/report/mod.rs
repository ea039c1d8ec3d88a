//! Report Data Model
//!
//! Typed report items and the chart specification carried inside chart
//! items. Validation happens here, at the parse boundary, so drawing code
//! only ever sees well-formed shapes.

mod chart_spec;
mod item;

pub use chart_spec::{ChartKind, ChartSpec, ChartSpecError, DataValue, Series, YScale};
pub use item::{
    ChartPayload, HtmlPayload, ItemError, ItemSummary, RawReportItem, ReportItem, ReportsResponse,
    CHART_TYPE, HTML_TYPE,
};
