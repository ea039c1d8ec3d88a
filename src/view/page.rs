//! HTML page rendering
//!
//! Lays the view out as a standalone document: a loading indicator, the
//! fetch error, or every renderable item in list order. Charts are inlined
//! as SVG; html items only ever appear in their sanitized form.

use std::fmt::Write;

use crate::dispatch::DispatchReport;
use crate::render::surface::escape;
use crate::render::SurfaceRegistry;
use crate::report::ReportItem;

use super::state::ViewState;

pub const PAGE_TITLE: &str = "Reports";
pub const LOADING_TEXT: &str = "Loading...";

const PAGE_STYLE: &str = "body { font-family: sans-serif; margin: 2rem; } \
.report-item { margin-bottom: 2rem; } \
.error { color: #c62828; }";

/// What a page is drawn from
pub struct PageParts<'a> {
    pub loading: bool,
    pub error: Option<&'a str>,
    pub items: &'a [ReportItem],
    pub surfaces: &'a SurfaceRegistry,
    pub report: &'a DispatchReport,
}

impl<'a> From<&'a ViewState> for PageParts<'a> {
    fn from(state: &'a ViewState) -> Self {
        Self {
            loading: state.loading,
            error: state.error.as_deref(),
            items: &state.items,
            surfaces: &state.surfaces,
            report: &state.last_report,
        }
    }
}

pub fn render_page(parts: &PageParts<'_>) -> String {
    let mut out = String::with_capacity(8192);
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>{}</title>", PAGE_TITLE);
    let _ = writeln!(out, "<style>{}</style>", PAGE_STYLE);
    out.push_str("</head>\n<body>\n<main class=\"reports\">\n");
    let _ = writeln!(out, "<h1>{}</h1>", PAGE_TITLE);
    out.push_str(&render_body(parts));
    out.push_str("</main>\n</body>\n</html>\n");
    out
}

/// The content section alone, without the document shell
pub fn render_body(parts: &PageParts<'_>) -> String {
    let mut out = String::new();

    if parts.loading {
        let _ = writeln!(out, "<div class=\"loading\">{}</div>", LOADING_TEXT);
        return out;
    }
    if let Some(error) = parts.error {
        let _ = writeln!(out, "<div class=\"error\">{}</div>", escape(error));
        return out;
    }

    for (index, item) in parts.items.iter().enumerate() {
        match item {
            ReportItem::Chart(payload) => {
                if let Some(surface) = parts.surfaces.get(&payload.id).filter(|s| !s.is_empty()) {
                    let _ = writeln!(
                        out,
                        "<div class=\"report-item chart-container\">{}</div>",
                        surface.to_svg()
                    );
                }
            }
            ReportItem::Html(_) => {
                if let Some(block) = parts.report.html.iter().find(|b| b.index == index) {
                    let _ = writeln!(
                        out,
                        "<div class=\"report-item html-content\">{}</div>",
                        block.html
                    );
                }
            }
            ReportItem::Unknown { .. } | ReportItem::Invalid { .. } => {}
        }
    }

    out
}
