//! Content Dispatcher
//!
//! Routes each report item to the sanitizer or the chart renderer. Faults
//! are isolated per item: a bad item is logged, recorded as skipped, and
//! the pass moves on to the next one.

use std::sync::Arc;

use serde::Serialize;

use crate::config::Config;
use crate::logging::SharedLog;
use crate::render::{ChartRenderer, SurfaceRegistry};
use crate::report::{ChartPayload, ChartSpec, ReportItem};
use crate::sanitize::{HtmlSanitizer, Sanitize};

/// A chart drawn during a dispatch pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedChart {
    pub index: usize,
    pub id: String,
}

/// Sanitized markup for an html item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SanitizedBlock {
    pub index: usize,
    pub html: String,
}

/// Why an item produced no output
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// No surface exists for the chart id
    MissingSurface { id: String },
    /// Failed validation when the list was decoded
    InvalidItem { message: String },
    /// `chart_data` did not parse
    InvalidChartData { id: String, message: String },
    /// The renderer rejected the chart
    RenderFailed { id: String, message: String },
    UnknownType { kind: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedItem {
    pub index: usize,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Outcome of one dispatch pass, in item order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DispatchReport {
    pub rendered: Vec<RenderedChart>,
    pub html: Vec<SanitizedBlock>,
    pub skipped: Vec<SkippedItem>,
}

impl DispatchReport {
    pub fn skipped_indices(&self) -> Vec<usize> {
        self.skipped.iter().map(|s| s.index).collect()
    }

    pub fn is_rendered(&self, id: &str) -> bool {
        self.rendered.iter().any(|c| c.id == id)
    }
}

/// Routes report items to their handlers
#[derive(Clone)]
pub struct Dispatcher {
    renderer: ChartRenderer,
    sanitizer: Arc<dyn Sanitize>,
    log: SharedLog,
}

impl Dispatcher {
    pub fn new(renderer: ChartRenderer, sanitizer: Arc<dyn Sanitize>, log: SharedLog) -> Self {
        Self {
            renderer,
            sanitizer,
            log,
        }
    }

    /// Build a dispatcher with the configured renderer and sanitizer
    pub fn from_config(config: &Config, log: SharedLog) -> Self {
        Self::new(
            ChartRenderer::from_config(&config.render),
            Arc::new(HtmlSanitizer::from_config(&config.sanitizer)),
            log,
        )
    }

    pub fn sanitizer(&self) -> &dyn Sanitize {
        self.sanitizer.as_ref()
    }

    /// Handle every item in order. Never fails; faults end up in `skipped`.
    pub fn dispatch(&self, items: &[ReportItem], surfaces: &mut SurfaceRegistry) -> DispatchReport {
        let mut report = DispatchReport::default();

        for (index, item) in items.iter().enumerate() {
            match item {
                ReportItem::Chart(payload) => match self.draw_chart(payload, surfaces) {
                    Ok(()) => report.rendered.push(RenderedChart {
                        index,
                        id: payload.id.clone(),
                    }),
                    Err(reason) => report.skipped.push(SkippedItem { index, reason }),
                },
                ReportItem::Html(payload) => report.html.push(SanitizedBlock {
                    index,
                    html: self.sanitizer.sanitize(&payload.html_content),
                }),
                ReportItem::Unknown { kind } => {
                    self.log
                        .trace(&format!("item {}: ignoring unknown type {:?}", index, kind));
                    report.skipped.push(SkippedItem {
                        index,
                        reason: SkipReason::UnknownType { kind: kind.clone() },
                    });
                }
                ReportItem::Invalid { error, .. } => {
                    self.log.warn(&format!("item {}: {}", index, error));
                    report.skipped.push(SkippedItem {
                        index,
                        reason: SkipReason::InvalidItem {
                            message: error.to_string(),
                        },
                    });
                }
            }
        }

        self.log.debug(&format!(
            "dispatched {} items: {} charts, {} html, {} skipped",
            items.len(),
            report.rendered.len(),
            report.html.len(),
            report.skipped.len()
        ));
        report
    }

    fn draw_chart(&self, payload: &ChartPayload, surfaces: &mut SurfaceRegistry) -> Result<(), SkipReason> {
        let id = &payload.id;
        let Some(surface) = surfaces.get_mut(id) else {
            self.log.debug(&format!("no surface for chart {:?}, skipping", id));
            return Err(SkipReason::MissingSurface { id: id.clone() });
        };

        let spec = match ChartSpec::from_chart_data(&payload.chart_data) {
            Ok(spec) => spec,
            Err(e) => {
                self.log
                    .error(&format!("chart {:?}: invalid chart_data: {}", id, e));
                // no stale drawing from an earlier pass
                surface.clear();
                return Err(SkipReason::InvalidChartData {
                    id: id.clone(),
                    message: e.to_string(),
                });
            }
        };

        if let Some(series) = spec.primary_series() {
            if !series.is_aligned() {
                self.log.warn(&format!(
                    "chart {:?}: {} labels for {} values, drawing the overlap",
                    id,
                    series.labels.len(),
                    series.data.len()
                ));
            }
        }

        self.renderer.render(surface, &spec).map_err(|e| {
            self.log.error(&format!("chart {:?}: render failed: {}", id, e));
            SkipReason::RenderFailed {
                id: id.clone(),
                message: e.to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogLevel, MemoryLog};
    use serde_json::json;

    const BAR: &str = r#"{"chart":{"title":"Sales","type":"bar",
        "series":[{"name":"Q1","labels":["A","B"],"data":[5,10]}]}}"#;
    const PIE: &str = r#"{"title":"Share","type":"pie",
        "series":[{"name":"S","labels":["x","y"],"data":[1,3]}]}"#;

    fn dispatcher() -> (Dispatcher, Arc<MemoryLog>) {
        let log = Arc::new(MemoryLog::new());
        let d = Dispatcher::new(
            ChartRenderer::new(),
            Arc::new(HtmlSanitizer::new()),
            log.clone(),
        );
        (d, log)
    }

    fn registry(ids: &[&str]) -> SurfaceRegistry {
        let mut reg = SurfaceRegistry::new();
        for id in ids {
            reg.ensure(id);
        }
        reg
    }

    #[test]
    fn test_missing_surface_skips_only_that_item() {
        let (d, log) = dispatcher();
        let mut surfaces = registry(&["present"]);
        let items = vec![
            ReportItem::chart("absent", BAR),
            ReportItem::chart("present", BAR),
        ];

        let report = d.dispatch(&items, &mut surfaces);

        assert!(report.is_rendered("present"));
        assert_eq!(
            report.skipped,
            vec![SkippedItem {
                index: 0,
                reason: SkipReason::MissingSurface {
                    id: "absent".to_string()
                },
            }]
        );
        assert!(log.at_least(LogLevel::Warn).is_empty());
        assert!(!surfaces.get("present").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_chart_data_is_logged_and_isolated() {
        let (d, log) = dispatcher();
        let mut surfaces = registry(&["bad", "good"]);
        let items = vec![
            ReportItem::chart("bad", "{not json"),
            ReportItem::html("<p>after</p>"),
            ReportItem::chart("good", PIE),
        ];

        let report = d.dispatch(&items, &mut surfaces);

        assert_eq!(report.skipped_indices(), vec![0]);
        assert!(matches!(
            report.skipped[0].reason,
            SkipReason::InvalidChartData { .. }
        ));
        assert!(log.contains(LogLevel::Error, "invalid chart_data"));
        assert_eq!(report.html[0].html, "<p>after</p>");
        assert!(report.is_rendered("good"));
        assert!(surfaces.get("bad").unwrap().is_empty());
    }

    #[test]
    fn test_html_is_sanitized() {
        let (d, _) = dispatcher();
        let mut surfaces = SurfaceRegistry::new();
        let report = d.dispatch(
            &[ReportItem::html("<img src=x onerror=alert(1)>")],
            &mut surfaces,
        );
        assert_eq!(report.html.len(), 1);
        assert!(!report.html[0].html.contains("onerror"));
    }

    #[test]
    fn test_unknown_type_skipped_silently() {
        let (d, log) = dispatcher();
        let mut surfaces = SurfaceRegistry::new();
        let item = ReportItem::from_value(json!({"type": "table", "data": {}}));
        let report = d.dispatch(&[item], &mut surfaces);

        assert_eq!(
            report.skipped[0].reason,
            SkipReason::UnknownType {
                kind: "table".to_string()
            }
        );
        assert!(log.at_least(LogLevel::Debug).iter().all(|r| !r.message.contains("table")));
    }

    #[test]
    fn test_invalid_items_warn_and_continue() {
        let (d, log) = dispatcher();
        let mut surfaces = registry(&["c"]);
        let items = vec![
            ReportItem::from_value(json!({"type": "chart", "data": {"id": "c"}})),
            ReportItem::from_value(json!(42)),
            ReportItem::chart("c", BAR),
        ];

        let report = d.dispatch(&items, &mut surfaces);

        assert_eq!(report.skipped_indices(), vec![0, 1]);
        assert_eq!(log.at_least(LogLevel::Warn).len(), 2);
        assert!(report.is_rendered("c"));
    }

    #[test]
    fn test_render_fault_is_isolated() {
        let (d, log) = dispatcher();
        let mut surfaces = registry(&["huge", "ok"]);
        let huge_pie = r#"{"title":"H","type":"pie",
            "series":[{"name":"S","labels":["a","b"],"data":[1.7e308,1.7e308]}]}"#;
        let items = vec![ReportItem::chart("huge", huge_pie), ReportItem::chart("ok", BAR)];

        let report = d.dispatch(&items, &mut surfaces);

        assert!(matches!(report.skipped[0].reason, SkipReason::RenderFailed { .. }));
        assert!(log.contains(LogLevel::Error, "render failed"));
        assert!(report.is_rendered("ok"));
    }

    #[test]
    fn test_all_zero_pie_is_rendered() {
        let (d, log) = dispatcher();
        let mut surfaces = registry(&["zero"]);
        let zero_pie = r#"{"title":"Z","type":"pie","series":[{"name":"S","labels":["a"],"data":[0]}]}"#;

        let report = d.dispatch(&[ReportItem::chart("zero", zero_pie)], &mut surfaces);

        assert!(report.is_rendered("zero"));
        assert!(report.skipped.is_empty());
        assert!(log.at_least(LogLevel::Warn).is_empty());
        assert!(!surfaces.get("zero").unwrap().is_empty());
    }

    #[test]
    fn test_misaligned_series_warns() {
        let (d, log) = dispatcher();
        let mut surfaces = registry(&["m"]);
        let data = r#"{"title":"M","type":"bar","series":[{"name":"S","labels":["a"],"data":[1,2]}]}"#;
        let report = d.dispatch(&[ReportItem::chart("m", data)], &mut surfaces);

        assert!(report.is_rendered("m"));
        assert!(log.contains(LogLevel::Warn, "1 labels for 2 values"));
    }

    #[test]
    fn test_redispatch_reproduces_surfaces() {
        let (d, _) = dispatcher();
        let mut surfaces = registry(&["a"]);
        let items = vec![ReportItem::chart("a", BAR)];

        d.dispatch(&items, &mut surfaces);
        let first = surfaces.get("a").unwrap().to_svg();
        d.dispatch(&items, &mut surfaces);

        assert_eq!(surfaces.get("a").unwrap().to_svg(), first);
        assert_eq!(surfaces.get("a").unwrap().draw_count(), 2);
    }

    #[test]
    fn test_skip_reason_serializes_flat() {
        let skipped = SkippedItem {
            index: 3,
            reason: SkipReason::MissingSurface { id: "x".to_string() },
        };
        assert_eq!(
            serde_json::to_value(&skipped).unwrap(),
            json!({"index": 3, "reason": "missing_surface", "id": "x"})
        );
    }
}
