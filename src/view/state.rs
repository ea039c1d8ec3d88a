//! View state and its snapshots

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::dispatch::{DispatchReport, Dispatcher, SanitizedBlock, SkippedItem};
use crate::render::SurfaceRegistry;
use crate::report::{ItemSummary, ReportItem};

/// Everything the reports view owns
#[derive(Debug)]
pub struct ViewState {
    pub items: Vec<ReportItem>,
    pub loading: bool,
    pub error: Option<String>,
    pub surfaces: SurfaceRegistry,
    pub last_report: DispatchReport,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl Default for ViewState {
    /// A view starts out loading, before its first fetch resolves
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: true,
            error: None,
            surfaces: SurfaceRegistry::new(),
            last_report: DispatchReport::default(),
            fetched_at: None,
        }
    }
}

impl ViewState {
    /// Replace the item list and draw it.
    ///
    /// Surfaces for ids no longer present are dropped, one surface exists
    /// per distinct chart id before dispatch, and surviving surfaces are
    /// reused.
    pub fn apply_items(&mut self, items: Vec<ReportItem>, dispatcher: &Dispatcher) {
        let ids: HashSet<&str> = items.iter().filter_map(ReportItem::chart_id).collect();
        self.surfaces.retain_ids(&ids);
        for id in &ids {
            self.surfaces.ensure(id);
        }

        self.last_report = dispatcher.dispatch(&items, &mut self.surfaces);
        self.items = items;
        self.loading = false;
        self.error = None;
    }

    /// Enter the failed state: message shown, nothing else
    pub fn fail(&mut self, message: &str) {
        self.items.clear();
        self.surfaces.remove_all();
        self.last_report = DispatchReport::default();
        self.loading = false;
        self.error = Some(message.to_string());
    }

    /// Draw the current items again into the existing surfaces
    pub fn redraw(&mut self, dispatcher: &Dispatcher) {
        self.last_report = dispatcher.dispatch(&self.items, &mut self.surfaces);
    }

    /// SVG text of a drawn surface
    pub fn chart_svg(&self, id: &str) -> Option<String> {
        self.surfaces
            .get(id)
            .filter(|s| !s.is_empty())
            .map(|s| s.to_svg())
    }

    /// SVG text of every drawn surface, keyed by id
    pub fn charts(&self) -> BTreeMap<String, String> {
        self.surfaces
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| (s.id().to_string(), s.to_svg()))
            .collect()
    }

    pub fn snapshot(&self, generation: u64) -> ViewSnapshot {
        ViewSnapshot {
            loading: self.loading,
            error: self.error.clone(),
            items: self
                .items
                .iter()
                .enumerate()
                .map(|(i, item)| ItemSummary::of(i, item))
                .collect(),
            charts: self.charts(),
            html: self.last_report.html.clone(),
            skipped: self.last_report.skipped.clone(),
            fetched_at: self.fetched_at,
            generation,
        }
    }
}

/// Serializable copy of the view
#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    pub loading: bool,
    pub error: Option<String>,
    pub items: Vec<ItemSummary>,
    pub charts: BTreeMap<String, String>,
    pub html: Vec<SanitizedBlock>,
    pub skipped: Vec<SkippedItem>,
    pub fetched_at: Option<DateTime<Utc>>,
    pub generation: u64,
}
