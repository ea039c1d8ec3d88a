//! Reports View
//!
//! Owns the item list, the loading/error flags and every chart surface.
//! A refresh fetches from the [`ReportSource`], validates the items, makes
//! sure a surface exists per chart id, and dispatches.
//!
//! - **state**: [`ViewState`] and its serializable [`ViewSnapshot`]
//! - **page**: standalone HTML rendering of a state
//!
//! # Overlapping refreshes
//!
//! Each refresh takes a generation number. A result is applied only while
//! its generation is still the newest; older results are dropped.
//!
//! Nothing is written to the state until the fetch resolves, so a refresh
//! whose future is dropped mid-fetch leaves the view as it was. `loading`
//! is true only until the first result lands.

pub mod page;
pub mod state;

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::dispatch::{DispatchReport, Dispatcher};
use crate::logging::SharedLog;
use crate::report::ReportItem;
use crate::source::{ReportSource, SharedSource, SourceError};

pub use page::{render_body, render_page, PageParts};
pub use state::{ViewSnapshot, ViewState};

/// Message shown when the data source fails
pub const FETCH_ERROR_MESSAGE: &str = "Failed to fetch data";

/// Result of one refresh
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RefreshOutcome {
    Loaded {
        generation: u64,
        items: usize,
        charts: usize,
        skipped: usize,
    },
    /// A newer refresh started before this one finished
    Stale { generation: u64 },
}

impl RefreshOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, RefreshOutcome::Loaded { .. })
    }
}

/// The reports view shared by the HTTP handlers
pub struct ReportsView {
    source: SharedSource,
    dispatcher: Dispatcher,
    log: SharedLog,
    state: RwLock<ViewState>,
    generation: AtomicU64,
}

impl ReportsView {
    pub fn new(source: SharedSource, dispatcher: Dispatcher, log: SharedLog) -> Self {
        Self {
            source,
            dispatcher,
            log,
            state: RwLock::new(ViewState::default()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn source(&self) -> &dyn ReportSource {
        self.source.as_ref()
    }

    /// Generation of the most recently started refresh
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Fetch, validate and draw the current items.
    ///
    /// A source failure is returned after the view has switched to the
    /// fixed error message; a stale failure is dropped like a stale success.
    pub async fn refresh(&self) -> Result<RefreshOutcome, SourceError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.log.debug(&format!(
            "refresh {} started from {}",
            generation,
            self.source.describe()
        ));

        let result = self.source.fetch_reports().await;

        let mut state = self.state.write().await;
        let latest = self.generation.load(Ordering::SeqCst);
        if latest != generation {
            self.log.info(&format!(
                "discarding refresh {}, superseded by {}",
                generation, latest
            ));
            return Ok(RefreshOutcome::Stale { generation });
        }

        match result {
            Ok(response) => {
                let items = response.into_items();
                state.apply_items(items, &self.dispatcher);
                state.fetched_at = Some(Utc::now());

                let outcome = RefreshOutcome::Loaded {
                    generation,
                    items: state.items.len(),
                    charts: state.last_report.rendered.len(),
                    skipped: state.last_report.skipped.len(),
                };
                self.log
                    .info(&format!("refresh {} loaded {} items", generation, state.items.len()));
                Ok(outcome)
            }
            Err(e) => {
                self.log
                    .error(&format!("error fetching report data: {}", e));
                state.fail(FETCH_ERROR_MESSAGE);
                Err(e)
            }
        }
    }

    /// Draw the current items again without fetching
    pub async fn rerender(&self) -> DispatchReport {
        let mut state = self.state.write().await;
        state.redraw(&self.dispatcher);
        state.last_report.clone()
    }

    pub async fn snapshot(&self) -> ViewSnapshot {
        self.state.read().await.snapshot(self.generation())
    }

    pub async fn chart_svg(&self, id: &str) -> Option<String> {
        self.state.read().await.chart_svg(id)
    }

    /// Full HTML page for the current state
    pub async fn page(&self) -> String {
        let state = self.state.read().await;
        render_page(&PageParts::from(&*state))
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }
}

/// Draw `items` into a fresh set of surfaces, outside any view
pub fn render_items(items: Vec<ReportItem>, dispatcher: &Dispatcher) -> ViewState {
    let mut state = ViewState::default();
    state.apply_items(items, dispatcher);
    state
}
