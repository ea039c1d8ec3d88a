//! Report Sources
//!
//! Where report items come from:
//!
//! - **http**: the upstream reports API, fetched with `reqwest`
//! - **file**: a JSON file on disk with the same `{ "items": [...] }` shape
//!
//! Both implement [`ReportSource`]; the reports view only sees the trait.

pub mod file;
pub mod http;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::config::SourceConfig;
use crate::report::ReportsResponse;

pub use file::FileReportSource;
pub use http::HttpReportSource;

/// A single read of the current report items
#[async_trait]
pub trait ReportSource: Send + Sync {
    async fn fetch_reports(&self) -> Result<ReportsResponse, SourceError>;

    /// Human-readable origin, for logs
    fn describe(&self) -> String;
}

/// Shared handle to a report source
pub type SharedSource = Arc<dyn ReportSource>;

/// Build the configured source: the file when one is set, else HTTP
pub fn from_config(config: &SourceConfig) -> Result<SharedSource, SourceError> {
    match &config.file {
        Some(path) => Ok(Arc::new(FileReportSource::new(path))),
        None => Ok(Arc::new(HttpReportSource::new(config)?)),
    }
}

/// Errors fetching report items
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Report source unavailable")]
    Unavailable,

    #[error("Request timeout")]
    Timeout,

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Upstream returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid reports body: {0}")]
    Decode(String),

    #[error("IO error reading {path}: {error}")]
    Io { path: String, error: String },
}
