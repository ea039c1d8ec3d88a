//! File-backed report source

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::{ReportSource, SourceError};
use crate::report::ReportsResponse;

/// Reads `{ "items": [...] }` from a JSON file on every fetch
#[derive(Debug, Clone)]
pub struct FileReportSource {
    path: PathBuf,
}

impl FileReportSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ReportSource for FileReportSource {
    async fn fetch_reports(&self) -> Result<ReportsResponse, SourceError> {
        let content = tokio::fs::read(&self.path)
            .await
            .map_err(|e| SourceError::Io {
                path: self.path.display().to_string(),
                error: e.to_string(),
            })?;

        serde_json::from_slice(&content).map_err(|e| SourceError::Decode(e.to_string()))
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_reads_items() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"items":[{{"type":"html","data":{{"html_content":"<p>x</p>"}}}}]}}"#
        )
        .unwrap();

        let source = FileReportSource::new(file.path());
        let response = source.fetch_reports().await.unwrap();
        assert_eq!(response.items.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileReportSource::new(dir.path().join("nope.json"));
        assert!(matches!(
            source.fetch_reports().await,
            Err(SourceError::Io { .. })
        ));
    }

    #[tokio::test]
    async fn test_bad_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[1,2").unwrap();
        let source = FileReportSource::new(file.path());
        assert!(matches!(
            source.fetch_reports().await,
            Err(SourceError::Decode(_))
        ));
    }
}
