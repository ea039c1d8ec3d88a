//! Upstream reports API client

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::{ReportSource, SourceError};
use crate::config::SourceConfig;
use crate::report::ReportsResponse;

/// Fetches `{ "items": [...] }` from the reports endpoint
pub struct HttpReportSource {
    client: Client,
    url: String,
    auth_token: Option<String>,
}

impl HttpReportSource {
    pub fn new(config: &SourceConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            url: config.reports_url(),
            auth_token: config.auth_token.clone().filter(|t| !t.is_empty()),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

fn map_send_error(e: reqwest::Error) -> SourceError {
    if e.is_timeout() {
        SourceError::Timeout
    } else if e.is_connect() {
        SourceError::Unavailable
    } else {
        SourceError::Request(e)
    }
}

#[async_trait]
impl ReportSource for HttpReportSource {
    async fn fetch_reports(&self) -> Result<ReportsResponse, SourceError> {
        let mut request = self.client.get(&self.url);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                message: text,
            });
        }

        let body = response.bytes().await.map_err(map_send_error)?;
        serde_json::from_slice(&body).map_err(|e| SourceError::Decode(e.to_string()))
    }

    fn describe(&self) -> String {
        format!("GET {}", self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::HeaderMap, http::StatusCode, routing::get, Json, Router};
    use serde_json::json;

    async fn spawn_upstream(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn config(url: String) -> SourceConfig {
        SourceConfig {
            url,
            timeout_ms: 2_000,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_fetch_items_with_bearer_token() {
        let router = Router::new().route(
            "/api/reports",
            get(|headers: HeaderMap| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                Json(json!({"items": [
                    {"type": "html", "data": {"html_content": auth}}
                ]}))
            }),
        );
        let mut cfg = config(spawn_upstream(router).await);
        cfg.auth_token = Some("secret".to_string());

        let source = HttpReportSource::new(&cfg).unwrap();
        let response = source.fetch_reports().await.unwrap();

        assert_eq!(response.items.len(), 1);
        assert_eq!(response.items[0]["data"]["html_content"], "Bearer secret");
    }

    #[tokio::test]
    async fn test_error_status() {
        let router = Router::new().route(
            "/api/reports",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let source = HttpReportSource::new(&config(spawn_upstream(router).await)).unwrap();

        match source.fetch_reports().await {
            Err(SourceError::Status { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected: {:?}", other.map(|r| r.items.len())),
        }
    }

    #[tokio::test]
    async fn test_undecodable_body() {
        let router = Router::new().route("/api/reports", get(|| async { "not json" }));
        let source = HttpReportSource::new(&config(spawn_upstream(router).await)).unwrap();
        assert!(matches!(
            source.fetch_reports().await,
            Err(SourceError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_upstream() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source = HttpReportSource::new(&config(format!("http://{}", addr))).unwrap();
        assert!(source.fetch_reports().await.is_err());
    }

    #[test]
    fn test_describe() {
        let source = HttpReportSource::new(&config("http://reports.local/".to_string())).unwrap();
        assert_eq!(source.describe(), "GET http://reports.local/api/reports");
    }
}
