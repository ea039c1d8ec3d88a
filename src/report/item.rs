//! Report items
//!
//! The wire list is decoded one item at a time so a single malformed entry
//! never fails the whole response. Each entry becomes a [`ReportItem`]:
//! a recognized payload, an unknown type, or an invalid item carrying the
//! reason it failed validation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Body returned by the reports data source
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportsResponse {
    #[serde(default)]
    pub items: Vec<Value>,
}

impl ReportsResponse {
    /// Validate every wire item, preserving list order
    pub fn into_items(self) -> Vec<ReportItem> {
        self.items.into_iter().map(ReportItem::from_value).collect()
    }
}

/// Wire shape of one item: a type tag plus an untyped payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawReportItem {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Value,
}

/// Chart item payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPayload {
    /// Surface key, unique per render pass
    pub id: String,
    /// Serialized chart spec
    pub chart_data: String,
}

/// HTML item payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HtmlPayload {
    /// Untrusted markup
    pub html_content: String,
}

/// A validated report item
#[derive(Debug, Clone, PartialEq)]
pub enum ReportItem {
    Chart(ChartPayload),
    Html(HtmlPayload),
    /// Tag not handled by this pipeline
    Unknown { kind: String },
    /// Failed validation at the parse boundary
    Invalid {
        kind: Option<String>,
        error: ItemError,
    },
}

/// Why a wire item was rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ItemError {
    #[error("item is not an object with a string \"type\": {0}")]
    Malformed(String),

    #[error("invalid {kind} payload: {message}")]
    Payload { kind: String, message: String },

    #[error("chart item has an empty id")]
    EmptyChartId,
}

pub const CHART_TYPE: &str = "chart";
pub const HTML_TYPE: &str = "html";

impl ReportItem {
    /// Validate one wire item
    pub fn from_value(value: Value) -> Self {
        match serde_json::from_value::<RawReportItem>(value) {
            Ok(raw) => Self::from_raw(raw),
            Err(e) => ReportItem::Invalid {
                kind: None,
                error: ItemError::Malformed(e.to_string()),
            },
        }
    }

    pub fn from_raw(raw: RawReportItem) -> Self {
        match raw.kind.as_str() {
            CHART_TYPE => match decode_payload::<ChartPayload>(&raw) {
                Ok(payload) if payload.id.is_empty() => ReportItem::Invalid {
                    kind: Some(raw.kind),
                    error: ItemError::EmptyChartId,
                },
                Ok(payload) => ReportItem::Chart(payload),
                Err(error) => ReportItem::Invalid {
                    kind: Some(raw.kind),
                    error,
                },
            },
            HTML_TYPE => match decode_payload::<HtmlPayload>(&raw) {
                Ok(payload) => ReportItem::Html(payload),
                Err(error) => ReportItem::Invalid {
                    kind: Some(raw.kind),
                    error,
                },
            },
            _ => ReportItem::Unknown { kind: raw.kind },
        }
    }

    /// Convenience constructor for a chart item
    pub fn chart(id: impl Into<String>, chart_data: impl Into<String>) -> Self {
        ReportItem::Chart(ChartPayload {
            id: id.into(),
            chart_data: chart_data.into(),
        })
    }

    /// Convenience constructor for an HTML item
    pub fn html(html_content: impl Into<String>) -> Self {
        ReportItem::Html(HtmlPayload {
            html_content: html_content.into(),
        })
    }

    /// The item's type tag, if one was present
    pub fn kind(&self) -> Option<&str> {
        match self {
            ReportItem::Chart(_) => Some(CHART_TYPE),
            ReportItem::Html(_) => Some(HTML_TYPE),
            ReportItem::Unknown { kind } => Some(kind),
            ReportItem::Invalid { kind, .. } => kind.as_deref(),
        }
    }

    /// Chart id for chart items
    pub fn chart_id(&self) -> Option<&str> {
        match self {
            ReportItem::Chart(payload) => Some(&payload.id),
            _ => None,
        }
    }
}

fn decode_payload<T: serde::de::DeserializeOwned>(raw: &RawReportItem) -> Result<T, ItemError> {
    serde_json::from_value(raw.data.clone()).map_err(|e| ItemError::Payload {
        kind: raw.kind.clone(),
        message: e.to_string(),
    })
}

/// Compact description of an item for snapshots
#[derive(Debug, Clone, Serialize)]
pub struct ItemSummary {
    pub index: usize,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub valid: bool,
}

impl ItemSummary {
    pub fn of(index: usize, item: &ReportItem) -> Self {
        Self {
            index,
            kind: item.kind().map(str::to_string),
            id: item.chart_id().map(str::to_string),
            valid: !matches!(item, ReportItem::Invalid { .. }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chart_item() {
        let item = ReportItem::from_value(json!({
            "type": "chart",
            "data": {"id": "sales", "chart_data": "{}"}
        }));
        assert_eq!(item, ReportItem::chart("sales", "{}"));
        assert_eq!(item.chart_id(), Some("sales"));
    }

    #[test]
    fn test_html_item() {
        let item = ReportItem::from_value(json!({
            "type": "html",
            "data": {"html_content": "<p>hi</p>"}
        }));
        assert_eq!(item, ReportItem::html("<p>hi</p>"));
        assert_eq!(item.kind(), Some("html"));
    }

    #[test]
    fn test_unknown_type_is_not_invalid() {
        let item = ReportItem::from_value(json!({"type": "table", "data": {"rows": []}}));
        assert_eq!(
            item,
            ReportItem::Unknown {
                kind: "table".to_string()
            }
        );
    }

    #[test]
    fn test_chart_missing_chart_data_is_invalid() {
        let item = ReportItem::from_value(json!({"type": "chart", "data": {"id": "x"}}));
        match item {
            ReportItem::Invalid { kind, error } => {
                assert_eq!(kind.as_deref(), Some("chart"));
                assert!(matches!(error, ItemError::Payload { .. }));
            }
            other => panic!("expected invalid item, got {:?}", other),
        }
    }

    #[test]
    fn test_chart_empty_id_is_invalid() {
        let item = ReportItem::from_value(json!({
            "type": "chart",
            "data": {"id": "", "chart_data": "{}"}
        }));
        assert!(matches!(
            item,
            ReportItem::Invalid {
                error: ItemError::EmptyChartId,
                ..
            }
        ));
    }

    #[test]
    fn test_non_object_item_is_malformed() {
        let item = ReportItem::from_value(json!(42));
        assert!(matches!(
            item,
            ReportItem::Invalid {
                kind: None,
                error: ItemError::Malformed(_)
            }
        ));
    }

    #[test]
    fn test_response_keeps_order_and_bad_items() {
        let response: ReportsResponse = serde_json::from_value(json!({
            "items": [
                {"type": "html", "data": {"html_content": "a"}},
                "garbage",
                {"type": "chart", "data": {"id": "c1", "chart_data": "{}"}}
            ]
        }))
        .unwrap();

        let items = response.into_items();
        assert_eq!(items.len(), 3);
        assert!(matches!(items[0], ReportItem::Html(_)));
        assert!(matches!(items[1], ReportItem::Invalid { .. }));
        assert!(matches!(items[2], ReportItem::Chart(_)));
    }

    #[test]
    fn test_summary() {
        let summary = ItemSummary::of(3, &ReportItem::chart("c", "{}"));
        assert_eq!(summary.index, 3);
        assert_eq!(summary.kind.as_deref(), Some("chart"));
        assert_eq!(summary.id.as_deref(), Some("c"));
        assert!(summary.valid);
    }
}
