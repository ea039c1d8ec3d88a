//! Chart specification
//!
//! Parsed form of a chart item's `chart_data`. The upstream API wraps the
//! spec in a `{"chart": {...}}` envelope; a bare spec is accepted too.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Which chart to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
}

/// One data value: a plain number or a named value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    Number(f64),
    Named { name: String, value: f64 },
}

impl DataValue {
    pub fn value(&self) -> f64 {
        match self {
            DataValue::Number(v) => *v,
            DataValue::Named { value, .. } => *value,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            DataValue::Number(_) => None,
            DataValue::Named { name, .. } => Some(name),
        }
    }
}

impl From<f64> for DataValue {
    fn from(v: f64) -> Self {
        DataValue::Number(v)
    }
}

/// A named data series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    /// Category labels; pie feeds with named values may omit them
    #[serde(default)]
    pub labels: Vec<String>,
    pub data: Vec<DataValue>,
}

impl Series {
    pub fn new(name: impl Into<String>, labels: &[&str], data: &[f64]) -> Self {
        Self {
            name: name.into(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            data: data.iter().copied().map(DataValue::from).collect(),
        }
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().map(DataValue::value)
    }

    /// Largest value, if any
    pub fn max_value(&self) -> Option<f64> {
        self.values().fold(None, |acc, v| match acc {
            Some(m) if m >= v => Some(m),
            _ => Some(v),
        })
    }

    /// Labels and data have the same length
    pub fn is_aligned(&self) -> bool {
        self.labels.len() == self.data.len()
    }

    /// Display name of the point at `index`: its own name, else its label
    pub fn point_name(&self, index: usize) -> Option<&str> {
        self.data
            .get(index)
            .and_then(DataValue::name)
            .or_else(|| self.labels.get(index).map(String::as_str))
    }
}

/// Optional vertical scale override
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YScale {
    #[serde(default)]
    pub maximum: Option<f64>,
}

/// Parsed chart specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,

    #[serde(rename = "type")]
    pub kind: ChartKind,

    /// At least one; only the first is drawn
    pub series: Vec<Series>,

    #[serde(default)]
    pub colors: Vec<String>,

    #[serde(rename = "yScale", default, skip_serializing_if = "Option::is_none")]
    pub y_scale: Option<YScale>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// Errors parsing `chart_data`
#[derive(Error, Debug)]
pub enum ChartSpecError {
    #[error("chart_data is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),

    #[error("chart_data does not describe a chart: {0}")]
    Shape(#[source] serde_json::Error),

    #[error("chart has no series")]
    NoSeries,
}

impl ChartSpec {
    /// Parse a serialized chart spec, with or without the `chart` envelope
    pub fn from_chart_data(raw: &str) -> Result<Self, ChartSpecError> {
        let value: Value = serde_json::from_str(raw).map_err(ChartSpecError::Json)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, ChartSpecError> {
        let body = match value {
            Value::Object(mut map) if !map.contains_key("series") => match map.remove("chart") {
                Some(inner) => inner,
                None => Value::Object(map),
            },
            other => other,
        };

        let spec: ChartSpec = serde_json::from_value(body).map_err(ChartSpecError::Shape)?;
        if spec.series.is_empty() {
            return Err(ChartSpecError::NoSeries);
        }
        Ok(spec)
    }

    pub fn primary_series(&self) -> Option<&Series> {
        self.series.first()
    }

    /// Explicit vertical maximum; zero counts as unset
    pub fn y_maximum(&self) -> Option<f64> {
        self.y_scale
            .as_ref()
            .and_then(|s| s.maximum)
            .filter(|m| *m != 0.0 && m.is_finite())
    }

    pub fn color(&self, index: usize) -> Option<&str> {
        self.colors.get(index).map(String::as_str)
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref().filter(|c| !c.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BAR: &str = r##"{
        "title": "Monthly sales",
        "type": "bar",
        "series": [{"name": "Sales", "labels": ["Jan", "Feb"], "data": [5, 10]}],
        "colors": ["#123456"],
        "yScale": {"maximum": 20},
        "caption": "Units sold"
    }"##;

    #[test]
    fn test_parse_bare_spec() {
        let spec = ChartSpec::from_chart_data(BAR).unwrap();
        assert_eq!(spec.kind, ChartKind::Bar);
        assert_eq!(spec.title, "Monthly sales");
        assert_eq!(spec.y_maximum(), Some(20.0));
        assert_eq!(spec.color(0), Some("#123456"));
        assert_eq!(spec.color(1), None);
        assert_eq!(spec.caption(), Some("Units sold"));
        let series = spec.primary_series().unwrap();
        assert_eq!(series.max_value(), Some(10.0));
        assert!(series.is_aligned());
    }

    #[test]
    fn test_envelope_matches_bare() {
        let wrapped = format!(r#"{{"chart": {}}}"#, BAR);
        assert_eq!(
            ChartSpec::from_chart_data(&wrapped).unwrap(),
            ChartSpec::from_chart_data(BAR).unwrap()
        );
    }

    #[test]
    fn test_invalid_json() {
        let err = ChartSpec::from_chart_data("{not json").unwrap_err();
        assert!(matches!(err, ChartSpecError::Json(_)));
    }

    #[test]
    fn test_missing_fields() {
        let err = ChartSpec::from_chart_data(r#"{"title": "x", "type": "bar"}"#).unwrap_err();
        assert!(matches!(err, ChartSpecError::Shape(_)));
    }

    #[test]
    fn test_unknown_chart_type() {
        let err = ChartSpec::from_chart_data(
            r#"{"title": "x", "type": "radar", "series": [{"name": "s", "data": [1]}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ChartSpecError::Shape(_)));
    }

    #[test]
    fn test_empty_series() {
        let err =
            ChartSpec::from_chart_data(r#"{"title": "x", "type": "line", "series": []}"#).unwrap_err();
        assert!(matches!(err, ChartSpecError::NoSeries));
    }

    #[test]
    fn test_zero_maximum_is_unset() {
        let spec = ChartSpec::from_chart_data(
            r#"{"title": "x", "type": "bar", "yScale": {"maximum": 0},
                "series": [{"name": "s", "labels": ["a"], "data": [3]}]}"#,
        )
        .unwrap();
        assert_eq!(spec.y_maximum(), None);
    }

    #[test]
    fn test_named_pie_values() {
        let spec = ChartSpec::from_chart_data(
            r#"{"chart": {"title": "Share", "type": "pie",
                "series": [{"name": "Share", "data": [{"name": "A", "value": 60}, {"name": "B", "value": 40}]}]}}"#,
        )
        .unwrap();
        let series = spec.primary_series().unwrap();
        assert_eq!(series.point_name(0), Some("A"));
        assert_eq!(series.values().collect::<Vec<_>>(), vec![60.0, 40.0]);
        assert!(series.labels.is_empty());
    }

    #[test]
    fn test_point_name_falls_back_to_label() {
        let series = Series::new("s", &["north", "south"], &[1.0, 2.0]);
        assert_eq!(series.point_name(1), Some("south"));
        assert_eq!(series.point_name(2), None);
    }

    #[test]
    fn test_misaligned_series_still_parses() {
        let spec = ChartSpec::from_chart_data(
            r#"{"title": "x", "type": "bar",
                "series": [{"name": "s", "labels": ["a"], "data": [1, 2, 3]}]}"#,
        )
        .unwrap();
        assert!(!spec.primary_series().unwrap().is_aligned());
    }
}
