//! Dimension items and the per-visualization query configuration

use serde::{Deserialize, Serialize};

/// Top-level visualization kind. `Chart` dispatches further on [`ChartType`];
/// `Multiple` is the dual-axis combination chart and `TextValues` the
/// big-number / gauge panel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    Chart,
    Multiple,
    TextValues,
}

/// Chart types handled by the `Chart` kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Column,
    Pie,
    Line,
    Spline,
    Map,
}

/// Styling hints carried through to the text-value display records.
/// These are opaque to the engine and passed to the renderer verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TextStyle {
    pub show_info: bool,
    pub stroke_width: Option<f64>,
    pub text_color: Option<String>,
    pub trail_color: Option<String>,
    pub stroke_color: Option<String>,
    pub other_text: Option<String>,
    pub class_name: Option<String>,
    pub label_class_name: Option<String>,
    /// Gauge widget kind for text-value tiles ("line", "circle", ...)
    pub gauge: Option<String>,
}

/// One data/indicator dimension item: a single metric/series.
///
/// `child` allows one level of nested sub-metric and is consumed only by the
/// text-value kind; its dx id still contributes a data dimension to the
/// analytics request, flattened immediately after its parent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DimensionItem {
    pub dx: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Per-series chart type for the multi-axis kind ("column", "spline", ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child: Option<Box<DimensionItem>>,
    #[serde(default)]
    pub style: TextStyle,
}

impl DimensionItem {
    pub fn new(dx: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            dx: dx.into(),
            label: label.into(),
            color: None,
            series_type: None,
            y_axis: None,
            line_width: None,
            child: None,
            style: TextStyle::default(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_child(mut self, child: DimensionItem) -> Self {
        self.child = Some(Box::new(child));
        self
    }
}

/// Query configuration for one visualization.
///
/// When `filter_by_org_units` is true the org units are placed as a query
/// filter (values fixed, not broken out); when false they become a query
/// dimension. The same independent rule applies to periods.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueryConfig {
    pub dx: Vec<DimensionItem>,
    pub periods: Vec<String>,
    pub org_units: Vec<String>,
    pub filter_by_org_units: bool,
    pub filter_by_periods: bool,
    pub org_unit_groups: Vec<String>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            dx: Vec::new(),
            periods: Vec::new(),
            org_units: Vec::new(),
            filter_by_org_units: true,
            filter_by_periods: true,
            org_unit_groups: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_filters_both_axes() {
        let config = QueryConfig::default();
        assert!(config.filter_by_org_units);
        assert!(config.filter_by_periods);
        assert!(config.dx.is_empty());
    }

    #[test]
    fn test_dimension_item_roundtrip() {
        let item = DimensionItem::new("ind1", "Confirmed")
            .with_color("#ff0000")
            .with_child(DimensionItem::new("ind1sub", "Cumulative"));

        let json = serde_json::to_string(&item).unwrap();
        let back: DimensionItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
        assert_eq!(back.child.unwrap().dx, "ind1sub");
    }
}
