//! Chart specifications consumed by the rendering layer
//!
//! A `ChartSpec` is always a derived value: it is recomputed from the query
//! configuration and the current result matrix on every dependency change
//! and never persisted.

use crate::dimensions::{ChartType, TextStyle};
use crate::geo::FeatureCollection;
use serde::{Deserialize, Serialize};

/// Frame shared by every chart variant: widget title/subtitle, pixel
/// dimensions and background styling.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartFrame {
    pub title: String,
    pub subtitle: String,
    pub width: u32,
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

/// One numeric series of a category chart
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategorySeries {
    pub name: String,
    pub data: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Column, line and spline charts: one category axis, one series per dx
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryChart {
    #[serde(flatten)]
    pub frame: ChartFrame,
    pub chart_type: ChartType,
    pub categories: Vec<String>,
    pub series: Vec<CategorySeries>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PieSlice {
    pub name: String,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PieChart {
    #[serde(flatten)]
    pub frame: ChartFrame,
    pub series_name: String,
    pub slices: Vec<PieSlice>,
}

/// One `[orgUnitId, value]` pair, joined against the feature collection by id
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapDatum(pub String, pub f64);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MapChart {
    #[serde(flatten)]
    pub frame: ChartFrame,
    pub features: FeatureCollection,
    pub series: Vec<MapDatum>,
    pub keys: Vec<String>,
    pub join_by: String,
}

/// One series of the multi-axis chart; carries its own render type and
/// optional axis/colour/width taken from the dx item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MultiAxisSeries {
    pub name: String,
    pub data: Vec<f64>,
    #[serde(rename = "type")]
    pub series_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct YAxisSpec {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub opposite: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MultiAxisChart {
    #[serde(flatten)]
    pub frame: ChartFrame,
    pub categories: Vec<String>,
    pub series: Vec<MultiAxisSeries>,
    pub y_axes: Vec<YAxisSpec>,
}

/// Nested sub-metric of a text-value tile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TextValueChild {
    pub label: String,
    pub value: String,
    #[serde(default)]
    pub style: TextStyle,
}

/// One text-value tile: a formatted number with its label and styling hints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TextValue {
    pub dx: String,
    pub label: String,
    pub value: String,
    #[serde(default)]
    pub style: TextStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child: Option<TextValueChild>,
}

/// Ordered mapping dx id -> display record; order equals configured dx order
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TextValueSet {
    pub values: Vec<TextValue>,
}

impl TextValueSet {
    pub fn get(&self, dx: &str) -> Option<&TextValue> {
        self.values.iter().find(|v| v.dx == dx)
    }
}

/// Tagged chart specification, one variant per chart kind/type shape.
/// `Pending` is the "not yet loaded" state, not an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ChartSpec {
    Pending,
    Category(CategoryChart),
    Pie(PieChart),
    Map(MapChart),
    MultiAxis(MultiAxisChart),
    TextValues(TextValueSet),
}
