//! Result matrix: the row/metadata structure returned by an aggregate query

use pulse_dash_shared::{DashError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MetaItem {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MetaData {
    /// Axis name ("dx", "ou", "pe") -> ordered item ids
    #[serde(default)]
    pub dimensions: HashMap<String, Vec<String>>,
    /// Item id -> display metadata
    #[serde(default)]
    pub items: HashMap<String, MetaItem>,
}

/// Raw aggregate analytics response. Each row is a tuple of dimension keys
/// followed by the value as a string.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalyticsResponse {
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
    #[serde(rename = "metaData", default)]
    pub meta_data: MetaData,
}

/// Axis-aware lookup over an [`AnalyticsResponse`].
///
/// Rows are sparse: a (dx, axis-value) combination absent from the rows
/// means "no data" and every lookup treats it as numeric zero, never as an
/// error. The matrix is replaced wholesale on every successful query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultMatrix {
    response: AnalyticsResponse,
}

impl ResultMatrix {
    pub fn new(response: AnalyticsResponse) -> Self {
        Self { response }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.response.rows
    }

    /// Ordered item ids of one metadata axis; empty when the axis is absent
    pub fn axis(&self, name: &str) -> &[String] {
        self.response
            .meta_data
            .dimensions
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Display name of a metadata item. The backend promises an entry for
    /// every id it emits in `dimensions`; a miss means the response is
    /// incomplete and surfaces as an explicit error.
    pub fn item_name(&self, id: &str) -> Result<&str> {
        self.response
            .meta_data
            .items
            .get(id)
            .map(|item| item.name.as_str())
            .ok_or_else(|| DashError::MissingMetadata { id: id.to_string() })
    }

    /// Value of the row matching `(dx, axis_id)` on the first two columns,
    /// or 0.0 when no such row exists.
    pub fn value(&self, dx: &str, axis_id: &str) -> f64 {
        self.response
            .rows
            .iter()
            .find(|row| {
                row.first().map(String::as_str) == Some(dx)
                    && row.get(1).map(String::as_str) == Some(axis_id)
            })
            .and_then(|row| row.get(2))
            .and_then(|value| value.parse().ok())
            .unwrap_or(0.0)
    }

    /// Value of the first row whose leading column equals `dx`, read from
    /// column 1. Used by the filter-only shapes (pie slices, text values)
    /// where rows are `[dx, value]`.
    pub fn dx_value(&self, dx: &str) -> Option<f64> {
        self.response
            .rows
            .iter()
            .find(|row| row.first().map(String::as_str) == Some(dx))
            .and_then(|row| row.get(1))
            .and_then(|value| value.parse().ok())
    }
}
