//! Analytics request descriptor built from a query configuration

use pulse_dash_shared::QueryConfig;
use serde::{Deserialize, Serialize};

/// Placement of one query axis: fixed to specific values (filter) or broken
/// out per series/category (dimension).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum Placement {
    Filter(Vec<String>),
    Dimension(Vec<String>),
}

impl Placement {
    fn query_pair(&self, axis: &str) -> (String, String) {
        match self {
            Placement::Filter(ids) => ("filter".to_string(), format!("{axis}:{}", ids.join(";"))),
            Placement::Dimension(ids) => {
                ("dimension".to_string(), format!("{axis}:{}", ids.join(";")))
            }
        }
    }
}

/// Description of one aggregate analytics query.
///
/// Rounding is always disabled: raw values are requested and formatted by
/// the chart builder, never pre-rounded by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsRequest {
    pub data: Vec<String>,
    pub org_units: Placement,
    pub periods: Placement,
    pub skip_rounding: bool,
}

impl AnalyticsRequest {
    /// Builds the request from the configuration, or `None` when the
    /// preconditions are unmet (empty dx, periods or org units). A `None`
    /// means no query is issued and the prior matrix stays untouched.
    ///
    /// The data dimension flattens every dx id including nested child ids,
    /// order-preserving, each child immediately following its parent.
    pub fn build(config: &QueryConfig) -> Option<Self> {
        if config.dx.is_empty() || config.periods.is_empty() || config.org_units.is_empty() {
            return None;
        }

        let mut data = Vec::with_capacity(config.dx.len());
        for item in &config.dx {
            data.push(item.dx.clone());
            if let Some(child) = &item.child {
                data.push(child.dx.clone());
            }
        }

        let org_units = if config.filter_by_org_units {
            Placement::Filter(config.org_units.clone())
        } else {
            Placement::Dimension(config.org_units.clone())
        };
        let periods = if config.filter_by_periods {
            Placement::Filter(config.periods.clone())
        } else {
            Placement::Dimension(config.periods.clone())
        };

        Some(Self {
            data,
            org_units,
            periods,
            skip_rounding: true,
        })
    }

    /// Query-string pairs in the shape the analytics endpoint expects
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![(
            "dimension".to_string(),
            format!("dx:{}", self.data.join(";")),
        )];
        pairs.push(self.org_units.query_pair("ou"));
        pairs.push(self.periods.query_pair("pe"));
        pairs.push(("skipRounding".to_string(), self.skip_rounding.to_string()));
        pairs
    }
}
