//! Shared types for the Pulse Dash analytics engine
//!
//! This crate contains the data model shared between the data-manager,
//! chart-builder and system-integration crates: dimension items, query
//! configuration, organisation-unit nodes, GeoJSON fragments and the
//! chart specifications consumed by the rendering layer.

pub mod chart_spec;
pub mod dimensions;
pub mod errors;
pub mod geo;
pub mod org_unit;

pub use chart_spec::{
    CategoryChart, CategorySeries, ChartFrame, ChartSpec, MapChart, MapDatum, MultiAxisChart,
    MultiAxisSeries, PieChart, PieSlice, TextValue, TextValueChild, TextValueSet, YAxisSpec,
};
pub use dimensions::{ChartKind, ChartType, DimensionItem, QueryConfig, TextStyle};
pub use errors::{DashError, Result};
pub use geo::{Feature, FeatureCollection, FeatureProperties, Geometry};
pub use org_unit::{OrgUnit, TreeNode};
