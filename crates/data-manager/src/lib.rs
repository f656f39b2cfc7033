//! Data manager for the Pulse Dash analytics engine
//!
//! Owns the service boundary (analytics queries, organisation-unit and
//! group listings) and the structures derived from it: the result matrix,
//! the analytics request descriptor, group expansion and the geo join for
//! map charts.

pub mod api;
pub mod client;
pub mod geo_join;
pub mod groups;
pub mod matrix;
pub mod request;

pub use api::{ApiClient, GeoChild};
pub use client::HttpApi;
pub use geo_join::{fetch_geo_join, GeoJoin};
pub use groups::expand_org_unit_groups;
pub use matrix::{AnalyticsResponse, MetaData, MetaItem, ResultMatrix};
pub use request::{AnalyticsRequest, Placement};
