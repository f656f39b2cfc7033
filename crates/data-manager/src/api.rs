//! Service boundary consumed by the engine
//!
//! Everything the engine needs from the backend goes through this trait:
//! the analytics query service, the organisation-unit listing service and
//! the organisation-unit-group listing service. [`crate::HttpApi`] is the
//! production implementation; tests substitute fakes.

use crate::matrix::AnalyticsResponse;
use crate::request::AnalyticsRequest;
use async_trait::async_trait;
use pulse_dash_shared::{Geometry, OrgUnit, Result};

/// Direct child of an organisation unit, fetched with its geometry for the
/// map-chart join. Geometry is absent for units the backend has no
/// coordinates for.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoChild {
    pub id: String,
    pub name: String,
    pub geometry: Option<Geometry>,
}

#[async_trait]
pub trait ApiClient: Send + Sync {
    /// The current user's assigned organisation units (tree roots)
    async fn user_org_units(&self) -> Result<Vec<OrgUnit>>;

    /// Direct children of `parent`, reduced field set (id, name, path, leaf)
    async fn org_unit_children(&self, parent: &str) -> Result<Vec<OrgUnit>>;

    /// Direct children of `parent` with geometry
    async fn org_unit_children_with_geometry(&self, parent: &str) -> Result<Vec<GeoChild>>;

    /// Member organisation-unit ids, one list per requested group, in
    /// request order
    async fn org_unit_group_members(&self, groups: &[String]) -> Result<Vec<Vec<String>>>;

    /// Aggregate analytics query
    async fn analytics(&self, request: &AnalyticsRequest) -> Result<AnalyticsResponse>;
}
