//! Organisation-unit-group expansion

use crate::api::ApiClient;
use log::debug;
use pulse_dash_shared::Result;

/// Resolves group ids into the concrete member organisation-unit ids,
/// flattened in group order. Duplicates across groups are kept: a unit in
/// two groups appears twice, matching the flattening semantics the
/// analytics backend expects.
pub async fn expand_org_unit_groups(
    api: &dyn ApiClient,
    groups: &[String],
) -> Result<Vec<String>> {
    let members = api.org_unit_group_members(groups).await?;
    let units: Vec<String> = members.into_iter().flatten().collect();
    debug!("expanded {} groups into {} units", groups.len(), units.len());
    Ok(units)
}
