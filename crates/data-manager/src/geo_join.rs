//! Geo join for map charts

use crate::api::ApiClient;
use log::debug;
use pulse_dash_shared::{Feature, FeatureCollection, FeatureProperties, Result};

/// Outcome of a geo join: the drawable feature collection plus the full
/// child id list for the query's org-unit axis.
///
/// `child_ids` keeps every child, point geometry or not, so downstream
/// value lookups can resolve children that are not drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoJoin {
    pub collection: FeatureCollection,
    pub child_ids: Vec<String>,
}

/// Fetches the direct children of `parent` and builds the GeoJSON feature
/// collection. Children with absent or point geometry are dropped from the
/// collection; the remainder keep their geometry verbatim under
/// `properties = {id, name}`.
pub async fn fetch_geo_join(api: &dyn ApiClient, parent: &str) -> Result<GeoJoin> {
    let children = api.org_unit_children_with_geometry(parent).await?;
    let child_ids: Vec<String> = children.iter().map(|child| child.id.clone()).collect();

    let features: Vec<Feature> = children
        .into_iter()
        .filter_map(|child| {
            let geometry = child.geometry?;
            if geometry.is_point() {
                return None;
            }
            Some(Feature::new(
                FeatureProperties {
                    id: child.id,
                    name: child.name,
                },
                geometry,
            ))
        })
        .collect();

    debug!(
        "geo join for {parent}: {} children, {} drawable",
        child_ids.len(),
        features.len()
    );
    Ok(GeoJoin {
        collection: FeatureCollection::new(features),
        child_ids,
    })
}
