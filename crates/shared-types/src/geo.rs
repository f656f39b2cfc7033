//! GeoJSON fragments used by the map chart join

use serde::{Deserialize, Serialize};

/// Raw geometry as returned by the organisation-unit listing service.
/// Coordinates are copied verbatim; the engine never interprets them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: serde_json::Value,
}

impl Geometry {
    /// Map charts only render polygon/area geometry; point geometry is dropped.
    pub fn is_point(&self) -> bool {
        self.kind == "Point"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureProperties {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: FeatureProperties,
    pub geometry: Geometry,
}

impl Feature {
    pub fn new(properties: FeatureProperties, geometry: Geometry) -> Self {
        Self {
            kind: "Feature".to_string(),
            properties,
            geometry,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            features,
        }
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
