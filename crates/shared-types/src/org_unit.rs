//! Organisation-unit nodes and the tree-view projection

use serde::{Deserialize, Serialize};

/// One node of the organisation-unit hierarchy.
///
/// Nodes are created by the tree loader on successful fetch and never
/// mutated afterwards. `parent_id` is set only when the node was fetched as
/// a child; root nodes carry `None`. Child fetches return a reduced field
/// set, so `level` and `display_name` may be absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrgUnit {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(default)]
    pub leaf: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub has_children: bool,
}

/// Flat projection of an [`OrgUnit`] for a tree-selection UI.
/// Root nodes carry an empty `parent_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub id: String,
    pub parent_id: String,
    pub value: String,
    pub label: String,
    pub is_leaf: bool,
}

impl From<&OrgUnit> for TreeNode {
    fn from(unit: &OrgUnit) -> Self {
        Self {
            id: unit.id.clone(),
            parent_id: unit.parent_id.clone().unwrap_or_default(),
            value: unit.id.clone(),
            label: unit.name.clone(),
            is_leaf: unit.leaf,
        }
    }
}
