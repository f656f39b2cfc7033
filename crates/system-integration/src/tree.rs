//! Lazily loaded organisation-unit hierarchy
//!
//! The tree is a flat, append-only arena of nodes with parent back-links.
//! Roots are loaded once from the current user's assignment; children are
//! fetched on demand when a node is expanded and merged by id, so
//! re-loading the same parent never duplicates nodes.

use log::{debug, info};
use pulse_dash_data::ApiClient;
use pulse_dash_shared::{OrgUnit, Result, TreeNode};
use std::collections::HashSet;

#[derive(Default)]
pub struct OrgUnitTreeLoader {
    units: Vec<OrgUnit>,
    ids: HashSet<String>,
    selected: Option<String>,
}

impl OrgUnitTreeLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the current user's root organisation units. On success the
    /// root set replaces any prior state and the first root becomes the
    /// selection; on failure the error is returned and prior state is left
    /// untouched.
    pub async fn load_roots(&mut self, api: &dyn ApiClient) -> Result<()> {
        let roots = api.user_org_units().await?;
        info!("loaded {} root organisation units", roots.len());

        self.ids = roots.iter().map(|unit| unit.id.clone()).collect();
        self.selected = roots.first().map(|unit| unit.id.clone());
        self.units = roots;
        Ok(())
    }

    /// Fetches the direct children of `parent`, tags them with the parent
    /// id and merges them into the arena. Merging is set-union by id:
    /// already-present nodes are skipped. Returns how many nodes were
    /// actually added.
    pub async fn load_children(&mut self, api: &dyn ApiClient, parent: &str) -> Result<usize> {
        let children = api.org_unit_children(parent).await?;
        let mut added = 0;
        for mut child in children {
            child.parent_id = Some(parent.to_string());
            if self.ids.insert(child.id.clone()) {
                self.units.push(child);
                added += 1;
            }
        }
        debug!("merged {added} new children under {parent}");
        Ok(added)
    }

    /// Pure projection of the arena into the shape a tree-selection UI
    /// consumes, in insertion order.
    pub fn to_tree_view(&self) -> Vec<TreeNode> {
        self.units.iter().map(TreeNode::from).collect()
    }

    pub fn units(&self) -> &[OrgUnit] {
        &self.units
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn select(&mut self, id: impl Into<String>) {
        self.selected = Some(id.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pulse_dash_data::{AnalyticsRequest, AnalyticsResponse, GeoChild};
    use pulse_dash_shared::DashError;

    struct FakeApi {
        roots: Result<Vec<OrgUnit>>,
        children: Vec<OrgUnit>,
    }

    fn unit(id: &str, name: &str) -> OrgUnit {
        OrgUnit {
            id: id.to_string(),
            parent_id: None,
            name: name.to_string(),
            path: format!("/{id}"),
            level: None,
            leaf: false,
            display_name: None,
            has_children: true,
        }
    }

    #[async_trait]
    impl ApiClient for FakeApi {
        async fn user_org_units(&self) -> Result<Vec<OrgUnit>> {
            self.roots.clone()
        }
        async fn org_unit_children(&self, _parent: &str) -> Result<Vec<OrgUnit>> {
            Ok(self.children.clone())
        }
        async fn org_unit_children_with_geometry(&self, _parent: &str) -> Result<Vec<GeoChild>> {
            unimplemented!()
        }
        async fn org_unit_group_members(&self, _groups: &[String]) -> Result<Vec<Vec<String>>> {
            unimplemented!()
        }
        async fn analytics(&self, _request: &AnalyticsRequest) -> Result<AnalyticsResponse> {
            unimplemented!()
        }
    }

    #[tokio::test]
    async fn test_roots_replace_and_select_first() {
        let api = FakeApi {
            roots: Ok(vec![unit("root1", "Uganda"), unit("root2", "Kenya")]),
            children: Vec::new(),
        };
        let mut tree = OrgUnitTreeLoader::new();
        tree.load_roots(&api).await.unwrap();

        assert_eq!(tree.units().len(), 2);
        assert_eq!(tree.selected(), Some("root1"));
    }

    #[tokio::test]
    async fn test_failed_root_load_leaves_state_untouched() {
        let good = FakeApi {
            roots: Ok(vec![unit("root1", "Uganda")]),
            children: Vec::new(),
        };
        let bad = FakeApi {
            roots: Err(DashError::Network {
                message: "connection refused".to_string(),
            }),
            children: Vec::new(),
        };

        let mut tree = OrgUnitTreeLoader::new();
        tree.load_roots(&good).await.unwrap();
        assert!(tree.load_roots(&bad).await.is_err());

        assert_eq!(tree.units().len(), 1);
        assert_eq!(tree.selected(), Some("root1"));
    }

    #[tokio::test]
    async fn test_children_are_tagged_and_merged_by_id() {
        let api = FakeApi {
            roots: Ok(vec![unit("root1", "Uganda")]),
            children: vec![unit("ou1", "Kampala"), unit("ou2", "Gulu")],
        };
        let mut tree = OrgUnitTreeLoader::new();
        tree.load_roots(&api).await.unwrap();

        let added = tree.load_children(&api, "root1").await.unwrap();
        assert_eq!(added, 2);
        assert_eq!(tree.units().len(), 3);
        assert!(tree
            .units()
            .iter()
            .filter(|u| u.parent_id.is_some())
            .all(|u| u.parent_id.as_deref() == Some("root1")));

        // loading the same parent again must not duplicate anything
        let added = tree.load_children(&api, "root1").await.unwrap();
        assert_eq!(added, 0);
        assert_eq!(tree.units().len(), 3);

        let ids: HashSet<_> = tree.units().iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids.len(), tree.units().len());
    }

    #[tokio::test]
    async fn test_tree_view_projection() {
        let api = FakeApi {
            roots: Ok(vec![unit("root1", "Uganda")]),
            children: vec![unit("ou1", "Kampala")],
        };
        let mut tree = OrgUnitTreeLoader::new();
        tree.load_roots(&api).await.unwrap();
        tree.load_children(&api, "root1").await.unwrap();

        let view = tree.to_tree_view();
        assert_eq!(view.len(), 2);
        assert_eq!(view[0].parent_id, "");
        assert_eq!(view[0].label, "Uganda");
        assert_eq!(view[1].parent_id, "root1");
        assert_eq!(view[1].value, "ou1");
    }
}
