//! HTTP implementation of the service boundary
//!
//! Talks to a DHIS2-style web API. Wire payloads are deserialized into
//! private raw structs and converted to the domain model at this boundary;
//! nothing above this layer sees the wire shapes.

use crate::api::{ApiClient, GeoChild};
use crate::matrix::AnalyticsResponse;
use crate::request::AnalyticsRequest;
use async_trait::async_trait;
use log::debug;
use pulse_dash_shared::{DashError, Geometry, OrgUnit, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

const ROOT_FIELDS: &str =
    "organisationUnits[id,path,name,level,leaf,displayShortName~rename(displayName),children::isNotEmpty]";
const CHILD_FIELDS: &str = "children[id,name,path,leaf]";
const GEO_FIELDS: &str = "children[id,name,geometry]";

pub struct HttpApi {
    base: Url,
    client: reqwest::Client,
    credentials: Option<(String, String)>,
}

impl HttpApi {
    /// `base_url` is the instance root, e.g. `https://dhis.example.org/`
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base = Url::parse(base_url).map_err(|e| DashError::InvalidConfig {
            message: format!("invalid base url {base_url}: {e}"),
        })?;
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        Ok(Self {
            base,
            client: reqwest::Client::new(),
            credentials: None,
        })
    }

    pub fn with_basic_auth(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some((user.into(), password.into()));
        self
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T> {
        let url = self
            .base
            .join(path)
            .map_err(|e| DashError::InvalidConfig {
                message: format!("invalid request path {path}: {e}"),
            })?;
        debug!("GET {url}");

        let mut request = self.client.get(url.clone()).query(query);
        if let Some((user, password)) = &self.credentials {
            request = request.basic_auth(user, Some(password));
        }

        let response = request.send().await.map_err(|e| DashError::Network {
            message: e.to_string(),
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(DashError::Api {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        response.json::<T>().await.map_err(|e| DashError::Decode {
            message: e.to_string(),
        })
    }
}

// Wire shapes, converted to the domain model before they leave this module.

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MeResponse {
    #[serde(default)]
    organisation_units: Vec<RawRootUnit>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRootUnit {
    id: String,
    name: String,
    #[serde(default)]
    path: String,
    level: Option<u32>,
    #[serde(default)]
    leaf: bool,
    display_name: Option<String>,
    /// `children::isNotEmpty` collapses the child list to a boolean
    #[serde(default)]
    children: bool,
}

impl From<RawRootUnit> for OrgUnit {
    fn from(raw: RawRootUnit) -> Self {
        OrgUnit {
            id: raw.id,
            parent_id: None,
            name: raw.name,
            path: raw.path,
            level: raw.level,
            leaf: raw.leaf,
            display_name: raw.display_name,
            has_children: raw.children,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UnitListResponse<T> {
    #[serde(default = "Vec::new")]
    organisation_units: Vec<ChildrenHolder<T>>,
}

#[derive(Deserialize)]
struct ChildrenHolder<T> {
    #[serde(default = "Vec::new")]
    children: Vec<T>,
}

#[derive(Deserialize)]
struct RawChildUnit {
    id: String,
    name: String,
    #[serde(default)]
    path: String,
    #[serde(default)]
    leaf: bool,
}

#[derive(Deserialize)]
struct RawGeoChild {
    id: String,
    name: String,
    geometry: Option<Geometry>,
}

#[derive(Deserialize)]
struct GeoChildrenResponse {
    #[serde(default = "Vec::new")]
    children: Vec<RawGeoChild>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroupListResponse {
    #[serde(default = "Vec::new")]
    organisation_unit_groups: Vec<RawGroup>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGroup {
    #[serde(default = "Vec::new")]
    organisation_units: Vec<IdOnly>,
}

#[derive(Deserialize)]
struct IdOnly {
    id: String,
}

#[async_trait]
impl ApiClient for HttpApi {
    async fn user_org_units(&self) -> Result<Vec<OrgUnit>> {
        let query = [("fields".to_string(), ROOT_FIELDS.to_string())];
        let response: MeResponse = self.get_json("api/me.json", &query).await?;
        Ok(response
            .organisation_units
            .into_iter()
            .map(OrgUnit::from)
            .collect())
    }

    async fn org_unit_children(&self, parent: &str) -> Result<Vec<OrgUnit>> {
        let query = [
            ("filter".to_string(), format!("id:in:[{parent}]")),
            ("paging".to_string(), "false".to_string()),
            ("fields".to_string(), CHILD_FIELDS.to_string()),
        ];
        let response: UnitListResponse<RawChildUnit> =
            self.get_json("api/organisationUnits.json", &query).await?;
        Ok(response
            .organisation_units
            .into_iter()
            .flat_map(|holder| holder.children)
            .map(|child| OrgUnit {
                id: child.id,
                parent_id: None,
                name: child.name,
                path: child.path,
                level: None,
                leaf: child.leaf,
                display_name: None,
                has_children: false,
            })
            .collect())
    }

    async fn org_unit_children_with_geometry(&self, parent: &str) -> Result<Vec<GeoChild>> {
        let query = [("fields".to_string(), GEO_FIELDS.to_string())];
        let response: GeoChildrenResponse = self
            .get_json(&format!("api/organisationUnits/{parent}.json"), &query)
            .await?;
        Ok(response
            .children
            .into_iter()
            .map(|child| GeoChild {
                id: child.id,
                name: child.name,
                geometry: child.geometry,
            })
            .collect())
    }

    async fn org_unit_group_members(&self, groups: &[String]) -> Result<Vec<Vec<String>>> {
        let query = [
            ("fields".to_string(), "organisationUnits".to_string()),
            ("filter".to_string(), format!("id:in:[{}]", groups.join(","))),
        ];
        let response: GroupListResponse = self
            .get_json("api/organisationUnitGroups.json", &query)
            .await?;
        Ok(response
            .organisation_unit_groups
            .into_iter()
            .map(|group| group.organisation_units.into_iter().map(|u| u.id).collect())
            .collect())
    }

    async fn analytics(&self, request: &AnalyticsRequest) -> Result<AnalyticsResponse> {
        self.get_json("api/analytics.json", &request.query_pairs())
            .await
    }
}
