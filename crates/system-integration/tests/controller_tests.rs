use async_trait::async_trait;
use pulse_dash_data::{AnalyticsRequest, AnalyticsResponse, ApiClient, GeoChild};
use pulse_dash_integration::VisualizationController;
use pulse_dash_shared::{
    ChartSpec, DashError, DimensionItem, Geometry, OrgUnit, Result as DashResult,
};
use serde_json::json;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Default)]
struct FakeApi {
    geo_children: Vec<GeoChild>,
    group_members: Vec<Vec<String>>,
    analytics: Option<AnalyticsResponse>,
    /// When set, the analytics call parks until the gate is notified
    gate: Option<Arc<Notify>>,
    calls: Mutex<Vec<&'static str>>,
}

impl FakeApi {
    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ApiClient for FakeApi {
    async fn user_org_units(&self) -> DashResult<Vec<OrgUnit>> {
        unimplemented!()
    }

    async fn org_unit_children(&self, _parent: &str) -> DashResult<Vec<OrgUnit>> {
        unimplemented!()
    }

    async fn org_unit_children_with_geometry(&self, _parent: &str) -> DashResult<Vec<GeoChild>> {
        self.calls.lock().unwrap().push("geo");
        Ok(self.geo_children.clone())
    }

    async fn org_unit_group_members(&self, _groups: &[String]) -> DashResult<Vec<Vec<String>>> {
        self.calls.lock().unwrap().push("groups");
        Ok(self.group_members.clone())
    }

    async fn analytics(&self, _request: &AnalyticsRequest) -> DashResult<AnalyticsResponse> {
        self.calls.lock().unwrap().push("analytics");
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.analytics.clone().ok_or(DashError::Network {
            message: "connection reset".to_string(),
        })
    }
}

fn analytics_response(value: &str) -> AnalyticsResponse {
    serde_json::from_value(json!({
        "rows": [["ind1", "pe1", value]],
        "metaData": {
            "dimensions": { "pe": ["pe1"] },
            "items": { "pe1": { "name": "January" } }
        }
    }))
    .unwrap()
}

fn geo_child(id: &str, kind: &str) -> GeoChild {
    GeoChild {
        id: id.to_string(),
        name: id.to_string(),
        geometry: Some(Geometry {
            kind: kind.to_string(),
            coordinates: json!([]),
        }),
    }
}

fn configured_controller() -> VisualizationController {
    let controller = VisualizationController::new();
    controller.set_dx(vec![DimensionItem::new("ind1", "Confirmed")]);
    controller.set_periods(vec!["pe1".to_string()]);
    controller.set_org_units(vec!["ou0".to_string()]);
    controller.set_filter_by_periods(false);
    controller
}

fn series_value(controller: &VisualizationController) -> f64 {
    match controller.chart().unwrap() {
        ChartSpec::Category(chart) => chart.series[0].data[0],
        other => panic!("expected a category chart, got {other:?}"),
    }
}

#[tokio::test]
async fn test_select_unit_sequences_geo_before_analytics() {
    let api = FakeApi {
        geo_children: vec![geo_child("ou1", "Polygon"), geo_child("ou2", "Point")],
        analytics: Some(analytics_response("10")),
        ..FakeApi::default()
    };
    let controller = configured_controller();

    controller.select_unit(&api, "root1").await.unwrap();

    assert_eq!(api.calls(), ["geo", "analytics"]);
    // the geo step rewrote the org-unit axis to all children, drawn or not
    assert_eq!(controller.config().org_units, ["ou1", "ou2"]);
    assert!(controller.has_data());
    assert!(!controller.loading());
    assert_eq!(series_value(&controller), 10.0);
}

#[tokio::test]
async fn test_groups_expand_before_the_query() {
    let api = FakeApi {
        group_members: vec![
            vec!["ou1".to_string(), "ou2".to_string()],
            vec!["ou2".to_string()],
        ],
        analytics: Some(analytics_response("4")),
        ..FakeApi::default()
    };
    let controller = configured_controller();
    controller.set_org_unit_groups(vec!["g1".to_string(), "g2".to_string()]);

    controller.refresh(&api).await.unwrap();

    assert_eq!(api.calls(), ["groups", "analytics"]);
    // flattened in group order, duplicates kept
    assert_eq!(controller.config().org_units, ["ou1", "ou2", "ou2"]);
}

#[tokio::test]
async fn test_no_groups_means_no_group_call() {
    let api = FakeApi {
        analytics: Some(analytics_response("4")),
        ..FakeApi::default()
    };
    let controller = configured_controller();

    controller.refresh(&api).await.unwrap();
    assert_eq!(api.calls(), ["analytics"]);
}

#[tokio::test]
async fn test_unmet_preconditions_skip_the_query() {
    let api = FakeApi {
        analytics: Some(analytics_response("10")),
        ..FakeApi::default()
    };
    let controller = configured_controller();
    controller.refresh(&api).await.unwrap();
    assert_eq!(series_value(&controller), 10.0);

    // clearing the periods makes the next refresh a no-op
    controller.set_periods(Vec::new());
    let api2 = FakeApi {
        analytics: Some(analytics_response("99")),
        ..FakeApi::default()
    };
    controller.refresh(&api2).await.unwrap();

    assert!(api2.calls().is_empty());
    // the prior matrix is left untouched, not cleared
    assert_eq!(series_value(&controller), 10.0);
}

#[tokio::test]
async fn test_failed_fetch_keeps_last_known_good_data() {
    let good = FakeApi {
        analytics: Some(analytics_response("10")),
        ..FakeApi::default()
    };
    let controller = configured_controller();
    controller.refresh(&good).await.unwrap();

    let failing = FakeApi::default();
    let err = controller.refresh(&failing).await.unwrap_err();
    assert!(matches!(err, DashError::Network { .. }));

    assert_eq!(series_value(&controller), 10.0);
    assert!(!controller.loading());
}

#[tokio::test]
async fn test_stale_response_does_not_overwrite_newer_result() {
    let gate = Arc::new(Notify::new());
    let slow = FakeApi {
        analytics: Some(analytics_response("1")),
        gate: Some(gate.clone()),
        ..FakeApi::default()
    };
    let fast = FakeApi {
        analytics: Some(analytics_response("2")),
        ..FakeApi::default()
    };
    let controller = configured_controller();

    // the slow fetch starts first but completes after the fast one
    let slow_fut = controller.refresh(&slow);
    let fast_fut = async {
        controller.refresh(&fast).await.unwrap();
        gate.notify_one();
    };
    let (slow_result, _) = tokio::join!(slow_fut, fast_fut);
    slow_result.unwrap();

    // last issued wins, not last completed
    assert_eq!(series_value(&controller), 2.0);
    assert!(!controller.loading());
}

#[tokio::test]
async fn test_map_join_keys_cover_every_drawn_feature() {
    let api = FakeApi {
        geo_children: vec![geo_child("ou1", "Polygon"), geo_child("ou2", "Point")],
        analytics: Some(
            serde_json::from_value(json!({
                "rows": [["ind1", "ou1", "10"], ["ind1", "ou2", "7"]],
                "metaData": {}
            }))
            .unwrap(),
        ),
        ..FakeApi::default()
    };
    let controller = configured_controller();
    controller.set_chart_type(pulse_dash_shared::ChartType::Map);

    controller.select_unit(&api, "root1").await.unwrap();

    let ChartSpec::Map(chart) = controller.chart().unwrap() else {
        panic!("expected a map chart");
    };
    // every value pair resolves, drawn or not
    let series_ids: Vec<&str> = chart.series.iter().map(|d| d.0.as_str()).collect();
    assert_eq!(series_ids, ["ou1", "ou2"]);
    // and every drawn feature has a matching join key
    for feature in &chart.features.features {
        assert!(series_ids.contains(&feature.properties.id.as_str()));
    }
    assert_eq!(chart.features.features.len(), 1);
}

#[tokio::test]
async fn test_changing_the_chart_type_does_not_refetch() {
    let api = FakeApi {
        analytics: Some(analytics_response("10")),
        ..FakeApi::default()
    };
    let controller = configured_controller();
    controller.refresh(&api).await.unwrap();
    assert_eq!(api.calls(), ["analytics"]);

    controller.set_chart_type(pulse_dash_shared::ChartType::Spline);
    let spec = controller.chart().unwrap();
    match spec {
        ChartSpec::Category(chart) => {
            assert_eq!(chart.chart_type, pulse_dash_shared::ChartType::Spline)
        }
        other => panic!("expected a category chart, got {other:?}"),
    }
    // the spec was recomputed from the existing matrix, no new query
    assert_eq!(api.calls(), ["analytics"]);
}
