//! Visualization controller
//!
//! Owns the per-widget state (query configuration, result matrix, geo
//! features, loading flag) and sequences fetches for user actions. Within
//! one action the geometry fetch always completes before the analytics
//! query, because the geo step rewrites the org-unit axis the query uses.
//!
//! Every fetch is stamped with a generation token taken when it starts;
//! a completion whose token has been superseded commits nothing, so a slow
//! stale response can never overwrite the result of a newer request.

use log::{debug, warn};
use parking_lot::RwLock;
use pulse_dash_charts::build_chart;
use pulse_dash_data::{
    expand_org_unit_groups, fetch_geo_join, AnalyticsRequest, ApiClient, ResultMatrix,
};
use pulse_dash_shared::{
    ChartFrame, ChartKind, ChartSpec, ChartType, DimensionItem, FeatureCollection, QueryConfig,
    Result, TextStyle,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Patch overlaid onto a matching dx item (and optionally its child) by
/// [`VisualizationController::merge_dx_styles`]. Absent fields keep the
/// item's current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DxPatch {
    pub label: Option<String>,
    pub color: Option<String>,
    pub series_type: Option<String>,
    pub y_axis: Option<usize>,
    pub line_width: Option<f64>,
    pub style: Option<TextStyle>,
    pub child: Option<Box<DxPatch>>,
}

impl DxPatch {
    fn apply(&self, item: &mut DimensionItem) {
        if let Some(label) = &self.label {
            item.label = label.clone();
        }
        if let Some(color) = &self.color {
            item.color = Some(color.clone());
        }
        if let Some(series_type) = &self.series_type {
            item.series_type = Some(series_type.clone());
        }
        if let Some(y_axis) = self.y_axis {
            item.y_axis = Some(y_axis);
        }
        if let Some(line_width) = self.line_width {
            item.line_width = Some(line_width);
        }
        if let Some(style) = &self.style {
            item.style = style.clone();
        }
        // a child patch only applies where a child already exists; it cannot
        // invent one, since a dimension item without a dx id is meaningless
        if let (Some(patch), Some(child)) = (&self.child, &mut item.child) {
            patch.apply(child);
        }
    }
}

/// Position and extent of a widget on the dashboard grid, in grid cells.
/// Distinct from the pixel width/height the chart frame carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

struct VizState {
    config: QueryConfig,
    kind: ChartKind,
    chart_type: ChartType,
    title: String,
    subtitle: String,
    grid: GridRect,
    width: u32,
    height: u32,
    background: Option<String>,
    matrix: Option<ResultMatrix>,
    geo: Option<FeatureCollection>,
    loading: bool,
    generation: u64,
}

impl Default for VizState {
    fn default() -> Self {
        Self {
            config: QueryConfig::default(),
            kind: ChartKind::Chart,
            chart_type: ChartType::Column,
            title: String::new(),
            subtitle: String::new(),
            grid: GridRect::default(),
            width: 0,
            height: 0,
            background: None,
            matrix: None,
            geo: None,
            loading: false,
            generation: 0,
        }
    }
}

pub struct VisualizationController {
    id: Uuid,
    state: RwLock<VizState>,
}

impl Default for VisualizationController {
    fn default() -> Self {
        Self::new()
    }
}

impl VisualizationController {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: RwLock::new(VizState::default()),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    // Configuration mutations never re-issue a query by themselves; a
    // re-fetch is a distinct, explicit action.

    pub fn set_kind(&self, kind: ChartKind) {
        self.state.write().kind = kind;
    }

    pub fn set_chart_type(&self, chart_type: ChartType) {
        self.state.write().chart_type = chart_type;
    }

    pub fn set_dx(&self, dx: Vec<DimensionItem>) {
        self.state.write().config.dx = dx;
    }

    pub fn set_periods(&self, periods: Vec<String>) {
        self.state.write().config.periods = periods;
    }

    pub fn set_org_units(&self, org_units: Vec<String>) {
        self.state.write().config.org_units = org_units;
    }

    pub fn set_org_unit_groups(&self, groups: Vec<String>) {
        self.state.write().config.org_unit_groups = groups;
    }

    pub fn set_filter_by_org_units(&self, filter: bool) {
        self.state.write().config.filter_by_org_units = filter;
    }

    pub fn set_filter_by_periods(&self, filter: bool) {
        self.state.write().config.filter_by_periods = filter;
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.state.write().title = title.into();
    }

    pub fn set_subtitle(&self, subtitle: impl Into<String>) {
        self.state.write().subtitle = subtitle.into();
    }

    pub fn set_background(&self, background: Option<String>) {
        self.state.write().background = background;
    }

    pub fn resize(&self, width: u32, height: u32) {
        let mut state = self.state.write();
        state.width = width;
        state.height = height;
    }

    /// Places the widget on the dashboard grid. Grid cells, not pixels;
    /// pixel extent comes from [`resize`](Self::resize).
    pub fn set_coordinates(&self, x: u32, y: u32, w: u32, h: u32) {
        self.state.write().grid = GridRect { x, y, w, h };
    }

    pub fn coordinates(&self) -> GridRect {
        self.state.read().grid
    }

    /// Overlays label/style patches onto matching dx items by dx id,
    /// descending one level into children.
    pub fn merge_dx_styles(&self, patches: &std::collections::HashMap<String, DxPatch>) {
        let mut state = self.state.write();
        for item in &mut state.config.dx {
            if let Some(patch) = patches.get(&item.dx) {
                patch.apply(item);
            }
        }
    }

    pub fn loading(&self) -> bool {
        self.state.read().loading
    }

    pub fn config(&self) -> QueryConfig {
        self.state.read().config.clone()
    }

    pub fn has_data(&self) -> bool {
        self.state.read().matrix.is_some()
    }

    /// Derives the chart specification from the current snapshot. Always
    /// recomputed; the spec is never stored.
    pub fn chart(&self) -> Result<ChartSpec> {
        let state = self.state.read();
        let frame = ChartFrame {
            title: state.title.clone(),
            subtitle: state.subtitle.clone(),
            width: state.width,
            height: state.height,
            background: state.background.clone(),
        };
        build_chart(
            state.kind,
            state.chart_type,
            &state.config,
            state.matrix.as_ref(),
            state.geo.as_ref(),
            &frame,
        )
    }

    /// Re-issues the analytics query for the current configuration:
    /// group expansion (when groups are configured) then the aggregate
    /// query. A failed or superseded fetch leaves the last-known-good
    /// matrix in place.
    pub async fn refresh(&self, api: &dyn ApiClient) -> Result<()> {
        let generation = self.begin_request();
        let result = self.fetch_data(api, generation).await;
        self.finish_request(generation);
        if let Err(err) = &result {
            warn!("analytics fetch failed, keeping previous data: {err}");
        }
        result
    }

    /// Handles an organisation-unit selection: geo join for the map layer
    /// (which also rewrites the query's org-unit axis to the unit's
    /// children), then the analytics query.
    pub async fn select_unit(&self, api: &dyn ApiClient, unit: &str) -> Result<()> {
        let generation = self.begin_request();
        let result = self.fetch_unit(api, unit, generation).await;
        self.finish_request(generation);
        if let Err(err) = &result {
            warn!("unit selection fetch failed, keeping previous data: {err}");
        }
        result
    }

    async fn fetch_unit(&self, api: &dyn ApiClient, unit: &str, generation: u64) -> Result<()> {
        if !unit.is_empty() {
            let join = fetch_geo_join(api, unit).await?;
            let mut state = self.state.write();
            if state.generation != generation {
                debug!("discarding stale geo join for {unit}");
                return Ok(());
            }
            state.config.org_units = join.child_ids;
            state.geo = Some(join.collection);
        }
        self.fetch_data(api, generation).await
    }

    async fn fetch_data(&self, api: &dyn ApiClient, generation: u64) -> Result<()> {
        let groups = self.state.read().config.org_unit_groups.clone();
        if !groups.is_empty() {
            let units = expand_org_unit_groups(api, &groups).await?;
            let mut state = self.state.write();
            if state.generation != generation {
                debug!("discarding stale group expansion");
                return Ok(());
            }
            state.config.org_units = units;
        }

        let request = AnalyticsRequest::build(&self.state.read().config);
        let Some(request) = request else {
            debug!("query preconditions unmet, keeping previous data");
            return Ok(());
        };

        let response = api.analytics(&request).await?;
        let mut state = self.state.write();
        if state.generation != generation {
            debug!("discarding stale analytics response");
            return Ok(());
        }
        state.matrix = Some(ResultMatrix::new(response));
        Ok(())
    }

    /// Stamps a new fetch: bumps the generation (superseding any fetch
    /// still in flight) and raises the loading flag.
    fn begin_request(&self) -> u64 {
        let mut state = self.state.write();
        state.generation += 1;
        state.loading = true;
        state.generation
    }

    /// Lowers the loading flag, unless a newer fetch has taken over.
    fn finish_request(&self, generation: u64) {
        let mut state = self.state.write();
        if state.generation == generation {
            state.loading = false;
        }
    }
}
