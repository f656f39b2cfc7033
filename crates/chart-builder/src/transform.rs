//! Dimension configuration + result matrix -> chart specification
//!
//! Dispatch is by chart kind first, then for the plain `Chart` kind by
//! chart type. Every lookup miss yields a default (0 or "0"); only an
//! incomplete metadata item table or an under-configured multi-axis chart
//! surface as errors.

use crate::format::{format_value, strip_case_label};
use log::debug;
use pulse_dash_data::ResultMatrix;
use pulse_dash_shared::{
    CategoryChart, CategorySeries, ChartFrame, ChartKind, ChartSpec, ChartType, DashError,
    FeatureCollection, MapChart, MapDatum, MultiAxisChart, MultiAxisSeries, PieChart, PieSlice,
    QueryConfig, Result, TextValue, TextValueChild, TextValueSet, YAxisSpec,
};

/// Series name of the pie chart, fixed by the renderer contract
pub const PIE_SERIES_NAME: &str = "Cases by Country";

const PRIMARY_AXIS_TITLE: &str = "Number";
const SECONDARY_AXIS_TITLE: &str = "Cumulative Daily Cases";

/// Derives the chart specification for the current snapshot.
///
/// `matrix` is `None` until the first query completes; that state maps to
/// [`ChartSpec::Pending`], which is "not yet loaded", not an error.
pub fn build_chart(
    kind: ChartKind,
    chart_type: ChartType,
    config: &QueryConfig,
    matrix: Option<&ResultMatrix>,
    geo: Option<&FeatureCollection>,
    frame: &ChartFrame,
) -> Result<ChartSpec> {
    let Some(matrix) = matrix else {
        debug!("no result matrix yet, emitting pending spec");
        return Ok(ChartSpec::Pending);
    };

    match kind {
        ChartKind::Chart => match chart_type {
            ChartType::Column => column_chart(config, matrix, frame),
            ChartType::Line | ChartType::Spline => line_chart(chart_type, config, matrix, frame),
            ChartType::Pie => pie_chart(config, matrix, frame),
            ChartType::Map => Ok(map_chart(matrix, geo, frame)),
        },
        ChartKind::Multiple => multi_axis_chart(config, matrix, frame),
        ChartKind::TextValues => text_values(config, matrix),
    }
}

/// Exactly one of the two non-data axes is broken out as the category axis:
/// org units when they are a dimension, periods otherwise.
fn category_axis(config: &QueryConfig) -> &'static str {
    if !config.filter_by_org_units {
        "ou"
    } else {
        "pe"
    }
}

fn axis_names(matrix: &ResultMatrix, axis: &str) -> Result<Vec<String>> {
    matrix
        .axis(axis)
        .iter()
        .map(|id| matrix.item_name(id).map(str::to_string))
        .collect()
}

/// One numeric series per dx, in dx order, with a value for every category
/// id of `axis` (0.0 where the sparse rows have no entry).
fn dx_series(config: &QueryConfig, matrix: &ResultMatrix, axis: &str) -> Vec<CategorySeries> {
    config
        .dx
        .iter()
        .map(|item| CategorySeries {
            name: item.label.clone(),
            data: matrix
                .axis(axis)
                .iter()
                .map(|id| matrix.value(&item.dx, id))
                .collect(),
            color: item.color.clone(),
        })
        .collect()
}

fn column_chart(
    config: &QueryConfig,
    matrix: &ResultMatrix,
    frame: &ChartFrame,
) -> Result<ChartSpec> {
    let axis = category_axis(config);
    Ok(ChartSpec::Category(CategoryChart {
        frame: frame.clone(),
        chart_type: ChartType::Column,
        categories: axis_names(matrix, axis)?,
        series: dx_series(config, matrix, axis),
    }))
}

/// Line and spline charts key on the period flag: when periods stay a
/// filter there is nothing to break out, so categories and series are
/// empty and the renderer draws an empty chart.
fn line_chart(
    chart_type: ChartType,
    config: &QueryConfig,
    matrix: &ResultMatrix,
    frame: &ChartFrame,
) -> Result<ChartSpec> {
    let (categories, series) = if !config.filter_by_periods {
        (axis_names(matrix, "pe")?, dx_series(config, matrix, "pe"))
    } else {
        (Vec::new(), Vec::new())
    };
    Ok(ChartSpec::Category(CategoryChart {
        frame: frame.clone(),
        chart_type,
        categories,
        series,
    }))
}

/// Pie charts ignore the dx configuration entirely: one slice per row,
/// named after the row's metadata item with the case-count affixes
/// stripped, valued from the row's second column.
fn pie_chart(
    _config: &QueryConfig,
    matrix: &ResultMatrix,
    frame: &ChartFrame,
) -> Result<ChartSpec> {
    let mut slices = Vec::with_capacity(matrix.rows().len());
    for row in matrix.rows() {
        let id = row.first().map(String::as_str).unwrap_or("");
        let name = strip_case_label(matrix.item_name(id)?);
        let y = row
            .get(1)
            .and_then(|value| value.parse().ok())
            .unwrap_or(0.0);
        slices.push(PieSlice { name, y });
    }
    Ok(ChartSpec::Pie(PieChart {
        frame: frame.clone(),
        series_name: PIE_SERIES_NAME.to_string(),
        slices,
    }))
}

/// Map series are `[orgUnitId, value]` pairs from row columns 1 and 2; the
/// renderer joins them against the feature collection by `properties.id`.
fn map_chart(matrix: &ResultMatrix, geo: Option<&FeatureCollection>, frame: &ChartFrame) -> ChartSpec {
    let series = matrix
        .rows()
        .iter()
        .map(|row| {
            MapDatum(
                row.get(1).cloned().unwrap_or_default(),
                row.get(2)
                    .and_then(|value| value.parse().ok())
                    .unwrap_or(0.0),
            )
        })
        .collect();
    ChartSpec::Map(MapChart {
        frame: frame.clone(),
        features: geo.cloned().unwrap_or_default(),
        series,
        keys: vec!["id".to_string(), "value".to_string()],
        join_by: "id".to_string(),
    })
}

fn multi_axis_chart(
    config: &QueryConfig,
    matrix: &ResultMatrix,
    frame: &ChartFrame,
) -> Result<ChartSpec> {
    // the two fixed y-axes are styled from the first and second dx item
    if config.dx.len() < 2 {
        return Err(DashError::InvalidConfig {
            message: format!(
                "multi-axis chart needs at least two dx items, got {}",
                config.dx.len()
            ),
        });
    }

    let axis = category_axis(config);
    let series = config
        .dx
        .iter()
        .map(|item| MultiAxisSeries {
            name: item.label.clone(),
            data: matrix
                .axis(axis)
                .iter()
                .map(|id| matrix.value(&item.dx, id))
                .collect(),
            series_type: item
                .series_type
                .clone()
                .unwrap_or_else(|| "line".to_string()),
            y_axis: item.y_axis,
            color: item.color.clone(),
            line_width: item.line_width,
        })
        .collect();

    Ok(ChartSpec::MultiAxis(MultiAxisChart {
        frame: frame.clone(),
        categories: axis_names(matrix, axis)?,
        series,
        y_axes: vec![
            YAxisSpec {
                title: PRIMARY_AXIS_TITLE.to_string(),
                color: config.dx[0].color.clone(),
                opposite: false,
            },
            YAxisSpec {
                title: SECONDARY_AXIS_TITLE.to_string(),
                color: config.dx[1].color.clone(),
                opposite: true,
            },
        ],
    }))
}

/// Text-value tiles are not axis-broken-down: each dx (and its optional
/// nested child) resolves to the single row keyed by its id, formatted for
/// display, defaulting to the literal "0" when no row matches.
fn text_values(config: &QueryConfig, matrix: &ResultMatrix) -> Result<ChartSpec> {
    if config.dx.is_empty() {
        return Ok(ChartSpec::Pending);
    }

    let values = config
        .dx
        .iter()
        .map(|item| {
            let child = item.child.as_ref().map(|child| TextValueChild {
                label: child.label.clone(),
                value: display_value(matrix, &child.dx),
                style: child.style.clone(),
            });
            TextValue {
                dx: item.dx.clone(),
                label: item.label.clone(),
                value: display_value(matrix, &item.dx),
                style: item.style.clone(),
                child,
            }
        })
        .collect();

    Ok(ChartSpec::TextValues(TextValueSet { values }))
}

fn display_value(matrix: &ResultMatrix, dx: &str) -> String {
    matrix
        .dx_value(dx)
        .map(format_value)
        .unwrap_or_else(|| "0".to_string())
}
