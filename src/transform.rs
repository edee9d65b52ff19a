use crate::color::{ColorRamp, Rgb};
use crate::config::{DisplayType, VisualizationConfig};
use crate::data::{Cell, QueryResult, Row, SeriesGroup};
use crate::error::{Axis, PlotError, PlotResult};
use crate::field::FieldSelector;
use crate::ir::{ContourTrace, ContourType, Marker, Placement, ScatterMode, ScatterTrace, ScatterType, Trace};
use crate::layout::{axis_pair, GridSize};
use tracing::debug;

/// Legend name of groups that carry no tags.
pub const UNTAGGED_GROUP_NAME: &str = "density";

/// Bucket count of the density contour.
pub const DENSITY_CONTOURS: u32 = 20;

/// Traces, grid and placements built from one query result.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedData {
    pub traces: Vec<Trace>,
    pub grid: GridSize,
    pub placements: Vec<Placement>,
}

impl PreparedData {
    fn empty(grid: GridSize) -> Self {
        Self {
            traces: Vec::new(),
            grid,
            placements: Vec::new(),
        }
    }
}

/// Column indices of the x and y fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub x: usize,
    pub y: usize,
}

/// Main entry point: turn the first query result into one subplot per
/// series group.
///
/// Only `results[0]` is plotted. An empty slice or a result without groups
/// yields no traces. Nothing is carried over between calls.
pub fn prepare_data(
    results: &[QueryResult],
    vis: &VisualizationConfig,
    fixed_col_no: usize,
) -> PlotResult<PreparedData> {
    let Some(result) = results.first() else {
        return Ok(PreparedData::empty(GridSize::for_groups(0, fixed_col_no)?));
    };
    let groups = &result.all_data_series;
    let grid = GridSize::for_groups(groups.len(), fixed_col_no)?;
    if groups.is_empty() {
        return Ok(PreparedData::empty(grid));
    }

    let columns = resolve_columns(result, vis)?;
    let mut traces = Vec::with_capacity(groups.len() * 2);
    let mut placements = Vec::with_capacity(groups.len());

    for ((index, group), color) in groups.iter().enumerate().zip(ColorRamp::default()) {
        let (xaxis, yaxis) = axis_pair(index);
        let (row, column) = grid.cell(index);
        let name = group.name_or(UNTAGGED_GROUP_NAME).to_string();

        traces.extend(group_traces(index, group, columns, &vis.display_type, color, &name, &xaxis, &yaxis)?);
        placements.push(Placement {
            group: index,
            name,
            xaxis,
            yaxis,
            row,
            column,
        });
    }

    debug!(
        groups = placements.len(),
        traces = traces.len(),
        rows = grid.rows,
        columns = grid.columns,
        "prepared correlation traces"
    );

    Ok(PreparedData {
        traces,
        grid,
        placements,
    })
}

/// Find the x and y column indices in the result's schema.
pub fn resolve_columns(result: &QueryResult, vis: &VisualizationConfig) -> PlotResult<ResolvedColumns> {
    let x = selected(&vis.first_field, Axis::X)?.column_index(&result.headers)?;
    let y = selected(&vis.second_field, Axis::Y)?.column_index(&result.headers)?;
    Ok(ResolvedColumns { x, y })
}

fn selected(field: &Option<FieldSelector>, axis: Axis) -> PlotResult<&FieldSelector> {
    field.as_ref().ok_or(PlotError::MissingField { axis })
}

/// Scatter trace of one group, followed by its contour in density mode.
#[allow(clippy::too_many_arguments)]
fn group_traces(
    index: usize,
    group: &SeriesGroup,
    columns: ResolvedColumns,
    display: &DisplayType,
    color: Rgb,
    name: &str,
    xaxis: &str,
    yaxis: &str,
) -> PlotResult<Vec<Trace>> {
    let x = project(index, &group.rows, columns.x)?;
    let y = project(index, &group.rows, columns.y)?;
    let (size, opacity) = display.marker_style();

    let mut traces = Vec::with_capacity(2);
    traces.push(Trace::Scatter(ScatterTrace {
        x: x.clone(),
        y: y.clone(),
        mode: ScatterMode::Markers,
        name: name.to_string(),
        marker: Marker {
            color: color.to_hex(),
            size,
            opacity,
        },
        trace_type: ScatterType::Scatter,
        xaxis: xaxis.to_string(),
        yaxis: yaxis.to_string(),
    }));

    if display.is_density() {
        traces.push(Trace::Contour(ContourTrace {
            x,
            y,
            name: name.to_string(),
            ncontours: DENSITY_CONTOURS,
            colorscale: "Hot".to_string(),
            reversescale: true,
            showscale: false,
            trace_type: ContourType::Histogram2dContour,
            xaxis: xaxis.to_string(),
            yaxis: yaxis.to_string(),
        }));
    }

    Ok(traces)
}

/// Project every row onto one column.
pub fn project(group: usize, rows: &[Row], column: usize) -> PlotResult<Vec<Cell>> {
    rows.iter()
        .enumerate()
        .map(|(row_idx, row)| {
            row.get(column).cloned().ok_or(PlotError::RowTooShort {
                group,
                row: row_idx,
                index: column,
                width: row.len(),
            })
        })
        .collect()
}
