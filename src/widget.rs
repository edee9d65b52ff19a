//! Correlation-chart widget state.
//!
//! The widget owns the last prepared traces plus the layout object handed to
//! the renderer. Every entry point is an independent event handler: a new
//! query result replaces the traces wholesale, appearance changes and
//! resizes only touch the layout.

use crate::config::WidgetConfig;
use crate::data::QueryResult;
use crate::error::PlotResult;
use crate::field::{update_single_field, FieldProvider, FieldSelector};
use crate::ir::{Grid, Layout, Placement, PlotSpec, RenderConfig, Trace};
use crate::layout::GridSize;
use crate::transform::prepare_data;
use tracing::{info, warn};

/// Which part of the widget the host should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    /// Nothing requested yet.
    #[default]
    Idle,
    Loading,
    Chart,
    /// The last result held no series groups.
    NoData,
}

#[derive(Debug, Clone)]
pub struct CorrelationChartWidget {
    config: WidgetConfig,
    fields: FieldProvider,
    data: Vec<Trace>,
    placements: Vec<Placement>,
    grid: GridSize,
    layout: Layout,
    render_config: RenderConfig,
    view: ViewState,
}

impl CorrelationChartWidget {
    pub fn new(config: WidgetConfig, fields: FieldProvider) -> Self {
        let columns = config.fixed_col_no;
        Self {
            config,
            fields,
            data: Vec::new(),
            placements: Vec::new(),
            grid: GridSize { rows: 2, columns },
            layout: Layout::default(),
            render_config: RenderConfig::default(),
            view: ViewState::Idle,
        }
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn fields(&self) -> &FieldProvider {
        &self.fields
    }

    pub fn traces(&self) -> &[Trace] {
        &self.data
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn before_data_fetched(&mut self) {
        self.view = ViewState::Loading;
    }

    /// Rebuild all traces from a fresh query result.
    ///
    /// On error the previous traces stay in place.
    pub fn on_data_received(&mut self, results: &[QueryResult]) -> PlotResult<()> {
        let prepared = prepare_data(results, &self.config.visualization_config, self.config.fixed_col_no)?;
        self.data = prepared.traces;
        self.placements = prepared.placements;
        self.grid = prepared.grid;
        self.view = if self.placements.is_empty() {
            ViewState::NoData
        } else {
            ViewState::Chart
        };
        info!(
            groups = self.placements.len(),
            traces = self.data.len(),
            "correlation chart refreshed"
        );
        self.update_appearance();
        Ok(())
    }

    pub fn refresh_view(&mut self) {
        self.update_appearance();
    }

    /// Copy colors, axis titles and grid size into the layout.
    pub fn update_appearance(&mut self) {
        let appearance = &self.config.base_appearance_config;
        let vis = &self.config.visualization_config;

        self.layout.paper_bgcolor = appearance.background_color.clone();
        self.layout.plot_bgcolor = appearance.background_color.clone();
        self.layout.font.color = appearance.text_color.clone();
        self.layout.xaxis.title.text = vis
            .first_field
            .as_ref()
            .map(|f| f.full_db_name.clone())
            .unwrap_or_default();
        self.layout.yaxis.title.text = vis
            .second_field
            .as_ref()
            .map(|f| f.full_db_name.clone())
            .unwrap_or_default();
        self.layout.grid = Grid::independent(self.grid.rows, self.grid.columns);
    }

    /// Pin the layout to the host container's size.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.layout.autosize = false;
        self.layout.width = Some(width);
        self.layout.height = Some(height);
    }

    /// React to fields appearing or disappearing upstream.
    pub fn handle_updated_fields(&mut self, added: &[FieldSelector], removed: &[FieldSelector]) {
        let available = self.fields.numeric_fields();
        let vis = &mut self.config.visualization_config;

        let first = update_single_field(vis.first_field.as_ref(), &available, added, removed, |f| f.is_numeric());
        let second = update_single_field(vis.second_field.as_ref(), &available, added, removed, |f| f.is_numeric());

        for (axis, before, after) in [("x", &vis.first_field, &first), ("y", &vis.second_field, &second)] {
            if before != after {
                warn!(
                    axis,
                    from = before.as_ref().map(|f| f.full_db_name.as_str()).unwrap_or("<none>"),
                    to = after.as_ref().map(|f| f.full_db_name.as_str()).unwrap_or("<none>"),
                    "correlation field substituted"
                );
            }
        }

        vis.first_field = first;
        vis.second_field = second;
        self.fields.apply_changes(added, removed);
    }

    /// Snapshot of traces, layout and render config for the renderer.
    pub fn plot_spec(&self) -> PlotSpec {
        PlotSpec {
            data: self.data.clone(),
            layout: self.layout.clone(),
            config: self.render_config.clone(),
        }
    }
}
