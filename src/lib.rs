// Library exports for seriesplot

pub mod color;
pub mod config;
pub mod csv_reader;
pub mod data;
pub mod error;
pub mod field;
pub mod ir;
pub mod layout;
pub mod parser;
pub mod preview;
pub mod telemetry;
pub mod transform;
pub mod widget;

pub use config::{AppearanceConfig, DisplayType, VisualizationConfig, WidgetConfig};
pub use data::{Cell, QueryResult, SeriesGroup};
pub use error::{PlotError, PlotResult};
pub use field::{FieldProvider, FieldSelector};
pub use ir::PlotSpec;
pub use widget::CorrelationChartWidget;

/// Image format of the preview renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Png,
    Svg,
}

/// Preview canvas settings, used when the layout has no pinned size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            format: OutputFormat::Png,
        }
    }
}
