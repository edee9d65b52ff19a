//! Plot specification handed to the browser-side renderer.
//!
//! Field order in these structs is the key order of the serialized JSON.

use crate::data::Cell;
use serde::{Deserialize, Serialize};

// =============================================================================
// Traces
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Trace {
    Scatter(ScatterTrace),
    Contour(ContourTrace),
}

impl Trace {
    pub fn x(&self) -> &[Cell] {
        match self {
            Trace::Scatter(t) => &t.x,
            Trace::Contour(t) => &t.x,
        }
    }

    pub fn y(&self) -> &[Cell] {
        match self {
            Trace::Scatter(t) => &t.y,
            Trace::Contour(t) => &t.y,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Trace::Scatter(t) => &t.name,
            Trace::Contour(t) => &t.name,
        }
    }

    pub fn axes(&self) -> (&str, &str) {
        match self {
            Trace::Scatter(t) => (&t.xaxis, &t.yaxis),
            Trace::Contour(t) => (&t.xaxis, &t.yaxis),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScatterType {
    #[serde(rename = "scatter")]
    Scatter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContourType {
    #[serde(rename = "histogram2dcontour")]
    Histogram2dContour,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScatterMode {
    #[serde(rename = "markers")]
    Markers,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub color: String,
    pub size: u32,
    pub opacity: f64,
}

/// Marker scatter of one series group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterTrace {
    pub x: Vec<Cell>,
    pub y: Vec<Cell>,
    pub mode: ScatterMode,
    pub name: String,
    pub marker: Marker,
    #[serde(rename = "type")]
    pub trace_type: ScatterType,
    pub xaxis: String,
    pub yaxis: String,
}

/// 2-D density contour drawn under the scatter in density mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContourTrace {
    pub x: Vec<Cell>,
    pub y: Vec<Cell>,
    pub name: String,
    pub ncontours: u32,
    pub colorscale: String,
    pub reversescale: bool,
    pub showscale: bool,
    #[serde(rename = "type")]
    pub trace_type: ContourType,
    pub xaxis: String,
    pub yaxis: String,
}

// =============================================================================
// Layout
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub rows: usize,
    pub columns: usize,
    pub pattern: String,
}

impl Grid {
    pub fn independent(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            pattern: "independent".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisLayout {
    pub title: Title,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Font {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub grid: Grid,
    pub xaxis: AxisLayout,
    pub yaxis: AxisLayout,
    pub font: Font,
    pub autosize: bool,
    pub plot_bgcolor: String,
    pub paper_bgcolor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            grid: Grid::independent(2, 2),
            xaxis: AxisLayout::default(),
            yaxis: AxisLayout::default(),
            font: Font {
                color: "#FFF".to_string(),
            },
            autosize: true,
            plot_bgcolor: "#fff".to_string(),
            paper_bgcolor: "#fff".to_string(),
            width: None,
            height: None,
        }
    }
}

/// Renderer toolbar and responsiveness switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    pub mode_bar_buttons_to_remove: Vec<String>,
    #[serde(rename = "displaylogo")]
    pub display_logo: bool,
    pub display_mode_bar: bool,
    pub responsive: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            mode_bar_buttons_to_remove: ["lasso2d", "select2d", "toggleSpikelines", "toImage"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            display_logo: false,
            display_mode_bar: false,
            responsive: true,
        }
    }
}

// =============================================================================
// Placement
// =============================================================================

/// Where a series group ended up in the subplot grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub group: usize,
    pub name: String,
    pub xaxis: String,
    pub yaxis: String,
    pub row: usize,
    pub column: usize,
}

/// Everything the renderer needs for one draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotSpec {
    pub data: Vec<Trace>,
    pub layout: Layout,
    pub config: RenderConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_json() {
        let json = serde_json::to_string(&Layout::default()).unwrap();
        assert_eq!(
            json,
            r##"{"grid":{"rows":2,"columns":2,"pattern":"independent"},"xaxis":{"title":{"text":""}},"yaxis":{"title":{"text":""}},"font":{"color":"#FFF"},"autosize":true,"plot_bgcolor":"#fff","paper_bgcolor":"#fff"}"##
        );
    }

    #[test]
    fn test_pinned_size_is_appended() {
        let layout = Layout {
            autosize: false,
            width: Some(640),
            height: Some(480),
            ..Layout::default()
        };
        let json = serde_json::to_string(&layout).unwrap();
        assert!(json.ends_with(r##""autosize":false,"plot_bgcolor":"#fff","paper_bgcolor":"#fff","width":640,"height":480}"##));
    }

    #[test]
    fn test_render_config_json() {
        let json = serde_json::to_string(&RenderConfig::default()).unwrap();
        assert_eq!(
            json,
            r#"{"modeBarButtonsToRemove":["lasso2d","select2d","toggleSpikelines","toImage"],"displaylogo":false,"displayModeBar":false,"responsive":true}"#
        );
    }

    #[test]
    fn test_contour_trace_key_order() {
        let trace = Trace::Contour(ContourTrace {
            x: vec![Cell::from(1)],
            y: vec![Cell::from(2)],
            name: "a".to_string(),
            ncontours: 20,
            colorscale: "Hot".to_string(),
            reversescale: true,
            showscale: false,
            trace_type: ContourType::Histogram2dContour,
            xaxis: "x2".to_string(),
            yaxis: "y2".to_string(),
        });
        assert_eq!(
            serde_json::to_string(&trace).unwrap(),
            r#"{"x":[1],"y":[2],"name":"a","ncontours":20,"colorscale":"Hot","reversescale":true,"showscale":false,"type":"histogram2dcontour","xaxis":"x2","yaxis":"y2"}"#
        );
    }

    #[test]
    fn test_untagged_trace_reads_back_by_shape() {
        let json = r##"{"x":[1],"y":[2],"mode":"markers","name":"a","marker":{"color":"#015c0d","size":5,"opacity":0.9},"type":"scatter","xaxis":"x","yaxis":"y"}"##;
        let trace: Trace = serde_json::from_str(json).unwrap();
        assert!(matches!(trace, Trace::Scatter(_)));
        assert_eq!(trace.axes(), ("x", "y"));
    }
}
