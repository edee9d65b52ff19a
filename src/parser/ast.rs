// Abstract Syntax Tree for the chart DSL

/// Complete widget description parsed from the command line
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetSpec {
    pub chart: ChartSpec,
    pub appearance: Option<AppearanceSpec>,
    /// Fixed column count of the subplot grid
    pub columns: Option<usize>,
    /// Container size as (width, height)
    pub size: Option<(u32, u32)>,
}

/// correlation(x: ..., y: ..., display: "...")
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    /// Column plotted on the x axis
    pub x: String,
    /// Column plotted on the y axis
    pub y: String,
    pub display: Option<String>,
}

/// appearance(background: "...", text: "...")
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppearanceSpec {
    pub background: Option<String>,
    pub text: Option<String>,
}

/// One `|`-separated pipeline component
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Chart(ChartSpec),
    Appearance(AppearanceSpec),
    Grid { columns: usize },
    Size { width: u32, height: u32 },
}
