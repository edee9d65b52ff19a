use crate::error::PlotError;
use crate::field::{FieldProvider, FieldSelector};
use crate::layout::DEFAULT_FIXED_COL_NO;
use crate::parser::ast::WidgetSpec;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How each series group is drawn.
///
/// Only `"Density"` changes the drawing. Any other stored value is kept as
/// written so a loaded configuration serializes back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DisplayType {
    /// Small translucent markers over a density contour.
    Density,
    /// Plain markers.
    #[default]
    Scatter,
    /// Unrecognized value, drawn like `Scatter`.
    Other(String),
}

impl DisplayType {
    pub fn is_density(&self) -> bool {
        matches!(self, DisplayType::Density)
    }

    /// Marker `(size, opacity)` for this display type.
    pub fn marker_style(&self) -> (u32, f64) {
        if self.is_density() {
            (2, 0.4)
        } else {
            (5, 0.9)
        }
    }
}

impl From<&str> for DisplayType {
    fn from(value: &str) -> Self {
        match value {
            "Density" => DisplayType::Density,
            "Scatter" => DisplayType::Scatter,
            other => DisplayType::Other(other.to_string()),
        }
    }
}

impl From<String> for DisplayType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Density" => DisplayType::Density,
            "Scatter" => DisplayType::Scatter,
            _ => DisplayType::Other(value),
        }
    }
}

impl From<DisplayType> for String {
    fn from(value: DisplayType) -> Self {
        match value {
            DisplayType::Density => "Density".to_string(),
            DisplayType::Scatter => "Scatter".to_string(),
            DisplayType::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationConfig {
    #[serde(default)]
    pub first_field: Option<FieldSelector>,
    #[serde(default)]
    pub second_field: Option<FieldSelector>,
    #[serde(default)]
    pub display_type: DisplayType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppearanceConfig {
    #[serde(default = "default_background_color")]
    pub background_color: String,
    #[serde(default = "default_text_color")]
    pub text_color: String,
}

fn default_background_color() -> String {
    "#fff".to_string()
}

fn default_text_color() -> String {
    "#FFF".to_string()
}

fn default_fixed_col_no() -> usize {
    DEFAULT_FIXED_COL_NO
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            background_color: default_background_color(),
            text_color: default_text_color(),
        }
    }
}

/// Full configuration of one correlation-chart widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    #[serde(default)]
    pub visualization_config: VisualizationConfig,
    #[serde(default)]
    pub base_appearance_config: AppearanceConfig,
    #[serde(default = "default_fixed_col_no")]
    pub fixed_col_no: usize,
    /// Container size to pin once the first result is drawn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<(u32, u32)>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            visualization_config: VisualizationConfig::default(),
            base_appearance_config: AppearanceConfig::default(),
            fixed_col_no: DEFAULT_FIXED_COL_NO,
            size: None,
        }
    }
}

impl WidgetConfig {
    pub fn from_json_str(input: &str) -> Result<Self> {
        serde_json::from_str(input).context("Failed to parse widget configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read widget configuration {}", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Turn a parsed DSL spec into a configuration, looking field names up
    /// in `provider`.
    pub fn from_spec(spec: &WidgetSpec, provider: &FieldProvider) -> Result<Self, PlotError> {
        let lookup = |name: &str| {
            provider.find(name).cloned().ok_or_else(|| PlotError::FieldNotFound {
                field: name.to_string(),
                available: provider.all_fields.iter().map(|f| f.full_db_name.clone()).collect(),
            })
        };

        let visualization_config = VisualizationConfig {
            first_field: Some(lookup(&spec.chart.x)?),
            second_field: Some(lookup(&spec.chart.y)?),
            display_type: spec
                .chart
                .display
                .as_deref()
                .map(DisplayType::from)
                .unwrap_or_default(),
        };

        let mut base_appearance_config = AppearanceConfig::default();
        if let Some(appearance) = &spec.appearance {
            if let Some(bg) = &appearance.background {
                base_appearance_config.background_color = bg.clone();
            }
            if let Some(text) = &appearance.text {
                base_appearance_config.text_color = text.clone();
            }
        }

        Ok(Self {
            visualization_config,
            base_appearance_config,
            fixed_col_no: spec.columns.unwrap_or(DEFAULT_FIXED_COL_NO),
            size: spec.size,
        })
    }
}
