//! Chart Configuration
//! Dimensions, margins, labels and tooltip timings for the population chart.
//! Every field has a default, so a JSON file only needs the keys it overrides.

use crate::charts::Color;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Plot area must be positive, got {width}x{height}")]
    EmptyPlotArea { width: f64, height: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 50.0,
            right: 50.0,
            bottom: 50.0,
            left: 50.0,
        }
    }
}

/// Hover annotation behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipConfig {
    pub fade_in_ms: u64,
    pub fade_out_ms: u64,
    /// Opacity reached after fading in.
    pub opacity: f32,
    /// Offset from the pointer, in pixels.
    pub offset: (f64, f64),
}

impl TooltipConfig {
    pub fn fade_in(&self) -> Duration {
        Duration::from_millis(self.fade_in_ms)
    }

    pub fn fade_out(&self) -> Duration {
        Duration::from_millis(self.fade_out_ms)
    }
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            fade_in_ms: 200,
            fade_out_ms: 500,
            opacity: 0.9,
            offset: (10.0, -10.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Plot area width, excluding margins.
    pub width: f64,
    /// Plot area height, excluding margins.
    pub height: f64,
    pub margin: Margin,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub footnote: String,
    pub credit: String,
    pub line_color: Color,
    pub line_width: f64,
    pub marker_color: Color,
    pub marker_radius: f64,
    pub text_color: Color,
    pub axis_color: Color,
    pub font_family: String,
    pub font_size: f64,
    pub credit_font_size: f64,
    pub x_ticks: usize,
    pub y_ticks: usize,
    pub tooltip: TooltipConfig,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
            margin: Margin::default(),
            title: "Population Chart".to_string(),
            x_label: "Year".to_string(),
            y_label: "Population (millions)".to_string(),
            footnote: "Data source: World Bank".to_string(),
            credit: "Code by Your Name".to_string(),
            line_color: Color::STEELBLUE,
            line_width: 2.0,
            marker_color: Color::STEELBLUE,
            marker_radius: 5.0,
            text_color: Color::rgb(0x33, 0x33, 0x33),
            axis_color: Color::BLACK,
            font_family: "Arial, sans-serif".to_string(),
            font_size: 12.0,
            credit_font_size: 10.0,
            x_ticks: 10,
            y_ticks: 10,
            tooltip: TooltipConfig::default(),
        }
    }
}

impl ChartConfig {
    /// Load a config from a JSON file, filling unspecified keys with defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: ChartConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width > 0.0 && self.height > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::EmptyPlotArea {
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Full surface size including margins.
    pub fn outer_size(&self) -> (f64, f64) {
        (
            self.width + self.margin.left + self.margin.right,
            self.height + self.margin.top + self.margin.bottom,
        )
    }
}
