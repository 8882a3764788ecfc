use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Produces an empty canvas for every rendered view.
pub trait ChartBuilderApi: Send + Sync + 'static {
    fn canvas(&self) -> Arc<dyn Canvas>;
}

/// Drawing surface addressed by target ids, the charts of one view.
pub trait Canvas: Send + Sync + 'static {
    /// Declares placeholders, already mounted targets keep their charts.
    fn mount(&self, targets: &[String]);
    fn has_target(&self, target: &str) -> bool;
    fn draw(&self, target: &str, chart: ChartSpec) -> Result<(), RenderError>;
    fn render(&self) -> Result<String, RenderError>;
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Chart targets not found: {0}")]
    TargetNotFound(String),
    #[error("Error during chart rendering: {0}")]
    Render(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    pub options: ChartOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: String,
    /// `None` marks a point without a value.
    pub data: Vec<Option<f64>>,
    pub style: DatasetStyle,
}

impl Dataset {
    pub fn new(label: &str, data: Vec<Option<f64>>, style: DatasetStyle) -> Self {
        Self {
            label: label.to_string(),
            data,
            style,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DatasetStyle {
    Bar { background: Color },
    Line { border: Color, fill: bool, tension: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub responsive: bool,
    pub legend: LegendPosition,
    pub tooltip: Tooltip,
    pub x_axis: Axis,
    pub y_axis: Axis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendPosition {
    Top,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tooltip {
    pub mode: TooltipMode,
    pub intersect: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipMode {
    /// All series at the hovered x position.
    Index,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Axis {
    pub stacked: bool,
    pub begin_at_zero: bool,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Color(String);

impl Color {
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
