//! Chart kinds and display-ready chart specifications.
//!
//! A `ChartSpec` is pure data: it carries everything a sink needs to draw
//! the chart and nothing that ties it to a particular renderer.

use serde::{Deserialize, Serialize};

use super::stats::{BoxSummary, ColumnSummary, HistogramBin};

/// Errors raised by chart recipes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChartError {
    #[error("{chart}: no eligible feature to plot ({reason})")]
    EmptySelection { chart: ChartKind, reason: String },

    #[error("Dataset has no column named {0}")]
    MissingColumn(String),

    #[error("Column {0} is not numeric")]
    NotNumeric(String),
}

/// The six fixed visualizations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    DatasetSummary,
    OutcomeDistribution,
    NumericDistribution,
    CorrelationHeatmap,
    FeatureByOutcome,
    AgeVsPedigree,
}

impl ChartKind {
    /// All kinds, in menu order.
    pub const ALL: [ChartKind; 6] = [
        ChartKind::DatasetSummary,
        ChartKind::OutcomeDistribution,
        ChartKind::NumericDistribution,
        ChartKind::CorrelationHeatmap,
        ChartKind::FeatureByOutcome,
        ChartKind::AgeVsPedigree,
    ];

    /// Menu title.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::DatasetSummary => "Show dataset basic information",
            Self::OutcomeDistribution => "Diabetes Outcome Distribution",
            Self::NumericDistribution => "Numeric features distribution",
            Self::CorrelationHeatmap => "Correlation heatmap",
            Self::FeatureByOutcome => "Compare numeric features by Outcome",
            Self::AgeVsPedigree => "Age vs DiabetesPedigreeFunction",
        }
    }

    /// Whether the chart needs a numeric feature selector.
    #[must_use]
    pub fn needs_feature(&self) -> bool {
        matches!(self, Self::NumericDistribution | Self::FeatureByOutcome)
    }

    /// Position in `ALL`.
    #[must_use]
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|k| k == self).unwrap_or(0)
    }

    /// Parse a command-line style name (`outcome-distribution`, `heatmap`, ...).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "dataset-summary" | "summary" => Some(Self::DatasetSummary),
            "outcome-distribution" | "outcome" => Some(Self::OutcomeDistribution),
            "numeric-distribution" | "distribution" => Some(Self::NumericDistribution),
            "correlation-heatmap" | "heatmap" => Some(Self::CorrelationHeatmap),
            "feature-by-outcome" | "box" => Some(Self::FeatureByOutcome),
            "age-vs-pedigree" | "scatter" => Some(Self::AgeVsPedigree),
            _ => None,
        }
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Per-request chart parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartParams {
    /// Selected numeric feature, for charts that need one
    pub feature: Option<String>,
}

impl ChartParams {
    #[must_use]
    pub fn with_feature(feature: impl Into<String>) -> Self {
        Self {
            feature: Some(feature.into()),
        }
    }
}

/// Fixed categorical colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartColor {
    Green,
    Red,
}

impl ChartColor {
    /// Color for a label value: 0 → green, 1 → red.
    #[must_use]
    pub fn for_label(label: u8) -> Self {
        if label == 1 {
            Self::Red
        } else {
            Self::Green
        }
    }
}

/// Continuous color scales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorScale {
    /// Reversed red-blue diverging scale (negative blue, positive red)
    #[serde(rename = "RdBu_r")]
    RdBuReversed,
}

/// Table views for the dataset summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryView {
    pub columns: Vec<String>,
    pub head: Vec<Vec<String>>,
    pub statistics: Vec<ColumnSummary>,
    /// (rows, columns)
    pub shape: (usize, usize),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub count: usize,
    pub fraction: f64,
    pub color: ChartColor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<PieSlice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionChart {
    pub title: String,
    pub feature: String,
    pub bin_size: f64,
    pub bins: Vec<HistogramBin>,
    /// Kernel density curve as (x, density) points
    pub density_curve: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heatmap {
    pub title: String,
    pub labels: Vec<String>,
    /// Row-major square matrix; `None` where correlation is undefined
    pub cells: Vec<Vec<Option<f64>>>,
    pub scale: ColorScale,
    pub range: (f64, f64),
}

impl Heatmap {
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.cells.get(row).and_then(|r| r.get(col)).copied().flatten()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxGroup {
    pub label: u8,
    pub name: String,
    pub color: ChartColor,
    pub summary: BoxSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxPlotChart {
    pub title: String,
    pub feature: String,
    pub x_title: String,
    pub groups: Vec<BoxGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub label: u8,
    pub color: ChartColor,
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterChart {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub legend_title: String,
    pub series: Vec<ScatterSeries>,
}

/// Display-ready chart produced by a recipe.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "chart", rename_all = "snake_case")]
pub enum ChartSpec {
    Summary(SummaryView),
    Pie(PieChart),
    Distribution(DistributionChart),
    Heatmap(Heatmap),
    BoxPlot(BoxPlotChart),
    Scatter(ScatterChart),
}

impl ChartSpec {
    /// The chart kind that produces this spec.
    #[must_use]
    pub fn kind(&self) -> ChartKind {
        match self {
            Self::Summary(_) => ChartKind::DatasetSummary,
            Self::Pie(_) => ChartKind::OutcomeDistribution,
            Self::Distribution(_) => ChartKind::NumericDistribution,
            Self::Heatmap(_) => ChartKind::CorrelationHeatmap,
            Self::BoxPlot(_) => ChartKind::FeatureByOutcome,
            Self::Scatter(_) => ChartKind::AgeVsPedigree,
        }
    }
}
