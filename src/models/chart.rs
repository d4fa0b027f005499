use std::str::FromStr;

use serde::Serialize;

use super::report::{Coercion, Transaction};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    #[default]
    Pie,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Pie => "pie",
        }
    }

    /// Bar and line charts keep the source order of their series.
    pub fn keeps_source_order(&self) -> bool {
        !matches!(self, Self::Pie)
    }
}

impl FromStr for ChartKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bar" => Ok(Self::Bar),
            "line" => Ok(Self::Line),
            "pie" => Ok(Self::Pie),
            _ => Err(()),
        }
    }
}

/// Screen coordinates of a placed label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelPosition {
    pub x: f64,
    pub y: f64,
}

impl LabelPosition {
    pub fn distance_to(&self, other: &LabelPosition) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Which end of the label text sits on the label point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    /// Right of the center: text starts at the point and runs outward.
    Start,
    /// Left of (or exactly above/below) the center: text ends at the point.
    End,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliceLabel {
    pub x: f64,
    pub y: f64,
    pub anchor: TextAnchor,
    pub text: String,
    /// False when the label may still overlap another one.
    pub resolved: bool,
    pub attempts: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub name: String,
    pub total: f64,
    pub color: String,
    pub percent: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub mid_angle: f64,
    pub label: Option<SliceLabel>,
}

/// A series point as sent to the chart: color resolved, tooltip formatted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub name: String,
    pub total: f64,
    pub color: String,
    /// Formatted amount, only present when totals are shown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartResponse {
    pub kind: ChartKind,
    pub empty: bool,
    pub show_totals: bool,
    pub series: Vec<ChartPoint>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub slices: Vec<PieSlice>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub coercions: Vec<Coercion>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthChart {
    pub month: String,
    pub label: String,
    pub chart: ChartResponse,
}

/// Money in and money out for one month of the subcategory report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSubcategoryCharts {
    pub month: String,
    pub label: String,
    pub credit: ChartResponse,
    pub debit: ChartResponse,
}
