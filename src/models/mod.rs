pub mod chart;
pub mod report;

pub use chart::{
    ChartKind, ChartPoint, ChartResponse, LabelPosition, MonthChart, MonthSubcategoryCharts,
    PieSlice, SliceLabel, TextAnchor,
};
pub use report::{Coercion, Normalized, SeriesPoint, Transaction};
