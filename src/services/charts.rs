//! Assembles chart payloads from normalized report data.

use serde_json::{Map, Value};
use tracing::debug;

use crate::models::{
    ChartKind, ChartPoint, ChartResponse, MonthChart, MonthSubcategoryCharts, Normalized,
};
use crate::month_utils::{month_label, sorted_months};
use crate::services::formatting::tooltip;
use crate::services::label_placement::PlacementOptions;
use crate::services::normalizer::{
    normalize_category_report, normalize_subcategory_report, SubcategoryNaming,
};
use crate::services::pie_layout::{layout_pie, resolve_color, PieFrame};

#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub kind: ChartKind,
    pub show_totals: bool,
    pub currency_symbol: String,
    pub placement: PlacementOptions,
    pub frame: PieFrame,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            kind: ChartKind::default(),
            show_totals: false,
            currency_symbol: "R$".into(),
            placement: PlacementOptions::default(),
            frame: PieFrame::category(),
        }
    }
}

/// Build the chart for already normalized data.
///
/// Pie charts are sorted by descending total before colors are assigned and
/// labels placed, so the largest slice always gets the first palette color
/// and the first pick of label positions. Bar and line charts keep the
/// source order.
pub fn build_chart(mut normalized: Normalized, options: &ChartOptions) -> ChartResponse {
    if !options.kind.keeps_source_order() {
        normalized.sort_descending();
    }

    let series: Vec<ChartPoint> = normalized
        .points
        .iter()
        .enumerate()
        .map(|(index, point)| ChartPoint {
            name: point.name.clone(),
            total: point.total,
            color: resolve_color(point, index),
            tooltip: tooltip(&options.currency_symbol, point.total, options.show_totals),
            transactions: point.transactions.clone().unwrap_or_default(),
        })
        .collect();

    let slices = match options.kind {
        ChartKind::Pie => layout_pie(&normalized.points, &options.frame, options.placement),
        ChartKind::Bar | ChartKind::Line => Vec::new(),
    };

    debug!(
        chart = options.kind.as_str(),
        points = series.len(),
        slices = slices.len(),
        "Built chart"
    );

    ChartResponse {
        kind: options.kind,
        empty: series.is_empty(),
        show_totals: options.show_totals,
        series,
        slices,
        coercions: normalized.coercions,
    }
}

pub fn category_chart(data: &Value, options: &ChartOptions) -> ChartResponse {
    build_chart(normalize_category_report(data), options)
}

pub fn subcategory_chart(
    data: &Value,
    naming: SubcategoryNaming,
    options: &ChartOptions,
) -> ChartResponse {
    build_chart(normalize_subcategory_report(data, naming), options)
}

/// One category chart per month of a `month -> categories` report, oldest
/// month first.
pub fn monthly_category_charts(report: &Value, options: &ChartOptions) -> Vec<MonthChart> {
    let Some(months) = report.as_object() else {
        return Vec::new();
    };

    sorted_months(months.keys().cloned())
        .into_iter()
        .map(|month| {
            let chart = category_chart(&months[&month], options);
            MonthChart {
                label: month_label(&month),
                month,
                chart,
            }
        })
        .collect()
}

/// Credit and debit charts for every month present on either side of a
/// `{ credit: {month: ...}, debit: {month: ...} }` report. A month missing on
/// one side gets an empty chart there.
pub fn monthly_subcategory_charts(
    report: &Value,
    naming: SubcategoryNaming,
    options: &ChartOptions,
) -> Vec<MonthSubcategoryCharts> {
    let credit = report.get("credit").and_then(Value::as_object);
    let debit = report.get("debit").and_then(Value::as_object);

    let keys = credit
        .into_iter()
        .chain(debit)
        .flat_map(|side| side.keys().cloned());

    sorted_months(keys)
        .into_iter()
        .map(|month| {
            let side = |map: Option<&Map<String, Value>>| {
                let data = map.and_then(|m| m.get(&month)).unwrap_or(&Value::Null);
                subcategory_chart(data, naming, options)
            };
            let credit = side(credit);
            let debit = side(debit);
            MonthSubcategoryCharts {
                label: month_label(&month),
                month,
                credit,
                debit,
            }
        })
        .collect()
}
