use axum::extract::{Query, State};
use axum::response::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::config::parse_flag;
use crate::error::{AppError, AppResult};
use crate::models::{ChartKind, ChartResponse, MonthChart, MonthSubcategoryCharts};
use crate::services::charts;
use crate::services::normalizer::SubcategoryNaming;
use crate::services::pie_layout::PieFrame;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ChartParams {
    pub chart: Option<String>,
    pub show_totals: Option<String>,
    pub qualified: Option<String>,
}

impl ChartParams {
    pub fn chart_kind(&self) -> AppResult<ChartKind> {
        match self.chart.as_deref().map(str::trim) {
            None | Some("") => Ok(ChartKind::default()),
            Some(kind) => kind
                .parse()
                .map_err(|_| AppError::Validation(format!("Unknown chart type '{}'", kind))),
        }
    }

    pub fn show_totals(&self) -> Option<bool> {
        self.show_totals.as_deref().map(parse_flag)
    }

    pub fn naming(&self) -> SubcategoryNaming {
        match self.qualified.as_deref().map(parse_flag) {
            Some(true) => SubcategoryNaming::Qualified,
            _ => SubcategoryNaming::Unqualified,
        }
    }
}

pub async fn monthly_by_category(
    State(state): State<AppState>,
    Query(params): Query<ChartParams>,
) -> AppResult<Json<Vec<MonthChart>>> {
    let kind = params.chart_kind()?;
    let report = state.reports.monthly_by_category().await?;

    let options = state.chart_options(kind, params.show_totals(), PieFrame::category());
    Ok(Json(charts::monthly_category_charts(&report, &options)))
}

pub async fn monthly_by_subcategory(
    State(state): State<AppState>,
    Query(params): Query<ChartParams>,
) -> AppResult<Json<Vec<MonthSubcategoryCharts>>> {
    let kind = params.chart_kind()?;
    let report = state.reports.monthly_by_subcategory().await?;

    let options = state.chart_options(kind, params.show_totals(), PieFrame::subcategory());
    Ok(Json(charts::monthly_subcategory_charts(
        &report,
        params.naming(),
        &options,
    )))
}

pub async fn category_chart(
    State(state): State<AppState>,
    Query(params): Query<ChartParams>,
    Json(data): Json<Value>,
) -> AppResult<Json<ChartResponse>> {
    let kind = params.chart_kind()?;
    let options = state.chart_options(kind, params.show_totals(), PieFrame::category());
    Ok(Json(charts::category_chart(&data, &options)))
}

pub async fn subcategory_chart(
    State(state): State<AppState>,
    Query(params): Query<ChartParams>,
    Json(data): Json<Value>,
) -> AppResult<Json<ChartResponse>> {
    let kind = params.chart_kind()?;
    let options = state.chart_options(kind, params.show_totals(), PieFrame::subcategory());
    Ok(Json(charts::subcategory_chart(
        &data,
        params.naming(),
        &options,
    )))
}
