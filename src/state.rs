use std::sync::Arc;

use crate::config::Config;
use crate::error::AppResult;
use crate::models::ChartKind;
use crate::services::charts::ChartOptions;
use crate::services::pie_layout::PieFrame;
use crate::services::report_client::ReportClient;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub reports: ReportClient,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        let reports = ReportClient::from_config(&config)?;
        Ok(Self {
            config: Arc::new(config),
            reports,
        })
    }

    /// Chart options for a request, falling back to configured defaults.
    pub fn chart_options(
        &self,
        kind: ChartKind,
        show_totals: Option<bool>,
        frame: PieFrame,
    ) -> ChartOptions {
        ChartOptions {
            kind,
            show_totals: show_totals.unwrap_or(self.config.show_totals),
            currency_symbol: self.config.currency_symbol.clone(),
            placement: self.config.placement,
            frame,
        }
    }
}
