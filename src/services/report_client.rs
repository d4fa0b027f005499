use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};

const CATEGORY_REPORT_PATH: &str = "reports/monthly_by_category";
const SUBCATEGORY_REPORT_PATH: &str = "reports/monthly_by_subcategory";

/// Client for the upstream report API that owns the transaction data.
#[derive(Clone, Debug)]
pub struct ReportClient {
    client: Client,
    base_url: String,
}

impl ReportClient {
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(
            &config.reports_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `month -> category -> subcategory -> { total, transactions }`
    pub async fn monthly_by_category(&self) -> AppResult<Value> {
        self.fetch(CATEGORY_REPORT_PATH).await
    }

    /// `{ credit: { month -> [...] }, debit: { month -> [...] } }`
    pub async fn monthly_by_subcategory(&self) -> AppResult<Value> {
        self.fetch(SUBCATEGORY_REPORT_PATH).await
    }

    async fn fetch(&self, path: &str) -> AppResult<Value> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(url = %url, "Fetching report");

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "Report request failed");
            AppError::Upstream(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, %status, "Report service returned an error");
            return Err(AppError::UpstreamStatus {
                status: status.as_u16(),
                url,
            });
        }

        let report: Value = response.json().await?;
        info!(
            url = %url,
            months = report.as_object().map_or(0, |m| m.len()),
            "Fetched report"
        );
        Ok(report)
    }
}
