use std::env;
use std::str::FromStr;

use crate::services::label_placement::{
    PlacementOptions, DEFAULT_COLLISION_THRESHOLD, MAX_PLACEMENT_ATTEMPTS,
};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Base URL of the upstream report API, e.g. `http://localhost:3000/api/v1`.
    pub reports_url: String,
    pub request_timeout_secs: u64,
    /// Used when a request does not carry its own `show_totals` flag.
    pub show_totals: bool,
    pub currency_symbol: String,
    pub placement: PlacementOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 7070,
            reports_url: "http://localhost:3000/api/v1".into(),
            request_timeout_secs: 30,
            show_totals: false,
            currency_symbol: "R$".into(),
            placement: PlacementOptions::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let threshold = parse_var("SPENDVIEW_LABEL_THRESHOLD")
            .filter(|t: &f64| t.is_finite() && *t > 0.0)
            .unwrap_or(DEFAULT_COLLISION_THRESHOLD);
        let max_attempts =
            parse_var("SPENDVIEW_LABEL_MAX_ATTEMPTS").unwrap_or(MAX_PLACEMENT_ATTEMPTS);

        Self {
            host: env::var("SPENDVIEW_HOST").unwrap_or(defaults.host),
            port: parse_var("SPENDVIEW_PORT").unwrap_or(defaults.port),
            reports_url: env::var("SPENDVIEW_REPORTS_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.reports_url),
            request_timeout_secs: parse_var("SPENDVIEW_REQUEST_TIMEOUT_SECS")
                .unwrap_or(defaults.request_timeout_secs),
            show_totals: env::var("SPENDVIEW_SHOW_TOTALS")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.show_totals),
            currency_symbol: env::var("SPENDVIEW_CURRENCY_SYMBOL")
                .unwrap_or(defaults.currency_symbol),
            placement: PlacementOptions {
                threshold,
                max_attempts,
            },
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Accepts the usual spellings of a boolean environment flag.
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
