use serde::Deserialize;
use std::collections::BTreeMap;

pub const DEFAULT_PREDICT_PATH: &str = "/predict";
pub const DEFAULT_HEALTH_PATH: &str = "/health";
pub const DEFAULT_IDLE_LABEL: &str = "Predict Churn";
pub const DEFAULT_BUSY_LABEL: &str = "Predicting...";
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 2_000;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Default, Deserialize)]
pub struct FormConfig {
    pub base_url: Option<String>,
    pub predict_path: Option<String>,
    pub health_path: Option<String>,
    pub idle_label: Option<String>,
    pub busy_label: Option<String>,
    pub connect_timeout_ms: Option<u64>,
    pub request_timeout_ms: Option<u64>,
}

/// Raw text for each form input, keyed by element id.
#[derive(Debug, Default, Deserialize)]
pub struct FormValues {
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}
