use anyhow::Context;
use churn_protocol::config::{
    FormConfig, DEFAULT_BUSY_LABEL, DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_HEALTH_PATH,
    DEFAULT_IDLE_LABEL, DEFAULT_PREDICT_PATH, DEFAULT_REQUEST_TIMEOUT_MS,
};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonLabels {
    pub idle: String,
    pub busy: String,
}

impl Default for ButtonLabels {
    fn default() -> Self {
        Self {
            idle: DEFAULT_IDLE_LABEL.to_string(),
            busy: DEFAULT_BUSY_LABEL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EndpointConfig {
    pub base_url: String,
    pub predict_path: String,
    pub health_path: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl EndpointConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            predict_path: DEFAULT_PREDICT_PATH.to_string(),
            health_path: DEFAULT_HEALTH_PATH.to_string(),
            connect_timeout: Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub endpoint: EndpointConfig,
    pub labels: ButtonLabels,
}

#[derive(Debug, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub request_timeout: Option<Duration>,
}

pub fn load_form_config(path: &Path) -> anyhow::Result<FormConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: FormConfig = toml::from_str(&raw)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    Ok(config)
}

pub fn resolve_config(config: FormConfig, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    let base_url = overrides
        .base_url
        .or(config.base_url)
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    if base_url.trim().is_empty() {
        anyhow::bail!("base_url must not be empty");
    }
    let request_timeout = overrides.request_timeout.unwrap_or_else(|| {
        Duration::from_millis(
            config
                .request_timeout_ms
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS),
        )
    });
    let connect_timeout = Duration::from_millis(
        config
            .connect_timeout_ms
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT_MS),
    );
    if request_timeout.is_zero() || connect_timeout.is_zero() {
        anyhow::bail!("timeouts must be greater than zero");
    }
    let endpoint = EndpointConfig {
        base_url,
        predict_path: config
            .predict_path
            .unwrap_or_else(|| DEFAULT_PREDICT_PATH.to_string()),
        health_path: config
            .health_path
            .unwrap_or_else(|| DEFAULT_HEALTH_PATH.to_string()),
        connect_timeout,
        request_timeout,
    };
    let labels = ButtonLabels {
        idle: config
            .idle_label
            .unwrap_or_else(|| DEFAULT_IDLE_LABEL.to_string()),
        busy: config
            .busy_label
            .unwrap_or_else(|| DEFAULT_BUSY_LABEL.to_string()),
    };
    Ok(ResolvedConfig { endpoint, labels })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_keys() {
        let resolved = resolve_config(FormConfig::default(), Overrides::default()).unwrap();
        assert_eq!(resolved.endpoint.base_url, DEFAULT_BASE_URL);
        assert_eq!(resolved.endpoint.predict_path, "/predict");
        assert_eq!(resolved.endpoint.health_path, "/health");
        assert_eq!(resolved.labels, ButtonLabels::default());
        assert_eq!(resolved.labels.idle, "Predict Churn");
        assert_eq!(resolved.labels.busy, "Predicting...");
    }

    #[test]
    fn overrides_win_over_file() {
        let config: FormConfig = toml::from_str(
            r#"
base_url = "http://churn.internal"
request_timeout_ms = 1000
"#,
        )
        .unwrap();
        let resolved = resolve_config(
            config,
            Overrides {
                base_url: Some("http://127.0.0.1:9000".to_string()),
                request_timeout: Some(Duration::from_secs(3)),
            },
        )
        .unwrap();
        assert_eq!(resolved.endpoint.base_url, "http://127.0.0.1:9000");
        assert_eq!(resolved.endpoint.request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn empty_base_url_is_rejected() {
        let config: FormConfig = toml::from_str(r#"base_url = "  ""#).unwrap();
        assert!(resolve_config(config, Overrides::default()).is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config: FormConfig = toml::from_str("connect_timeout_ms = 0").unwrap();
        assert!(resolve_config(config, Overrides::default()).is_err());
    }
}
