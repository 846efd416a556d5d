use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use churn_protocol::{HealthResponse, PredictionRequest, PredictionResponse};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::config::EndpointConfig;
use crate::error::PredictError;
use crate::http_utils::{escape_log_body, join_base_path};

const LOG_BODY_LIMIT: usize = 512;
static HTTP_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

#[async_trait]
pub trait PredictTransport: Send + Sync {
    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, PredictError>;
}

pub struct HttpTransport {
    client: Client,
    predict_url: String,
    health_url: String,
    config: EndpointConfig,
}

impl HttpTransport {
    pub fn new(config: EndpointConfig) -> anyhow::Result<Self> {
        let predict_url = join_base_path(&config.base_url, &config.predict_path)?;
        let health_url = join_base_path(&config.base_url, &config.health_path)?;
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()?;
        Ok(Self {
            client,
            predict_url,
            health_url,
            config,
        })
    }

    pub fn predict_url(&self) -> &str {
        &self.predict_url
    }

    /// Probes the server's health route; `Ok(())` only for 2xx with
    /// `{"status":"ok"}`.
    pub async fn health(&self) -> Result<(), PredictError> {
        let request_id = HTTP_REQUEST_ID.fetch_add(1, Ordering::Relaxed);
        debug!(request_id, url = %self.health_url, "health check start");
        let response = self
            .client
            .get(&self.health_url)
            .header(ACCEPT, "application/json")
            .timeout(self.config.request_timeout)
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        if status / 100 != 2 {
            return Err(PredictError::Status { status, body });
        }
        let health: HealthResponse = serde_json::from_str(&body)?;
        if !health.is_ok() {
            return Err(PredictError::MalformedBody(format!(
                "health status {}",
                health.status
            )));
        }
        info!(request_id, url = %self.health_url, "prediction server healthy");
        Ok(())
    }
}

#[async_trait]
impl PredictTransport for HttpTransport {
    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, PredictError> {
        let request_id = HTTP_REQUEST_ID.fetch_add(1, Ordering::Relaxed);
        let payload = serde_json::to_string(request)
            .map_err(|err| PredictError::Transport(format!("encode payload: {err}")))?;
        let null_fields = request.null_fields();
        if !null_fields.is_empty() {
            debug!(request_id, ?null_fields, "sending fields without a numeric value");
        }
        debug!(
            request_id,
            url = %self.predict_url,
            body_len = payload.len(),
            "predict request start"
        );

        let response = match self
            .client
            .post(&self.predict_url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .timeout(self.config.request_timeout)
            .body(payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!(
                    request_id,
                    timeout = err.is_timeout(),
                    connect = err.is_connect(),
                    error = %err,
                    "predict request failed"
                );
                return Err(err.into());
            }
        };

        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(
            request_id,
            status,
            body = %escape_log_body(&body, LOG_BODY_LIMIT),
            "predict response"
        );
        if status / 100 != 2 {
            return Err(PredictError::Status {
                status,
                body: escape_log_body(&body, LOG_BODY_LIMIT),
            });
        }
        let prediction: PredictionResponse = serde_json::from_str(&body)?;
        Ok(prediction)
    }
}
