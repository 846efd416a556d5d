use std::sync::Arc;

use churn_protocol::PredictionResponse;
use tracing::{debug, error, info};

use crate::config::ButtonLabels;
use crate::dom::{FormFields, ResultRegion, SubmitControl, SubmitEvent};
use crate::error::PredictError;
use crate::payload::build_request;
use crate::render::{error_message, prediction_message};
use crate::transport::PredictTransport;

#[derive(Debug)]
pub enum SubmitOutcome {
    Predicted(PredictionResponse),
    Failed(PredictError),
    /// The predict button was disabled, so the form never submitted.
    Skipped,
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Predicted(_))
    }
}

/// Drives one submit cycle: lock the button, post the form, render the
/// answer, unlock the button.
///
/// The disabled button is the only guard against double submission and no
/// request token is kept. If something re-enables the button while a request
/// is in flight, both requests run and whichever answers last owns the result
/// region.
pub struct ChurnFormHandler {
    fields: Arc<dyn FormFields>,
    button: Arc<dyn SubmitControl>,
    result: Arc<dyn ResultRegion>,
    transport: Arc<dyn PredictTransport>,
    labels: ButtonLabels,
}

impl ChurnFormHandler {
    pub fn new(
        fields: Arc<dyn FormFields>,
        button: Arc<dyn SubmitControl>,
        result: Arc<dyn ResultRegion>,
        transport: Arc<dyn PredictTransport>,
        labels: ButtonLabels,
    ) -> Self {
        Self {
            fields,
            button,
            result,
            transport,
            labels,
        }
    }

    /// Submit listener: keeps the browser from navigating, then runs a cycle.
    /// A disabled predict button cannot submit the form, so nothing happens.
    pub async fn handle_submit(&self, event: &mut SubmitEvent) -> SubmitOutcome {
        if self.button.is_disabled() {
            debug!("submit ignored, predict button is disabled");
            return SubmitOutcome::Skipped;
        }
        event.prevent_default();
        self.submit().await
    }

    pub async fn submit(&self) -> SubmitOutcome {
        let _restore = ButtonRestore::engage(self.button.as_ref(), &self.labels);

        let request = build_request(self.fields.as_ref());
        match self.transport.predict(&request).await {
            Ok(response) => {
                info!(
                    churn_prediction = response.churn_prediction,
                    churn_probability = response.churn_probability,
                    "prediction received"
                );
                self.result.set_html(prediction_message(&response));
                SubmitOutcome::Predicted(response)
            }
            Err(err) => {
                error!(kind = err.kind(), error = %err, "prediction failed");
                self.result.set_html(error_message());
                SubmitOutcome::Failed(err)
            }
        }
    }
}

/// Busy state for the predict button. Dropping it puts the button back,
/// including when the cycle unwinds or its future is dropped.
struct ButtonRestore<'a> {
    button: &'a dyn SubmitControl,
    idle_label: &'a str,
}

impl<'a> ButtonRestore<'a> {
    fn engage(button: &'a dyn SubmitControl, labels: &'a ButtonLabels) -> Self {
        button.set_disabled(true);
        button.set_label(&labels.busy);
        Self {
            button,
            idle_label: &labels.idle,
        }
    }
}

impl Drop for ButtonRestore<'_> {
    fn drop(&mut self) {
        self.button.set_disabled(false);
        self.button.set_label(self.idle_label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EndpointConfig;
    use crate::dom::FormPage;
    use crate::render::ERROR_MESSAGE;
    use crate::test_utils::{closed_port_url, spawn_stub_server};
    use crate::transport::HttpTransport;
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use churn_protocol::PredictionRequest;
    use serde_json::{json, Value};
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::Notify;

    /// Answers with a fixed result and records what the button looked like
    /// while the request was in flight.
    struct ScriptedTransport {
        page: Arc<FormPage>,
        reply: fn() -> Result<PredictionResponse, PredictError>,
        requests: Mutex<Vec<PredictionRequest>>,
        in_flight: Mutex<Vec<(bool, String)>>,
    }

    impl ScriptedTransport {
        fn new(page: Arc<FormPage>, reply: fn() -> Result<PredictionResponse, PredictError>) -> Self {
            Self {
                page,
                reply,
                requests: Mutex::new(Vec::new()),
                in_flight: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PredictTransport for ScriptedTransport {
        async fn predict(
            &self,
            request: &PredictionRequest,
        ) -> Result<PredictionResponse, PredictError> {
            self.requests.lock().unwrap().push(request.clone());
            self.in_flight
                .lock()
                .unwrap()
                .push((self.page.is_disabled(), self.page.label()));
            (self.reply)()
        }
    }

    fn filled_page() -> Arc<FormPage> {
        let page = Arc::new(FormPage::new("Predict Churn"));
        for (id, value) in [
            ("CreditScore", "608"),
            ("Geography", "Spain"),
            ("Gender", "Female"),
            ("Age", "41"),
            ("Tenure", "1"),
            ("Balance", "83807.86"),
            ("NumOfProducts", "1"),
            ("HasCrCard", "0"),
            ("IsActiveMember", "1"),
            ("EstimatedSalary", "112542.58"),
        ] {
            page.set_value(id, value).unwrap();
        }
        page
    }

    fn handler_for(page: &Arc<FormPage>, transport: Arc<dyn PredictTransport>) -> ChurnFormHandler {
        ChurnFormHandler::new(
            page.clone(),
            page.clone(),
            page.clone(),
            transport,
            ButtonLabels::default(),
        )
    }

    fn assert_idle(page: &FormPage) {
        assert!(!page.is_disabled());
        assert_eq!(page.label(), "Predict Churn");
    }

    #[tokio::test]
    async fn churn_prediction_renders_warning() {
        let page = filled_page();
        let transport = Arc::new(ScriptedTransport::new(page.clone(), || {
            Ok(PredictionResponse {
                churn_prediction: 1,
                churn_probability: 0.8732,
            })
        }));
        let handler = handler_for(&page, transport.clone());

        let mut event = SubmitEvent::new();
        let outcome = handler.handle_submit(&mut event).await;

        assert!(event.default_prevented());
        assert!(outcome.is_success());
        let html = page.html();
        assert!(html.contains("LIKELY to CHURN"));
        assert!(html.contains("87.32%"));
        assert_eq!(transport.requests.lock().unwrap().len(), 1);
        assert_eq!(
            transport.in_flight.lock().unwrap().as_slice(),
            &[(true, "Predicting...".to_string())]
        );
        assert_idle(&page);
    }

    #[tokio::test]
    async fn retained_customer_renders_positive_message() {
        let page = filled_page();
        let transport = Arc::new(ScriptedTransport::new(page.clone(), || {
            Ok(PredictionResponse {
                churn_prediction: 0,
                churn_probability: 0.05,
            })
        }));
        let handler = handler_for(&page, transport);

        handler.submit().await;

        let html = page.html();
        assert!(html.contains("UNLIKELY to churn"));
        assert!(html.contains("5.00%"));
        assert_idle(&page);
    }

    #[tokio::test]
    async fn failure_renders_generic_error_and_restores_button() {
        let page = filled_page();
        page.set_html("stale result".to_string());
        let transport = Arc::new(ScriptedTransport::new(page.clone(), || {
            Err(PredictError::Transport("connection refused".to_string()))
        }));
        let handler = handler_for(&page, transport);

        let outcome = handler.submit().await;

        assert!(!outcome.is_success());
        assert_eq!(page.html(), ERROR_MESSAGE);
        assert!(!page.html().contains('%'));
        assert_idle(&page);
    }

    #[tokio::test]
    async fn non_numeric_age_is_still_sent() {
        let page = filled_page();
        page.set_value("Age", "abc").unwrap();
        let transport = Arc::new(ScriptedTransport::new(page.clone(), || {
            Ok(PredictionResponse {
                churn_prediction: 0,
                churn_probability: 0.2,
            })
        }));
        let handler = handler_for(&page, transport.clone());

        handler.submit().await;

        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].age, None);
        assert_eq!(requests[0].credit_score, Some(608));
    }

    #[tokio::test]
    async fn dropped_submission_still_restores_button() {
        struct Stalled;

        #[async_trait]
        impl PredictTransport for Stalled {
            async fn predict(
                &self,
                _request: &PredictionRequest,
            ) -> Result<PredictionResponse, PredictError> {
                std::future::pending().await
            }
        }

        let page = filled_page();
        let handler = handler_for(&page, Arc::new(Stalled));
        let result = tokio::time::timeout(Duration::from_millis(20), handler.submit()).await;

        assert!(result.is_err());
        assert_idle(&page);
    }

    #[tokio::test]
    async fn disabled_button_blocks_submission() {
        let page = filled_page();
        page.set_disabled(true);
        page.set_label("Predicting...");
        page.set_html("previous result".to_string());
        let transport = Arc::new(ScriptedTransport::new(page.clone(), || {
            Ok(PredictionResponse {
                churn_prediction: 1,
                churn_probability: 0.5,
            })
        }));
        let handler = handler_for(&page, transport.clone());

        let mut event = SubmitEvent::new();
        let outcome = handler.handle_submit(&mut event).await;

        assert!(matches!(outcome, SubmitOutcome::Skipped));
        assert!(transport.requests.lock().unwrap().is_empty());
        assert!(page.is_disabled());
        assert_eq!(page.label(), "Predicting...");
        assert_eq!(page.html(), "previous result");
    }

    #[tokio::test]
    async fn panic_while_rendering_failure_restores_button() {
        struct ExplodingRegion;

        impl ResultRegion for ExplodingRegion {
            fn set_html(&self, _html: String) {
                panic!("result region detached");
            }

            fn html(&self) -> String {
                String::new()
            }
        }

        let page = filled_page();
        let transport = Arc::new(ScriptedTransport::new(page.clone(), || {
            Err(PredictError::Status {
                status: 503,
                body: "unavailable".to_string(),
            })
        }));
        let handler = ChurnFormHandler::new(
            page.clone(),
            page.clone(),
            Arc::new(ExplodingRegion),
            transport,
            ButtonLabels::default(),
        );

        let joined = tokio::spawn(async move { handler.submit().await }).await;

        assert!(joined.unwrap_err().is_panic());
        assert_idle(&page);
    }

    #[tokio::test]
    async fn last_response_to_arrive_wins() {
        /// The first request waits until the second has answered.
        struct Ordered {
            calls: Mutex<u32>,
            second_done: Notify,
        }

        #[async_trait]
        impl PredictTransport for Ordered {
            async fn predict(
                &self,
                _request: &PredictionRequest,
            ) -> Result<PredictionResponse, PredictError> {
                let call = {
                    let mut calls = self.calls.lock().unwrap();
                    *calls += 1;
                    *calls
                };
                if call == 1 {
                    self.second_done.notified().await;
                    Ok(PredictionResponse {
                        churn_prediction: 1,
                        churn_probability: 0.9,
                    })
                } else {
                    self.second_done.notify_one();
                    Ok(PredictionResponse {
                        churn_prediction: 0,
                        churn_probability: 0.1,
                    })
                }
            }
        }

        let page = filled_page();
        let transport = Arc::new(Ordered {
            calls: Mutex::new(0),
            second_done: Notify::new(),
        });
        let handler = handler_for(&page, transport);

        let mut first_event = SubmitEvent::new();
        let mut second_event = SubmitEvent::new();
        let (first, second) = tokio::join!(handler.handle_submit(&mut first_event), async {
            // Something outside the handler releases the button mid-flight.
            page.set_disabled(false);
            handler.handle_submit(&mut second_event).await
        });

        assert!(first.is_success());
        assert!(second.is_success());
        let html = page.html();
        assert!(html.contains("LIKELY to CHURN"));
        assert!(html.contains("90.00%"));
        assert_idle(&page);
    }

    #[tokio::test]
    async fn end_to_end_posts_once_to_predict() {
        let seen: Arc<Mutex<Vec<Value>>> = Arc::default();
        let recorder = Arc::clone(&seen);
        let app = Router::new().route(
            "/predict",
            post(move |Json(body): Json<Value>| {
                let recorder = Arc::clone(&recorder);
                async move {
                    recorder.lock().unwrap().push(body);
                    Json(json!({"churn_prediction": 0, "churn_probability": 0.05}))
                }
            }),
        );
        let base_url = spawn_stub_server(app).await;
        let page = filled_page();
        let transport = Arc::new(HttpTransport::new(EndpointConfig::new(base_url)).unwrap());
        let handler = handler_for(&page, transport);

        let outcome = handler.submit().await;

        assert!(outcome.is_success());
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0]["Geography"], json!("Spain"));
        assert_eq!(seen[0]["Balance"], json!(83807.86));
        assert!(seen[0]["Tenure"].is_i64());
        assert!(page.html().contains("5.00%"));
        assert_idle(&page);
    }

    #[tokio::test]
    async fn end_to_end_server_error_shows_generic_message() {
        let app = Router::new().route(
            "/predict",
            post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let base_url = spawn_stub_server(app).await;
        let page = filled_page();
        let transport = Arc::new(HttpTransport::new(EndpointConfig::new(base_url)).unwrap());
        let handler = handler_for(&page, transport);

        let outcome = handler.submit().await;

        assert!(matches!(
            outcome,
            SubmitOutcome::Failed(PredictError::Status { status: 500, .. })
        ));
        assert_eq!(page.html(), ERROR_MESSAGE);
        assert_idle(&page);
    }

    #[tokio::test]
    async fn end_to_end_network_failure_shows_generic_message() {
        let base_url = closed_port_url().await;
        let page = filled_page();
        let transport = Arc::new(HttpTransport::new(EndpointConfig::new(base_url)).unwrap());
        let handler = handler_for(&page, transport);

        let outcome = handler.submit().await;

        assert!(!outcome.is_success());
        assert_eq!(page.html(), ERROR_MESSAGE);
        assert_idle(&page);
    }
}
