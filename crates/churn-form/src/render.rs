use crate::numeric::to_fixed_2;
use churn_protocol::PredictionResponse;

pub const ERROR_MESSAGE: &str = "❌ Error making prediction. Check console/logs.";

/// Probability as a percentage with exactly two decimals, no `%` sign.
pub fn format_percent(probability: f64) -> String {
    to_fixed_2(probability * 100.0)
}

pub fn prediction_message(response: &PredictionResponse) -> String {
    let percent = format_percent(response.churn_probability);
    if response.is_churn() {
        format!(
            "⚠️ This customer is LIKELY to CHURN.<br>Churn probability: <strong>{percent}%</strong>"
        )
    } else {
        format!(
            "✅ This customer is UNLIKELY to churn.<br>Churn probability: <strong>{percent}%</strong>"
        )
    }
}

pub fn error_message() -> String {
    ERROR_MESSAGE.to_string()
}
